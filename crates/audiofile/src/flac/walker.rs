//! Walk and rewrite a flac file's metadata block chain.

use std::io::Write;
use tracing::{debug, trace, warn};

use super::{
	blocks::{
		FlacCommentBlock, FlacMetablockDecode, FlacMetablockEncode, FlacMetablockHeader,
		FlacMetablockType, FlacPaddingBlock, FlacPictureBlock, FlacRawBlock, FlacStreaminfoBlock,
		MAX_BLOCK_LEN,
	},
	errors::{FlacDecodeError, FlacEncodeError},
};
use crate::{
	common::{bytes::ByteCursor, vorbiscomment::VorbisComment},
	id3v2::tag_region_len,
};

/// The magic bytes every flac stream starts with
pub const FLAC_MAGIC: &[u8; 4] = b"fLaC";

/// A decoded flac metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FlacBlock {
	Streaminfo(FlacStreaminfoBlock),
	Padding(FlacPaddingBlock),
	VorbisComment(FlacCommentBlock),
	Picture(FlacPictureBlock),

	/// A block we do not interpret,
	/// or a comment/picture block we could not decode.
	Raw(FlacRawBlock),
}

impl FlacBlock {
	/// Try to decode the given data as a block
	pub fn decode(block_type: FlacMetablockType, data: &[u8]) -> Result<Self, FlacDecodeError> {
		Ok(match block_type {
			FlacMetablockType::Streaminfo => Self::Streaminfo(FlacStreaminfoBlock::decode(data)?),
			FlacMetablockType::Padding => Self::Padding(FlacPaddingBlock::decode(data)?),
			FlacMetablockType::VorbisComment => {
				Self::VorbisComment(FlacCommentBlock::decode(data)?)
			}
			FlacMetablockType::Picture => Self::Picture(FlacPictureBlock::decode(data)?),
			FlacMetablockType::Application
			| FlacMetablockType::Seektable
			| FlacMetablockType::Cuesheet => Self::Raw(FlacRawBlock::decode(block_type, data)?),
		})
	}

	/// The type of this block
	pub fn block_type(&self) -> FlacMetablockType {
		match self {
			Self::Streaminfo(_) => FlacMetablockType::Streaminfo,
			Self::Padding(_) => FlacMetablockType::Padding,
			Self::VorbisComment(_) => FlacMetablockType::VorbisComment,
			Self::Picture(_) => FlacMetablockType::Picture,
			Self::Raw(b) => b.block_type,
		}
	}

	/// The length of this block's payload
	pub fn get_len(&self) -> u32 {
		match self {
			Self::Streaminfo(b) => b.get_len(),
			Self::Padding(b) => b.get_len(),
			Self::VorbisComment(b) => b.get_len(),
			Self::Picture(b) => b.get_len(),
			Self::Raw(b) => b.get_len(),
		}
	}

	/// Encode this block
	pub fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl Write,
	) -> Result<(), FlacEncodeError> {
		match self {
			Self::Streaminfo(b) => b.encode(is_last, with_header, target),
			Self::Padding(b) => b.encode(is_last, with_header, target),
			Self::VorbisComment(b) => b.encode(is_last, with_header, target),
			Self::Picture(b) => b.encode(is_last, with_header, target),
			Self::Raw(b) => b.encode(is_last, with_header, target),
		}
	}
}

/// A metadata block and where we found it
#[derive(Debug, Clone)]
pub struct FlacBlockEntry {
	/// The offset of this block's payload in the source,
	/// or `None` if this block was replaced or added.
	pub offset: Option<usize>,

	/// The block itself
	pub block: FlacBlock,
}

/// The metadata of a flac file
#[derive(Debug)]
pub struct FlacFile {
	/// Number of bytes before `fLaC` (a leading id3v2 tag)
	prefix_len: usize,

	/// Number of bytes used by the block chain in the source,
	/// headers included.
	chain_len: usize,

	/// Offset of the first audio frame in the source
	audio_offset: usize,

	/// Total length of the source
	source_len: usize,

	blocks: Vec<FlacBlockEntry>,

	/// Set if we found a vorbis comment block we couldn't decode
	comment_error: Option<FlacDecodeError>,
}

impl FlacFile {
	/// Walk the metadata block chain of the given flac file.
	///
	/// A broken chain is an error. A vorbis comment or picture
	/// block we can't decode is kept as a raw block, see
	/// [`FlacFile::comment_error`].
	pub fn parse(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let prefix_len = if data.starts_with(b"ID3") {
			#[expect(clippy::map_err_ignore)]
			let len = tag_region_len(data).map_err(|_| FlacDecodeError::BadMagicBytes)?;
			trace!(message = "Skipping id3v2 tag before flac stream", len);
			len
		} else {
			0
		};

		let mut d = ByteCursor::new(data);
		d.seek(prefix_len)?;
		if d.read_bytes(4)? != FLAC_MAGIC {
			return Err(FlacDecodeError::BadMagicBytes);
		}

		let chain_start = d.position();
		let mut blocks = Vec::new();
		let mut comment_error = None;

		loop {
			let header = FlacMetablockHeader::decode(&mut d)?;
			let offset = d.position();
			let payload = d.read_bytes(header.length.try_into().unwrap())?;

			trace!(
				message = "Read flac metablock",
				block_type = ?header.block_type,
				offset,
				length = header.length
			);

			if blocks.is_empty() && header.block_type != FlacMetablockType::Streaminfo {
				return Err(FlacDecodeError::BadFirstBlock);
			}

			let block = match FlacBlock::decode(header.block_type, payload) {
				Ok(b) => b,

				// These are tag data, not stream structure.
				// Keep the bytes and move on.
				Err(e)
					if matches!(
						header.block_type,
						FlacMetablockType::VorbisComment | FlacMetablockType::Picture
					) =>
				{
					warn!(
						message = "Could not decode flac metablock, keeping it raw",
						block_type = ?header.block_type,
						error = %e
					);

					if header.block_type == FlacMetablockType::VorbisComment
						&& comment_error.is_none()
					{
						comment_error = Some(e);
					}

					FlacBlock::Raw(FlacRawBlock::decode(header.block_type, payload)?)
				}

				Err(e) => return Err(e),
			};

			blocks.push(FlacBlockEntry {
				offset: Some(offset),
				block,
			});

			if header.is_last {
				break;
			}
		}

		let audio_offset = d.position();
		debug!(
			message = "Walked flac block chain",
			n_blocks = blocks.len(),
			audio_offset
		);

		return Ok(Self {
			prefix_len,
			chain_len: audio_offset - chain_start,
			audio_offset,
			source_len: data.len(),
			blocks,
			comment_error,
		});
	}
}

impl FlacFile {
	/// All blocks, in file order
	pub fn blocks(&self) -> &[FlacBlockEntry] {
		&self.blocks
	}

	/// Find the first block of the given type
	pub fn find_block(&self, block_type: FlacMetablockType) -> Option<&FlacBlockEntry> {
		self.blocks
			.iter()
			.find(|x| x.block.block_type() == block_type)
	}

	/// Replace the first block of the given type with `block`.
	/// If there is no such block, `block` is inserted right after streaminfo.
	fn replace(&mut self, block: FlacBlock) {
		let block_type = block.block_type();
		let entry = FlacBlockEntry {
			offset: None,
			block,
		};

		match self
			.blocks
			.iter()
			.position(|x| x.block.block_type() == block_type)
		{
			Some(i) => self.blocks[i] = entry,
			None => self.blocks.insert(1.min(self.blocks.len()), entry),
		}
	}

	/// Replace the first block of the given type with a block
	/// decoded from `payload`.
	///
	/// Streaminfo may not be replaced.
	pub fn replace_block(
		&mut self,
		block_type: FlacMetablockType,
		payload: &[u8],
	) -> Result<(), FlacDecodeError> {
		if block_type == FlacMetablockType::Streaminfo {
			return Err(FlacDecodeError::BadFirstBlock);
		}

		let block = FlacBlock::decode(block_type, payload)?;
		if block_type == FlacMetablockType::VorbisComment {
			self.comment_error = None;
		}

		self.replace(block);
		return Ok(());
	}

	/// Replace this file's vorbis comment
	pub fn set_vorbis_comment(&mut self, comment: VorbisComment) {
		self.comment_error = None;
		self.replace(FlacBlock::VorbisComment(FlacCommentBlock { comment }));
	}

	/// This file's streaminfo block
	pub fn stream_info(&self) -> Option<&FlacStreaminfoBlock> {
		self.blocks.iter().find_map(|x| match &x.block {
			FlacBlock::Streaminfo(s) => Some(s),
			_ => None,
		})
	}

	/// This file's vorbis comment, if it has a valid one.
	pub fn vorbis_comment(&self) -> Option<&VorbisComment> {
		self.blocks.iter().find_map(|x| match &x.block {
			FlacBlock::VorbisComment(c) => Some(&c.comment),
			_ => None,
		})
	}

	/// The error we got decoding this file's vorbis comment block, if any.
	pub fn comment_error(&self) -> Option<&FlacDecodeError> {
		self.comment_error.as_ref()
	}

	/// All picture blocks in this file
	pub fn pictures(&self) -> impl Iterator<Item = &FlacPictureBlock> + '_ {
		self.blocks.iter().filter_map(|x| match &x.block {
			FlacBlock::Picture(p) => Some(p),
			_ => None,
		})
	}

	/// The number of audio bytes after the metadata chain
	pub fn audio_len(&self) -> usize {
		self.source_len.saturating_sub(self.audio_offset)
	}
}

impl FlacFile {
	/// Build a new file from this metadata and the audio frames in `source`,
	/// which must be the data this file was parsed from.
	///
	/// If the new block chain fits in the space the old one used,
	/// padding fills the difference and audio stays where it was.
	/// Otherwise, `padding` bytes of padding are added.
	pub fn render(&self, source: &[u8], padding: u32) -> Result<Vec<u8>, FlacEncodeError> {
		let blocks: Vec<&FlacBlock> = self
			.blocks
			.iter()
			.map(|x| &x.block)
			.filter(|x| x.block_type() != FlacMetablockType::Padding)
			.collect();

		let needed: usize = blocks
			.iter()
			.map(|x| 4 + usize::try_from(x.get_len()).unwrap())
			.sum();

		let max_pad = usize::try_from(MAX_BLOCK_LEN).unwrap();
		let new_padding = if needed == self.chain_len {
			None
		} else if needed + 4 <= self.chain_len && self.chain_len - needed - 4 <= max_pad {
			Some(self.chain_len - needed - 4)
		} else if padding == 0 {
			None
		} else {
			Some(usize::try_from(padding).unwrap().min(max_pad))
		};

		debug!(
			message = "Rendering flac metadata",
			old_len = self.chain_len,
			new_len = needed,
			padding = ?new_padding,
			in_place = needed + new_padding.map(|x| x + 4).unwrap_or(0) == self.chain_len
		);

		let audio = source.get(self.audio_offset..).unwrap_or(&[]);
		let mut out = Vec::with_capacity(
			self.prefix_len + 4 + needed + new_padding.unwrap_or(0) + 4 + audio.len(),
		);

		out.extend_from_slice(&source[..self.prefix_len.min(source.len())]);
		out.extend_from_slice(FLAC_MAGIC);

		let n = blocks.len();
		for (i, block) in blocks.into_iter().enumerate() {
			let is_last = i + 1 == n && new_padding.is_none();
			block.encode(is_last, true, &mut out)?;
		}

		if let Some(size) = new_padding {
			FlacPaddingBlock {
				size: u32::try_from(size).unwrap(),
			}
			.encode(true, true, &mut out)?;
		}

		out.extend_from_slice(audio);
		return Ok(out);
	}
}
