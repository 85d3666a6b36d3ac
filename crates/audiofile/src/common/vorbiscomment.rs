//! Decode and write Vorbis comment blocks

use base64::Engine;
use smartstring::{LazyCompact, SmartString};
use std::{io::Write, string::FromUtf8Error};
use thiserror::Error;
use tracing::{trace, warn};

use super::{
	bytes::{ByteCursor, CursorError},
	tagtype::TagType,
};
use crate::flac::blocks::{FlacMetablockDecode, FlacMetablockEncode, FlacPictureBlock};

const PICTURE_KEY: &str = "METADATA_BLOCK_PICTURE";

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum VorbisCommentDecodeError {
	/// The comment we're reading is truncated
	#[error("malformed comment data")]
	MalformedData(#[from] CursorError),

	/// We tried to decode a string, but got invalid data
	#[error("string decode error while reading vorbis comments")]
	FailedStringDecode(#[from] FromUtf8Error),

	/// The given comment string isn't within spec
	#[error("malformed comment string `{0}`")]
	MalformedCommentString(String),
}

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum VorbisCommentEncodeError {
	/// We encountered an IoError while writing a block
	#[error("io error while writing vorbis comments")]
	IoError(#[from] std::io::Error),

	/// A length does not fit in 32 bits
	#[error("vorbis comment is too large")]
	TooLarge,

	/// We could not encode picture data
	#[error("could not encode picture")]
	PictureEncodeError,
}

/// A decoded vorbis comment block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VorbisComment {
	/// This comment's vendor string
	pub vendor: SmartString<LazyCompact>,

	/// List of (key, value), in file order.
	/// Repeated keys are allowed!
	pub comments: Vec<(SmartString<LazyCompact>, String)>,

	/// A list of pictures found in this comment
	pub pictures: Vec<FlacPictureBlock>,
}

fn read_string(d: &mut ByteCursor<'_>) -> Result<String, VorbisCommentDecodeError> {
	let length: usize = d.read_u32_le()?.try_into().unwrap();
	let text = d.read_bytes(length)?;
	return Ok(String::from_utf8(text.to_vec())?);
}

impl VorbisComment {
	/// Make an empty comment with the given vendor string
	pub fn new(vendor: &str) -> Self {
		Self {
			vendor: vendor.into(),
			comments: Vec::new(),
			pictures: Vec::new(),
		}
	}

	/// Try to decode the given data as a vorbis comment block.
	/// Bytes after the last comment are ignored.
	pub fn decode(data: &[u8]) -> Result<Self, VorbisCommentDecodeError> {
		let mut d = ByteCursor::new(data);

		let vendor = read_string(&mut d)?;
		let n_comments: usize = d.read_u32_le()?.try_into().unwrap();

		// Don't trust `n_comments` for allocation
		let mut comments = Vec::with_capacity(n_comments.min(d.remaining()));
		let mut pictures = Vec::new();

		for _ in 0..n_comments {
			let comment = read_string(&mut d)?;
			let (var, val) =
				comment
					.split_once('=')
					.ok_or(VorbisCommentDecodeError::MalformedCommentString(
						comment.clone(),
					))?;

			if var.eq_ignore_ascii_case(PICTURE_KEY) {
				let picture = base64::prelude::BASE64_STANDARD
					.decode(val)
					.ok()
					.and_then(|x| FlacPictureBlock::decode(&x).ok());

				match picture {
					Some(p) => {
						pictures.push(p);
						continue;
					}
					None => {
						// Keep it as a plain comment, so we don't lose data
						warn!(message = "Could not decode picture in vorbis comment");
					}
				}
			}

			trace!(message = "Read vorbis comment", key = var);
			comments.push((var.into(), val.into()));
		}

		Ok(Self {
			vendor: vendor.into(),
			comments,
			pictures,
		})
	}
}

impl VorbisComment {
	/// Iterate over all values with the given tag type, in order.
	pub fn get_all<'a>(&'a self, tag: &TagType) -> impl Iterator<Item = &'a str> + 'a {
		let tag = tag.clone();
		self.comments
			.iter()
			.filter(move |(k, _)| TagType::from_vorbis_key(k) == tag)
			.map(|(_, v)| v.as_str())
	}

	/// Get the first value with the given tag type
	pub fn get_first(&self, tag: &TagType) -> Option<&str> {
		self.get_all(tag).next()
	}

	/// Replace every value of the given tag type with `value`.
	/// The new value takes the place of the first old one,
	/// or is appended if there was none.
	pub fn set(&mut self, tag: &TagType, value: &str) {
		let first = self
			.comments
			.iter()
			.position(|(k, _)| TagType::from_vorbis_key(k) == *tag);

		match first {
			Some(i) => {
				self.comments[i].1 = value.into();
				let mut idx = 0;
				self.comments.retain(|(k, _)| {
					let keep = idx <= i || TagType::from_vorbis_key(k) != *tag;
					idx += 1;
					keep
				});
			}
			None => self.comments.push((tag.vorbis_key(), value.into())),
		}
	}

	/// Remove every value of the given tag type
	pub fn remove(&mut self, tag: &TagType) {
		self.comments
			.retain(|(k, _)| TagType::from_vorbis_key(k) != *tag);
	}

	/// Add a value without touching existing ones.
	pub fn push(&mut self, tag: &TagType, value: &str) {
		self.comments.push((tag.vorbis_key(), value.into()));
	}
}

impl VorbisComment {
	fn encode_picture(p: &FlacPictureBlock) -> Result<String, VorbisCommentEncodeError> {
		let mut pic_data = Vec::new();

		#[expect(clippy::map_err_ignore)]
		p.encode(false, false, &mut pic_data)
			.map_err(|_| VorbisCommentEncodeError::PictureEncodeError)?;

		return Ok(format!(
			"{PICTURE_KEY}={}",
			&base64::prelude::BASE64_STANDARD.encode(&pic_data)
		));
	}

	/// Get the number of bytes that `encode()` will write.
	pub fn get_len(&self) -> usize {
		let mut sum = 4 + self.vendor.len() + 4;

		for (key, value) in &self.comments {
			// `key=value`
			sum += 4 + key.len() + 1 + value.len();
		}

		for p in &self.pictures {
			// Base64 is 4 chars per 3 bytes, padded
			let x = usize::try_from(p.get_len()).unwrap();
			sum += 4 + PICTURE_KEY.len() + 1 + 4 * x.div_ceil(3);
		}

		return sum;
	}

	/// Try to encode this vorbis comment
	pub fn encode(&self, target: &mut impl Write) -> Result<(), VorbisCommentEncodeError> {
		#[expect(clippy::map_err_ignore)]
		let len_bytes = |x: usize| -> Result<[u8; 4], VorbisCommentEncodeError> {
			Ok(u32::try_from(x)
				.map_err(|_| VorbisCommentEncodeError::TooLarge)?
				.to_le_bytes())
		};

		target.write_all(&len_bytes(self.vendor.len())?)?;
		target.write_all(self.vendor.as_bytes())?;

		target.write_all(&len_bytes(self.comments.len() + self.pictures.len())?)?;

		for (key, value) in &self.comments {
			// Keys are ascii, so this doesn't change their length
			let str = format!("{}={value}", key.to_ascii_uppercase());
			target.write_all(&len_bytes(str.len())?)?;
			target.write_all(str.as_bytes())?;
		}

		for p in &self.pictures {
			let pic_string = Self::encode_picture(p)?;
			target.write_all(&len_bytes(pic_string.len())?)?;
			target.write_all(pic_string.as_bytes())?;
		}

		return Ok(());
	}

	/// Encode this comment into a new buffer
	pub fn to_bytes(&self) -> Result<Vec<u8>, VorbisCommentEncodeError> {
		let mut out = Vec::with_capacity(self.get_len());
		self.encode(&mut out)?;
		return Ok(out);
	}
}
