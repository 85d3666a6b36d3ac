//! Read and rewrite the headers of an ogg vorbis stream.

use tracing::{debug, trace, warn};

use super::{
	errors::{OggDecodeError, OggEncodeError},
	page::{OggPage, FLAG_BOS},
};
use crate::common::{bytes::ByteCursor, vorbiscomment::VorbisComment};

const IDENT_TYPE: u8 = 0x01;
const COMMENT_TYPE: u8 = 0x03;
const SETUP_TYPE: u8 = 0x05;
const VORBIS: &[u8; 6] = b"vorbis";

/// The fields of a vorbis identification header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VorbisIdent {
	/// Number of audio channels
	pub channels: u8,

	/// Sample rate, in hz
	pub sample_rate: u32,

	/// Bitrate hints, in bits per second.
	/// Zero or negative means "unset".
	pub bitrate_max: i32,
	pub bitrate_nominal: i32,
	pub bitrate_min: i32,
}

impl VorbisIdent {
	fn decode(packet: &[u8]) -> Result<Self, OggDecodeError> {
		let mut d = ByteCursor::new(packet);

		if d.read_u8()? != IDENT_TYPE || d.read_bytes(6)? != VORBIS {
			return Err(OggDecodeError::NotVorbis);
		}

		let version = d.read_u32_le()?;
		if version != 0 {
			return Err(OggDecodeError::NotVorbis);
		}

		return Ok(Self {
			channels: d.read_u8()?,
			sample_rate: d.read_u32_le()?,
			bitrate_max: i32::from_le_bytes(d.read_array::<4>()?),
			bitrate_nominal: i32::from_le_bytes(d.read_array::<4>()?),
			bitrate_min: i32::from_le_bytes(d.read_array::<4>()?),
		});
	}
}

/// An ogg vorbis stream.
///
/// Only the first logical stream is interpreted. Pages that belong to
/// other streams are kept and written back untouched.
#[derive(Debug)]
pub struct OggVorbisFile {
	pages: Vec<OggPage>,

	/// The serial number of the vorbis stream
	serial: u32,

	/// Index of the first page after the last header page
	header_end: usize,

	/// Bytes after the last page we could read
	tail: Vec<u8>,

	/// Number of source bytes after the header pages
	audio_len: usize,

	ident: VorbisIdent,
	ident_packet: Vec<u8>,
	comment_packet: Vec<u8>,
	setup_packet: Vec<u8>,

	comment: Option<VorbisComment>,
	comment_error: Option<OggDecodeError>,

	/// If false, `render()` writes back the pages we read.
	dirty: bool,
}

impl OggVorbisFile {
	/// Read the pages of the given stream and decode its vorbis headers.
	///
	/// Header pages must be intact. After them, we stop at the first page
	/// we can't read, and keep everything from there on as raw bytes.
	/// A comment header we can't decode is not an error,
	/// see [`OggVorbisFile::comment_error`].
	pub fn parse(data: &[u8]) -> Result<Self, OggDecodeError> {
		let mut d = ByteCursor::new(data);
		let mut pages = Vec::new();
		let mut stream_serial = None;

		// Reassemble the three header packets
		let mut packets: Vec<Vec<u8>> = Vec::with_capacity(3);
		let mut current = Vec::new();
		let mut header_end = None;

		while header_end.is_none() && !d.is_empty() {
			let page = OggPage::decode(&mut d)?;
			let serial = *stream_serial.get_or_insert(page.serial);

			if page.serial == serial {
				let mut offset = 0;
				for (j, lace) in page.segments.iter().enumerate() {
					let n = usize::from(*lace);
					current.extend_from_slice(&page.data[offset..offset + n]);
					offset += n;

					if *lace < 255 {
						packets.push(std::mem::take(&mut current));

						if packets.len() == 3 {
							if j + 1 != page.segments.len() {
								return Err(OggDecodeError::MalformedPage(
									"audio data shares a page with the setup header".into(),
								));
							}
							header_end = Some(pages.len() + 1);
							break;
						}
					}
				}
			}

			pages.push(page);
		}

		let header_bytes = d.position();
		let serial = stream_serial.ok_or(OggDecodeError::MissingHeader("identification"))?;

		let mut packets = packets.into_iter();
		let ident_packet = packets
			.next()
			.ok_or(OggDecodeError::MissingHeader("identification"))?;
		let ident = VorbisIdent::decode(&ident_packet)?;

		let comment_packet = packets
			.next()
			.ok_or(OggDecodeError::MissingHeader("comment"))?;
		let setup_packet = packets
			.next()
			.ok_or(OggDecodeError::MissingHeader("setup"))?;
		let header_end = header_end.ok_or(OggDecodeError::MissingHeader("setup"))?;

		if !comment_packet.starts_with(&[COMMENT_TYPE])
			|| comment_packet.get(1..7) != Some(&VORBIS[..])
		{
			return Err(OggDecodeError::MissingHeader("comment"));
		}

		if !setup_packet.starts_with(&[SETUP_TYPE]) || setup_packet.get(1..7) != Some(&VORBIS[..])
		{
			return Err(OggDecodeError::MissingHeader("setup"));
		}

		let (comment, comment_error) = match VorbisComment::decode(&comment_packet[7..]) {
			Ok(c) => (Some(c), None),
			Err(e) => {
				warn!(message = "Could not decode vorbis comment header", error = %e);
				(None, Some(OggDecodeError::from(e)))
			}
		};

		let mut tail = Vec::new();
		while !d.is_empty() {
			let start = d.position();
			match OggPage::decode(&mut d) {
				Ok(page) => pages.push(page),
				Err(e) => {
					warn!(
						message = "Could not read ogg page, keeping the rest of the stream as-is",
						offset = start,
						error = %e
					);
					tail = data[start..].to_vec();
					break;
				}
			}
		}

		debug!(
			message = "Read ogg vorbis headers",
			n_pages = pages.len(),
			header_pages = header_end,
			header_bytes,
			tail_len = tail.len(),
			sample_rate = ident.sample_rate,
			channels = ident.channels
		);

		return Ok(Self {
			pages,
			serial,
			header_end,
			tail,
			audio_len: data.len() - header_bytes,
			ident,
			ident_packet,
			comment_packet,
			setup_packet,
			comment,
			comment_error,
			dirty: false,
		});
	}
}

impl OggVorbisFile {
	/// This stream's identification header
	pub fn ident(&self) -> &VorbisIdent {
		&self.ident
	}

	/// This stream's comment, if it has a valid one.
	pub fn vorbis_comment(&self) -> Option<&VorbisComment> {
		self.comment.as_ref()
	}

	/// The error we got decoding this stream's comment header, if any.
	pub fn comment_error(&self) -> Option<&OggDecodeError> {
		self.comment_error.as_ref()
	}

	/// Replace this stream's comment header
	pub fn set_vorbis_comment(&mut self, comment: VorbisComment) -> Result<(), OggEncodeError> {
		let mut packet = Vec::with_capacity(7 + comment.get_len() + 1);
		packet.push(COMMENT_TYPE);
		packet.extend_from_slice(VORBIS);
		comment.encode(&mut packet)?;
		// Framing bit
		packet.push(0x01);

		self.comment_packet = packet;
		self.comment = Some(comment);
		self.comment_error = None;
		self.dirty = true;
		return Ok(());
	}

	/// The granule position of the last vorbis page,
	/// which is this stream's length in samples.
	pub fn last_granule(&self) -> u64 {
		self.pages[self.header_end..]
			.iter()
			.rev()
			.filter(|p| p.serial == self.serial)
			.find(|p| p.granule != u64::MAX)
			.map(|p| p.granule)
			.unwrap_or(0)
	}

	/// The number of bytes after the header pages
	pub fn audio_len(&self) -> usize {
		self.audio_len
	}

	/// Build a new stream with this file's headers.
	///
	/// Header packets are laid out on fresh pages. Every later page of
	/// the vorbis stream is renumbered and gets a new checksum,
	/// audio payloads are not touched.
	pub fn render(&self) -> Vec<u8> {
		let mut out = Vec::new();

		if !self.dirty {
			for p in &self.pages {
				p.encode(&mut out);
			}
			out.extend_from_slice(&self.tail);
			return out;
		}

		let first_sequence = self.pages[0].sequence;
		let mut ident = OggPage::paginate(&[&self.ident_packet], self.serial, first_sequence, 0);
		for p in &mut ident {
			p.header_type |= FLAG_BOS;
		}

		let next = first_sequence.wrapping_add(u32::try_from(ident.len()).unwrap());
		let rest = OggPage::paginate(
			&[&self.comment_packet, &self.setup_packet],
			self.serial,
			next,
			0,
		);

		let old_count = self.pages[..self.header_end]
			.iter()
			.filter(|p| p.serial == self.serial)
			.count();
		let new_count = ident.len() + rest.len();

		trace!(
			message = "Repaginated vorbis headers",
			old_pages = old_count,
			new_pages = new_count
		);

		let mut headers_written = false;
		for p in &self.pages[..self.header_end] {
			if p.serial != self.serial {
				p.encode(&mut out);
			} else if !headers_written {
				for h in ident.iter().chain(rest.iter()) {
					h.encode(&mut out);
				}
				headers_written = true;
			}
		}

		let old_count = u32::try_from(old_count).unwrap();
		let new_count = u32::try_from(new_count).unwrap();
		for p in &self.pages[self.header_end..] {
			if p.serial == self.serial {
				let mut p = p.clone();
				p.sequence = p.sequence.wrapping_add(new_count).wrapping_sub(old_count);
				p.encode(&mut out);
			} else {
				p.encode(&mut out);
			}
		}

		out.extend_from_slice(&self.tail);
		return out;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{common::tagtype::TagType, testdata};

	#[test]
	fn parse_headers() {
		let data = testdata::ogg_vorbis(&[("TITLE", "Song"), ("ARTIST", "Someone")]);
		let f = OggVorbisFile::parse(&data).unwrap();

		assert_eq!(f.ident().sample_rate, 44_100);
		assert_eq!(f.ident().channels, 2);
		assert_eq!(f.ident().bitrate_nominal, 128_000);
		assert_eq!(f.last_granule(), 88_200);

		let c = f.vorbis_comment().unwrap();
		assert_eq!(c.get_first(&TagType::TrackTitle), Some("Song"));
		assert_eq!(c.get_first(&TagType::TrackArtist), Some("Someone"));
		assert!(f.comment_error().is_none());
	}

	#[test]
	fn unchanged_render_is_identical() {
		let data = testdata::ogg_vorbis(&[("TITLE", "Song")]);
		let f = OggVorbisFile::parse(&data).unwrap();
		assert_eq!(f.render(), data);
	}

	#[test]
	fn large_comment_spans_pages() {
		let data = testdata::ogg_vorbis(&[("TITLE", "Song")]);
		let old = OggVorbisFile::parse(&data).unwrap();

		let mut c = old.vorbis_comment().unwrap().clone();
		let long = "x".repeat(70_000);
		c.set(&TagType::Comment, &long);

		let mut f = OggVorbisFile::parse(&data).unwrap();
		f.set_vorbis_comment(c).unwrap();
		let out = f.render();

		let new = OggVorbisFile::parse(&out).unwrap();
		assert_eq!(
			new.vorbis_comment().unwrap().get_first(&TagType::Comment),
			Some(long.as_str())
		);
		assert_eq!(new.last_granule(), old.last_granule());
		assert_eq!(new.audio_len(), old.audio_len());
		assert!(new.header_end > old.header_end);

		// Sequence numbers stay contiguous
		for (i, p) in new.pages.iter().enumerate() {
			assert_eq!(p.sequence, u32::try_from(i).unwrap());
		}

		// Audio payloads are untouched
		let old_audio: Vec<&Vec<u8>> = old.pages[old.header_end..].iter().map(|p| &p.data).collect();
		let new_audio: Vec<&Vec<u8>> = new.pages[new.header_end..].iter().map(|p| &p.data).collect();
		assert_eq!(old_audio, new_audio);

		// Rendering again changes nothing
		let mut again = OggVorbisFile::parse(&out).unwrap();
		let c = again.vorbis_comment().unwrap().clone();
		again.set_vorbis_comment(c).unwrap();
		assert_eq!(again.render(), out);
	}

	#[test]
	fn damaged_audio_is_kept() {
		let mut data = testdata::ogg_vorbis(&[("TRACKNUMBER", "7")]);
		let n = data.len();
		data[n - 1] ^= 0xFF;

		let f = OggVorbisFile::parse(&data).unwrap();
		assert_eq!(
			f.vorbis_comment().unwrap().get_first(&TagType::TrackNumber),
			Some("7")
		);
		// Only the first audio page is readable
		assert_eq!(f.last_granule(), 44_100);
		assert!(!f.tail.is_empty());
		assert_eq!(f.render(), data);

		let mut f = f;
		let mut c = f.vorbis_comment().unwrap().clone();
		c.set(&TagType::TrackTitle, "Song");
		f.set_vorbis_comment(c).unwrap();
		let out = f.render();
		assert!(out.ends_with(&f.tail));

		let g = OggVorbisFile::parse(&out).unwrap();
		assert_eq!(
			g.vorbis_comment().unwrap().get_first(&TagType::TrackTitle),
			Some("Song")
		);
		assert_eq!(g.tail, f.tail);
	}

	#[test]
	fn truncated_audio_is_kept() {
		let data = testdata::ogg_vorbis(&[("TRACKNUMBER", "7")]);
		let data = &data[..data.len() - 5];

		let f = OggVorbisFile::parse(data).unwrap();
		assert!(f.vorbis_comment().is_some());
		assert_eq!(f.render(), data);
	}

	#[test]
	fn trailing_garbage_is_kept() {
		let mut data = testdata::ogg_vorbis(&[("TRACKNUMBER", "7")]);
		data.extend_from_slice(b"TAG");
		data.extend([0u8; 125]);

		let f = OggVorbisFile::parse(&data).unwrap();
		assert_eq!(f.last_granule(), 88_200);
		assert_eq!(f.tail.len(), 128);
		assert_eq!(f.render(), data);
	}

	#[test]
	fn damaged_header_page_fails() {
		let mut data = testdata::ogg_vorbis(&[]);
		// Inside the identification packet
		data[40] ^= 0xFF;
		assert!(matches!(
			OggVorbisFile::parse(&data),
			Err(OggDecodeError::BadChecksum(0))
		));
	}

	#[test]
	fn not_vorbis() {
		let mut ident = testdata::vorbis_ident();
		ident[1..7].copy_from_slice(b"theora");
		let data = testdata::ogg_stream(&[&ident], &[]);
		assert!(matches!(
			OggVorbisFile::parse(&data),
			Err(OggDecodeError::NotVorbis)
		));
	}

	#[test]
	fn missing_setup() {
		let ident = testdata::vorbis_ident();
		let comment = testdata::vorbis_comment_packet(&[]);
		let data = testdata::ogg_stream(&[&ident, &comment], &[]);
		assert!(matches!(
			OggVorbisFile::parse(&data),
			Err(OggDecodeError::MissingHeader("setup"))
		));
	}

	#[test]
	fn corrupt_comment_is_recorded() {
		let ident = testdata::vorbis_ident();
		// Vendor length runs past the end of the packet
		let comment = b"\x03vorbis\xFF\xFF\x00\x00abc\x01".to_vec();
		let setup = testdata::vorbis_setup();
		let data = testdata::ogg_stream(&[&ident, &comment, &setup], &[]);

		let mut f = OggVorbisFile::parse(&data).unwrap();
		assert!(f.vorbis_comment().is_none());
		assert!(matches!(
			f.comment_error(),
			Some(OggDecodeError::VorbisComment(_))
		));

		f.set_vorbis_comment(VorbisComment::new("tagcore")).unwrap();
		assert!(f.comment_error().is_none());
		let f = OggVorbisFile::parse(&f.render()).unwrap();
		assert_eq!(f.vorbis_comment().unwrap().vendor.as_str(), "tagcore");
	}
}
