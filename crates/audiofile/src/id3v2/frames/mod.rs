//! Read and write id3v2 frames

use smartstring::{LazyCompact, SmartString};
use std::borrow::Cow;
use tracing::{trace, warn};

use super::{
	errors::{Id3v2DecodeError, Id3v2EncodeError},
	synchsafe,
};
use crate::common::bytes::ByteCursor;

mod comment;
mod picture;
mod text;
mod unknown;

pub use comment::CommentFrame;
pub use picture::AttachedPictureFrame;
pub use text::TextFrame;
pub use unknown::UnknownFrame;

/// A frame id, like `TIT2` (v2.3, v2.4) or `TT2` (v2.2)
pub type FrameId = SmartString<LazyCompact>;

// Frame flags we need to look at. Everything else is kept as-is
// in unknown frames and dropped from frames we decode.
const V3_COMPRESSION: u16 = 0x0080;
const V3_ENCRYPTION: u16 = 0x0040;
const V3_GROUPING: u16 = 0x0020;

const V4_GROUPING: u16 = 0x0040;
const V4_COMPRESSION: u16 = 0x0008;
const V4_ENCRYPTION: u16 = 0x0004;
const V4_UNSYNC: u16 = 0x0002;
const V4_DATA_LENGTH: u16 = 0x0001;

/// The length of a frame id in the given major version
pub fn frame_id_len(major: u8) -> usize {
	if major == 2 {
		3
	} else {
		4
	}
}

fn frame_header_len(major: u8) -> usize {
	if major == 2 {
		6
	} else {
		10
	}
}

/// Is `id` a valid frame id in the given major version?
/// Ids are case-sensitive: only `A-Z` and `0-9` are allowed.
pub fn valid_frame_id(id: &[u8], major: u8) -> bool {
	id.len() == frame_id_len(major)
		&& id
			.iter()
			.all(|x| x.is_ascii_uppercase() || x.is_ascii_digit())
}

/// A single id3v2 frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Id3v2Frame {
	/// A `T***` frame
	Text(TextFrame),

	/// A `COMM` frame
	Comment(CommentFrame),

	/// An `APIC` frame
	Picture(AttachedPictureFrame),

	/// Anything else
	Unknown(UnknownFrame),
}

impl Id3v2Frame {
	/// This frame's id in the given major version
	pub fn id(&self, major: u8) -> &str {
		match self {
			Self::Text(t) => &t.id,
			Self::Unknown(u) => &u.id,
			Self::Comment(_) if major == 2 => "COM",
			Self::Comment(_) => "COMM",
			Self::Picture(_) if major == 2 => "PIC",
			Self::Picture(_) => "APIC",
		}
	}

	fn decode_body(id: &str, major: u8, body: &[u8]) -> Result<Option<Self>, Id3v2DecodeError> {
		let is_v2 = major == 2;

		Ok(Some(match id {
			"APIC" if !is_v2 => Self::Picture(AttachedPictureFrame::decode_body(major, body)?),
			"PIC" if is_v2 => Self::Picture(AttachedPictureFrame::decode_body(major, body)?),
			"COMM" if !is_v2 => Self::Comment(CommentFrame::decode_body(body)?),
			"COM" if is_v2 => Self::Comment(CommentFrame::decode_body(body)?),

			// User-defined text frames have a description first
			"TXXX" | "TXX" => return Ok(None),
			x if x.starts_with('T') => Self::Text(TextFrame::decode_body(id, body)?),

			_ => return Ok(None),
		}))
	}

	/// Read one frame from `d`.
	///
	/// Returns `None` if we've reached padding, or if there
	/// isn't room for another frame header.
	pub fn parse(d: &mut ByteCursor<'_>, major: u8) -> Result<Option<Self>, Id3v2DecodeError> {
		if d.remaining() < frame_header_len(major) || d.peek(1)?[0] == 0 {
			return Ok(None);
		}

		let id_bytes = d.read_bytes(frame_id_len(major))?;
		if !valid_frame_id(id_bytes, major) {
			return Err(Id3v2DecodeError::MalformedFrame(format!(
				"invalid frame id `{}` at offset {}",
				String::from_utf8_lossy(id_bytes),
				d.position() - id_bytes.len()
			)));
		}
		// Checked above, this is ascii
		let id = String::from_utf8_lossy(id_bytes);

		let size: usize = match major {
			2 => d.read_u24_be()?,
			3 => d.read_u32_be()?,
			_ => synchsafe::decode(d.read_array::<4>()?)?,
		}
		.try_into()
		.unwrap();

		let flags = if major == 2 { 0 } else { d.read_u16_be()? };

		if size > d.remaining() {
			return Err(Id3v2DecodeError::MalformedFrame(format!(
				"frame {id} claims {size} bytes, but only {} remain",
				d.remaining()
			)));
		}
		let payload = d.read_bytes(size)?;

		trace!(message = "Read id3v2 frame", id = &*id, size, flags);

		let unknown = || {
			Self::Unknown(UnknownFrame {
				id: FrameId::from(&*id),
				flags,
				payload: payload.to_vec(),
			})
		};

		let (opaque, unsync, data_length) = match major {
			3 => (
				flags & (V3_COMPRESSION | V3_ENCRYPTION | V3_GROUPING) != 0,
				false,
				false,
			),
			4 => (
				flags & (V4_COMPRESSION | V4_ENCRYPTION | V4_GROUPING) != 0,
				flags & V4_UNSYNC != 0,
				flags & V4_DATA_LENGTH != 0,
			),
			_ => (false, false, false),
		};

		if opaque {
			return Ok(Some(unknown()));
		}

		let mut body = Cow::Borrowed(payload);
		if unsync {
			body = Cow::Owned(synchsafe::resync(&body));
		}
		if data_length {
			// We don't need the decoded length, we have the data.
			body = match body {
				Cow::Borrowed(x) => Cow::Borrowed(x.get(4..).unwrap_or(&[])),
				Cow::Owned(x) => Cow::Owned(x.get(4..).unwrap_or(&[]).to_vec()),
			};
		}

		match Self::decode_body(&id, major, &body) {
			Ok(Some(f)) => Ok(Some(f)),
			Ok(None) => Ok(Some(unknown())),
			Err(e) => {
				// A frame we should understand, but can't.
				// Keep its bytes so we don't lose anything.
				warn!(
					message = "Could not decode id3v2 frame, keeping it raw",
					id = &*id,
					error = %e
				);
				Ok(Some(unknown()))
			}
		}
	}

	/// Append this frame to `out` in the given major version
	pub fn encode(&self, major: u8, out: &mut Vec<u8>) -> Result<(), Id3v2EncodeError> {
		let id = self.id(major);
		if !valid_frame_id(id.as_bytes(), major) {
			return Err(Id3v2EncodeError::BadFrameId(id.to_owned(), major));
		}

		let mut body = Vec::new();
		let flags = match self {
			Self::Text(t) => {
				t.encode_body(major, &mut body);
				0
			}
			Self::Comment(c) => {
				c.encode_body(major, &mut body);
				0
			}
			Self::Picture(p) => {
				p.encode_body(major, &mut body);
				0
			}
			Self::Unknown(u) => {
				body.extend_from_slice(&u.payload);
				u.flags
			}
		};

		out.extend_from_slice(id.as_bytes());
		match major {
			2 => {
				let len = u32::try_from(body.len())
					.ok()
					.filter(|x| *x <= 0x00FF_FFFF)
					.ok_or(Id3v2EncodeError::TooLarge(body.len()))?;
				out.extend_from_slice(&len.to_be_bytes()[1..]);
			}
			3 => {
				let len =
					u32::try_from(body.len()).or(Err(Id3v2EncodeError::TooLarge(body.len())))?;
				out.extend_from_slice(&len.to_be_bytes());
			}
			_ => {
				let len =
					u32::try_from(body.len()).or(Err(Id3v2EncodeError::TooLarge(body.len())))?;
				out.extend_from_slice(&synchsafe::encode(len)?);
			}
		}

		if major != 2 {
			out.extend_from_slice(&flags.to_be_bytes());
		}

		out.extend_from_slice(&body);
		return Ok(());
	}
}
