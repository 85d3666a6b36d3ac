//! ID3v2 tag headers

use super::{errors::Id3v2DecodeError, synchsafe};
use crate::common::bytes::ByteCursor;

/// The length of an id3v2 header (and footer)
pub const HEADER_LEN: usize = 10;

/// Header flag: the whole tag is unsynchronised
pub const FLAG_UNSYNC: u8 = 0x80;

/// Header flag: an extended header follows (v2.3, v2.4).
/// In v2.2, this bit means the tag is compressed.
pub const FLAG_EXTENDED: u8 = 0x40;

/// Header flag: a footer follows the tag (v2.4)
pub const FLAG_FOOTER: u8 = 0x10;

/// An id3v2 tag header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
	/// Major version: 2, 3, or 4
	pub major: u8,

	/// Revision number
	pub revision: u8,

	/// Header flags
	pub flags: u8,

	/// Size of the tag, excluding this header and the footer
	pub size: u32,
}

impl Id3v2Header {
	/// Decode a header from the start of `data`
	pub fn decode(data: &[u8]) -> Result<Self, Id3v2DecodeError> {
		let mut d = ByteCursor::new(data);

		if d.read_bytes(3)? != b"ID3" {
			return Err(Id3v2DecodeError::BadMagicBytes);
		}

		let major = d.read_u8()?;
		let revision = d.read_u8()?;
		if !(2..=4).contains(&major) || revision == 0xFF {
			return Err(Id3v2DecodeError::UnsupportedVersion(major));
		}

		let flags = d.read_u8()?;
		let size = synchsafe::decode(d.read_array::<4>()?)?;

		return Ok(Self {
			major,
			revision,
			flags,
			size,
		});
	}

	/// Encode this header
	pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), synchsafe::SynchsafeError> {
		out.extend_from_slice(b"ID3");
		out.extend_from_slice(&[self.major, self.revision, self.flags]);
		out.extend_from_slice(&synchsafe::encode(self.size)?);
		return Ok(());
	}

	/// Does this tag end with a footer?
	pub fn has_footer(&self) -> bool {
		self.major == 4 && self.flags & FLAG_FOOTER != 0
	}

	/// Is this tag unsynchronised as a whole?
	/// ID3v2.4 marks unsynchronisation per frame instead.
	pub fn is_unsynchronised(&self) -> bool {
		self.major < 4 && self.flags & FLAG_UNSYNC != 0
	}

	/// The number of bytes this tag occupies in a file:
	/// header, frames, padding, and footer.
	pub fn region_len(&self) -> usize {
		let footer = if self.has_footer() { HEADER_LEN } else { 0 };
		HEADER_LEN + usize::try_from(self.size).unwrap() + footer
	}
}

/// The number of bytes used by the id3v2 tag at the start of `data`
pub fn tag_region_len(data: &[u8]) -> Result<usize, Id3v2DecodeError> {
	return Ok(Id3v2Header::decode(data)?.region_len());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decode_v3() {
		let h = Id3v2Header::decode(b"ID3\x03\x00\x00\x00\x00\x02\x01").unwrap();
		assert_eq!(h.major, 3);
		assert_eq!(h.size, 257);
		assert_eq!(h.region_len(), 267);
		assert!(!h.has_footer());

		let mut out = Vec::new();
		h.encode(&mut out).unwrap();
		assert_eq!(out, b"ID3\x03\x00\x00\x00\x00\x02\x01");
	}

	#[test]
	fn footer_counts() {
		let h = Id3v2Header::decode(b"ID3\x04\x00\x10\x00\x00\x00\x05").unwrap();
		assert!(h.has_footer());
		assert_eq!(h.region_len(), 25);
	}

	#[test]
	fn rejects() {
		assert!(matches!(
			Id3v2Header::decode(b"ID4\x03\x00\x00\x00\x00\x00\x00"),
			Err(Id3v2DecodeError::BadMagicBytes)
		));
		assert!(matches!(
			Id3v2Header::decode(b"ID3\x05\x00\x00\x00\x00\x00\x00"),
			Err(Id3v2DecodeError::UnsupportedVersion(5))
		));
		assert!(matches!(
			Id3v2Header::decode(b"ID3\x03\x00\x00\x80\x00\x00\x00"),
			Err(Id3v2DecodeError::InvalidSynchsafeInt(_))
		));
		assert!(matches!(
			Id3v2Header::decode(b"ID3\x03"),
			Err(Id3v2DecodeError::OutOfBounds(_))
		));
	}
}
