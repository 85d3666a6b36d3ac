//! ID3v2 errors
use thiserror::Error;

use super::synchsafe::SynchsafeError;
use crate::common::bytes::CursorError;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Id3v2DecodeError {
	/// Tag does not start with `ID3`
	#[error("id3v2 signature is missing")]
	BadMagicBytes,

	/// We only read versions 2.2, 2.3, and 2.4
	#[error("unsupported id3v2 version 2.{0}")]
	UnsupportedVersion(u8),

	/// A frame header is invalid, or a frame claims
	/// more bytes than the tag has left.
	#[error("malformed id3v2 frame: {0}")]
	MalformedFrame(String),

	/// We tried to read past the end of a tag or frame
	#[error("id3v2 data ends early")]
	OutOfBounds(#[from] CursorError),

	/// A synchsafe integer has a byte with its high bit set
	#[error("invalid synchsafe integer")]
	InvalidSynchsafeInt(#[from] SynchsafeError),

	/// A text encoding byte outside of 0..=3
	#[error("invalid text encoding {0}")]
	BadEncoding(u8),

	/// Text could not be decoded with its declared encoding
	#[error("could not decode {0} string")]
	FailedStringDecode(&'static str),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Id3v2EncodeError {
	/// A frame or tag does not fit in its size field
	#[error("id3v2 data of {0} bytes is too large")]
	TooLarge(usize),

	/// A frame id isn't valid for this tag's version
	#[error("frame id `{0}` is not valid in id3v2.{1}")]
	BadFrameId(String, u8),
}

impl From<SynchsafeError> for Id3v2EncodeError {
	fn from(value: SynchsafeError) -> Self {
		match value {
			SynchsafeError::TooLarge(x) => Self::TooLarge(x.try_into().unwrap_or(usize::MAX)),
			SynchsafeError::InvalidSynchsafeInt(_) => Self::TooLarge(usize::MAX),
		}
	}
}
