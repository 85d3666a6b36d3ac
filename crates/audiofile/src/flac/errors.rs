//! FLAC errors
use crate::common::{
	bytes::CursorError,
	vorbiscomment::{VorbisCommentDecodeError, VorbisCommentEncodeError},
};
use std::string::FromUtf8Error;
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FlacDecodeError {
	/// FLAC does not start with 0x66 0x4C 0x61 0x43
	#[error("flac signature is missing or malformed")]
	BadMagicBytes,

	/// The first metablock isn't StreamInfo
	#[error("first metablock isn't streaminfo")]
	BadFirstBlock,

	/// We got an invalid metadata block type
	#[error("invalid flac metablock type {0}")]
	BadMetablockType(u8),

	/// A block or the block chain ended early
	#[error("flac data is truncated")]
	Truncated(#[from] CursorError),

	/// We could not parse a vorbis comment
	#[error("error while decoding vorbis comment")]
	VorbisComment(#[from] VorbisCommentDecodeError),

	/// We tried to decode a string, but found invalid UTF-8
	#[error("error while decoding string")]
	FailedStringDecode(#[from] FromUtf8Error),

	/// We tried to read a block, but it was out of spec.
	#[error("malformed flac block")]
	MalformedBlock,
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FlacEncodeError {
	/// We encountered an i/o error while processing
	#[error("io error while encoding block")]
	IoError(#[from] std::io::Error),

	/// Metablock lengths are 24 bits wide
	#[error("flac block of {0} bytes is too large")]
	BlockTooLarge(usize),

	/// We could not encode a vorbis comment
	#[error("could not encode vorbis comment")]
	VorbisComment(#[source] VorbisCommentEncodeError),
}

impl From<VorbisCommentEncodeError> for FlacEncodeError {
	fn from(value: VorbisCommentEncodeError) -> Self {
		match value {
			VorbisCommentEncodeError::IoError(e) => e.into(),
			x => Self::VorbisComment(x),
		}
	}
}
