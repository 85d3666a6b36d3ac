//! Ogg errors
use thiserror::Error;

use crate::common::{
	bytes::CursorError,
	vorbiscomment::{VorbisCommentDecodeError, VorbisCommentEncodeError},
};

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum OggDecodeError {
	/// A page doesn't start with `OggS`
	#[error("no ogg capture pattern at offset {0}")]
	BadCapturePattern(usize),

	/// A page's checksum doesn't match its contents
	#[error("bad checksum on ogg page {0}")]
	BadChecksum(u32),

	/// The stream ended before all vorbis headers were read
	#[error("missing vorbis {0} header")]
	MissingHeader(&'static str),

	/// This is an ogg stream, but not a vorbis stream
	#[error("ogg stream is not vorbis")]
	NotVorbis,

	/// A page isn't laid out the way we expect
	#[error("malformed ogg page: {0}")]
	MalformedPage(String),

	/// A page or header ended early
	#[error("ogg data is truncated")]
	Truncated(#[from] CursorError),

	/// We could not parse the vorbis comment header
	#[error("error while decoding vorbis comment")]
	VorbisComment(#[from] VorbisCommentDecodeError),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum OggEncodeError {
	/// We could not encode the vorbis comment
	#[error("could not encode vorbis comment")]
	VorbisComment(#[from] VorbisCommentEncodeError),
}
