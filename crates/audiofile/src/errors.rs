//! Errors returned by [`crate::AudioFile`]

use thiserror::Error;

use crate::{
	flac::errors::{FlacDecodeError, FlacEncodeError},
	id3v2::errors::{Id3v2DecodeError, Id3v2EncodeError},
	ogg::errors::{OggDecodeError, OggEncodeError},
};

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TagError {
	/// We don't know how to read tags from this file
	#[error("unsupported audio format")]
	UnsupportedFormat,

	/// A tag or container is structurally invalid
	#[error("corrupt tag: {0}")]
	CorruptTag(String),

	/// A caller didn't provide a value we need
	#[error("missing required field `{0}`")]
	MissingRequiredField(&'static str),

	/// An image index was out of range
	#[error("index {index} is out of range, there are {len} items")]
	IndexOutOfRange { index: usize, len: usize },

	/// We could not replace the file on disk.
	/// The original file is untouched.
	#[error("could not save file")]
	AtomicWriteFailure(#[source] std::io::Error),

	/// We could not read the source file
	#[error("i/o error while reading file")]
	Io(#[source] std::io::Error),
}

// Every codec error is a corrupt tag to our callers
macro_rules! corrupt_from {
	($($err:ty),*) => {
		$(
			impl From<$err> for TagError {
				fn from(value: $err) -> Self {
					Self::CorruptTag(value.to_string())
				}
			}
		)*
	};
}

corrupt_from!(
	Id3v2DecodeError,
	Id3v2EncodeError,
	FlacDecodeError,
	FlacEncodeError,
	OggDecodeError,
	OggEncodeError
);
