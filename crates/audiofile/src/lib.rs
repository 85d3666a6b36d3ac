//! Read and write tags in MP3, FLAC, and Ogg Vorbis files.
//!
//! [`AudioFile`] is the entry point: it detects a file's format,
//! exposes one tag model over ID3v2 and Vorbis comments, and
//! saves edits by atomically replacing the whole file.
//! The per-format codecs are public too, for callers that need
//! to work below that level.

pub mod common;
pub mod config;
pub mod detect;
pub mod errors;
pub mod flac;
pub mod id3v2;
pub mod mpeg;
pub mod ogg;
pub mod properties;
pub mod tag;

mod file;
pub use file::*;

#[cfg(test)]
mod testdata;
