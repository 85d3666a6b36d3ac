//! Decide which container a file uses.

use std::path::Path;
use tagcore_util::MimeType;
use tracing::debug;

use crate::{
	flac::FLAC_MAGIC,
	id3v2::tag_region_len,
	mpeg::MpegFrameHeader,
	ogg::page::CAPTURE_PATTERN,
};

/// A container format we can read tags from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
	/// MPEG audio, tagged with ID3v2
	Mpeg,

	/// Vorbis in an ogg container
	OggVorbis,

	/// A flac stream
	Flac,

	/// Anything else
	Unknown,
}

/// A strategy for classifying audio files.
pub trait FormatDetector {
	/// Classify a file.
	/// `path` is `None` if the data didn't come from a file.
	fn classify(&self, path: Option<&Path>, data: &[u8]) -> AudioFormat;
}

/// Classify files by their contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicDetector;

impl MagicDetector {
	fn classify_bytes(data: &[u8]) -> AudioFormat {
		if data.starts_with(b"ID3") {
			// Some tools put id3v2 tags in front of flac streams
			return match tag_region_len(data) {
				Ok(len) if data.get(len..).is_some_and(|x| x.starts_with(FLAC_MAGIC)) => {
					AudioFormat::Flac
				}
				// A corrupt tag still tells us this is an mpeg file
				_ => AudioFormat::Mpeg,
			};
		}

		if data.starts_with(FLAC_MAGIC) {
			return AudioFormat::Flac;
		}

		if data.starts_with(CAPTURE_PATTERN) {
			// The first page holds the identification header.
			// Its payload starts right after the lacing table.
			let n_segments = data.get(26).map(|x| usize::from(*x));
			let payload = n_segments.and_then(|n| data.get(27 + n..));
			return match payload {
				Some(p) if p.starts_with(b"\x01vorbis") => AudioFormat::OggVorbis,
				_ => AudioFormat::Unknown,
			};
		}

		if MpegFrameHeader::decode(data).is_some() {
			return AudioFormat::Mpeg;
		}

		return AudioFormat::Unknown;
	}
}

impl FormatDetector for MagicDetector {
	fn classify(&self, path: Option<&Path>, data: &[u8]) -> AudioFormat {
		let format = Self::classify_bytes(data);
		debug!(message = "Classified file by contents", path = ?path, format = ?format);
		return format;
	}
}

/// Classify files by their extension.
/// Data without a path is [`AudioFormat::Unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionDetector;

impl FormatDetector for ExtensionDetector {
	fn classify(&self, path: Option<&Path>, _data: &[u8]) -> AudioFormat {
		let ext = path.and_then(|p| p.extension()).and_then(|x| x.to_str());

		let format = match ext.and_then(MimeType::from_extension) {
			Some(MimeType::Mp3) => AudioFormat::Mpeg,
			Some(MimeType::Flac) => AudioFormat::Flac,
			Some(MimeType::Ogg) => AudioFormat::OggVorbis,
			_ => AudioFormat::Unknown,
		};

		debug!(message = "Classified file by extension", path = ?path, format = ?format);
		return format;
	}
}
