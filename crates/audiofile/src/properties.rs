//! Audio stream properties

use serde::Serialize;

use crate::{flac::FlacFile, mpeg::MpegStream, ogg::OggVorbisFile};

/// Properties of an audio stream, read from its headers.
///
/// Every field is zero if we couldn't read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AudioProperties {
	/// Average bitrate, in kbps
	pub bitrate_kbps: u32,

	/// Sample rate, in hz
	pub sample_rate_hz: u32,

	/// Number of audio channels
	pub channels: u8,

	/// Stream length, in milliseconds
	pub duration_ms: u64,
}

/// Average kbps of `bytes` bytes played over `ms` milliseconds
fn average_kbps(bytes: usize, ms: u64) -> u32 {
	if ms == 0 {
		return 0;
	}

	// Bytes to bits, and bits per millisecond is kbps
	#[expect(clippy::integer_division)]
	let kbps = u64::try_from(bytes).unwrap() * 8 / ms;

	return u32::try_from(kbps).unwrap_or(u32::MAX);
}

fn samples_to_ms(samples: u64, rate: u32) -> u64 {
	if rate == 0 {
		return 0;
	}

	#[expect(clippy::integer_division)]
	let ms = u128::from(samples) * 1000 / u128::from(rate);

	return u64::try_from(ms).unwrap_or(u64::MAX);
}

impl AudioProperties {
	/// Stream length, in whole seconds
	pub fn duration_seconds(&self) -> u64 {
		#[expect(clippy::integer_division)]
		let s = self.duration_ms / 1000;
		return s;
	}

	/// Read properties from the first MPEG frame at or after `start`
	pub fn from_mpeg(data: &[u8], start: usize) -> Self {
		let Some(stream) = MpegStream::find(data, start) else {
			return Self::default();
		};

		return Self {
			bitrate_kbps: stream.bitrate_kbps(),
			sample_rate_hz: stream.header.sample_rate,
			channels: stream.header.channel_mode.channels(),
			duration_ms: stream.duration_ms(),
		};
	}

	/// Read properties from a flac file's streaminfo block
	pub fn from_flac(file: &FlacFile) -> Self {
		let Some(info) = file.stream_info() else {
			return Self::default();
		};

		let duration_ms = samples_to_ms(info.total_samples, info.sample_rate);

		return Self {
			bitrate_kbps: average_kbps(file.audio_len(), duration_ms),
			sample_rate_hz: info.sample_rate,
			channels: info.channels,
			duration_ms,
		};
	}

	/// Read properties from an ogg vorbis stream's identification header
	/// and last granule position.
	pub fn from_vorbis(file: &OggVorbisFile) -> Self {
		let ident = file.ident();
		let duration_ms = samples_to_ms(file.last_granule(), ident.sample_rate);

		#[expect(clippy::integer_division)]
		let bitrate_kbps = match u32::try_from(ident.bitrate_nominal) {
			Ok(bps) if bps > 0 => bps / 1000,
			_ => average_kbps(file.audio_len(), duration_ms),
		};

		return Self {
			bitrate_kbps,
			sample_rate_hz: ident.sample_rate,
			channels: ident.channels,
			duration_ms,
		};
	}
}
