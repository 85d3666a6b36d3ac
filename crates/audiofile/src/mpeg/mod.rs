//! Find and measure MPEG audio streams.
//!
//! We never decode audio. Stream properties come from the first
//! frame header and, for VBR streams, a Xing/Info or VBRI header.

use tracing::{debug, trace};

use crate::common::bytes::ByteCursor;

mod header;
pub use header::*;

/// Where a VBR stream's frame count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VbrHeader {
	/// A Xing header (written by most VBR encoders),
	/// or an Info header (the same thing, written for CBR streams)
	Xing { frames: u32 },

	/// A Fraunhofer VBRI header
	Vbri { frames: u32 },
}

impl VbrHeader {
	/// The number of audio frames in this stream
	pub fn frames(&self) -> u32 {
		match self {
			Self::Xing { frames } | Self::Vbri { frames } => *frames,
		}
	}

	fn read_xing(frame: &[u8], header: &MpegFrameHeader) -> Option<Self> {
		let mut d = ByteCursor::new(frame);
		d.skip(4 + header.side_info_len()).ok()?;

		let tag = d.read_bytes(4).ok()?;
		if tag != b"Xing" && tag != b"Info" {
			return None;
		}

		let flags = d.read_u32_be().ok()?;
		if flags & 0x01 == 0 {
			// No frame count
			return None;
		}

		return Some(Self::Xing {
			frames: d.read_u32_be().ok()?,
		});
	}

	fn read_vbri(frame: &[u8]) -> Option<Self> {
		// VBRI is always 32 bytes after the frame header
		let mut d = ByteCursor::new(frame);
		d.skip(4 + 32).ok()?;

		if d.read_bytes(4).ok()? != b"VBRI" {
			return None;
		}

		// Version, delay, quality, byte count
		d.skip(2 + 2 + 2 + 4).ok()?;
		return Some(Self::Vbri {
			frames: d.read_u32_be().ok()?,
		});
	}
}

/// An MPEG audio stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpegStream {
	/// The first frame's header
	pub header: MpegFrameHeader,

	/// Offset of the first frame in the file
	pub offset: usize,

	/// Number of bytes from the first frame to the end of the file
	pub len: usize,

	/// The VBR header in the first frame, if there is one
	pub vbr: Option<VbrHeader>,
}

impl MpegStream {
	/// Find the first MPEG frame at or after `start`.
	///
	/// A frame sync only counts if the frame after it
	/// also starts with a valid header, or runs to the end of `data`.
	pub fn find(data: &[u8], start: usize) -> Option<Self> {
		let mut i = start;

		while i + 4 <= data.len() {
			if data[i] != 0xFF {
				i += 1;
				continue;
			}

			let Some(header) = MpegFrameHeader::decode(&data[i..]) else {
				i += 1;
				continue;
			};

			let next = i + header.frame_len();
			let confirmed = next >= data.len()
				|| MpegFrameHeader::decode(&data[next..])
					.is_some_and(|h| h.version == header.version && h.layer == header.layer);

			if !confirmed {
				trace!(message = "Rejected false mpeg frame sync", offset = i);
				i += 1;
				continue;
			}

			let frame = &data[i..next.min(data.len())];
			let vbr = VbrHeader::read_xing(frame, &header).or_else(|| VbrHeader::read_vbri(frame));

			debug!(
				message = "Found mpeg stream",
				offset = i,
				bitrate = header.bitrate_kbps,
				sample_rate = header.sample_rate,
				vbr = ?vbr
			);

			return Some(Self {
				header,
				offset: i,
				len: data.len() - i,
				vbr,
			});
		}

		return None;
	}

	/// The length of this stream, in milliseconds
	pub fn duration_ms(&self) -> u64 {
		let rate = u64::from(self.header.sample_rate);

		#[expect(clippy::integer_division)]
		let ms = match self.vbr {
			Some(vbr) => {
				u64::from(vbr.frames()) * u64::from(self.header.samples_per_frame()) * 1000 / rate
			}

			// Constant bitrate. kbps is bits per millisecond.
			None => u64::try_from(self.len).unwrap() * 8 / u64::from(self.header.bitrate_kbps),
		};

		return ms;
	}

	/// The average bitrate of this stream, in kbps
	pub fn bitrate_kbps(&self) -> u32 {
		if self.vbr.is_none() {
			return self.header.bitrate_kbps;
		}

		let ms = self.duration_ms();
		if ms == 0 {
			return self.header.bitrate_kbps;
		}

		#[expect(clippy::integer_division)]
		let kbps = u64::try_from(self.len).unwrap() * 8 / ms;

		return u32::try_from(kbps).unwrap_or(u32::MAX);
	}
}
