//! MPEG audio frame headers

/// An MPEG audio version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
	/// MPEG-1
	V1,
	/// MPEG-2
	V2,
	/// MPEG-2.5, an unofficial low sample rate extension
	V2_5,
}

/// An MPEG audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegLayer {
	L1,
	L2,
	L3,
}

/// An MPEG audio channel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
	Stereo,
	JointStereo,
	DualChannel,
	Mono,
}

impl ChannelMode {
	/// The number of channels in this mode
	pub fn channels(self) -> u8 {
		match self {
			Self::Mono => 1,
			_ => 2,
		}
	}
}

// Indexed by bitrate index. 0 is "free format", which we don't handle.
const BITRATES_V1_L1: [u32; 15] = [
	0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448,
];
const BITRATES_V1_L2: [u32; 15] = [
	0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384,
];
const BITRATES_V1_L3: [u32; 15] = [
	0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];
const BITRATES_V2_L1: [u32; 15] = [
	0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256,
];
const BITRATES_V2_L23: [u32; 15] = [
	0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160,
];

/// A decoded 4-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpegFrameHeader {
	pub version: MpegVersion,
	pub layer: MpegLayer,

	/// Bitrate of this frame, in kbps
	pub bitrate_kbps: u32,

	/// Sample rate, in hz
	pub sample_rate: u32,

	/// Is this frame one slot longer than usual?
	pub padding: bool,

	pub channel_mode: ChannelMode,
}

impl MpegFrameHeader {
	/// Decode a frame header.
	/// Returns `None` if `data` doesn't start with a valid header.
	pub fn decode(data: &[u8]) -> Option<Self> {
		let [b0, b1, b2, b3]: [u8; 4] = data.get(..4)?.try_into().ok()?;

		// 11 sync bits
		if b0 != 0xFF || b1 & 0xE0 != 0xE0 {
			return None;
		}

		let version = match (b1 >> 3) & 0x03 {
			0 => MpegVersion::V2_5,
			2 => MpegVersion::V2,
			3 => MpegVersion::V1,
			_ => return None,
		};

		let layer = match (b1 >> 1) & 0x03 {
			1 => MpegLayer::L3,
			2 => MpegLayer::L2,
			3 => MpegLayer::L1,
			_ => return None,
		};

		let table = match (version, layer) {
			(MpegVersion::V1, MpegLayer::L1) => &BITRATES_V1_L1,
			(MpegVersion::V1, MpegLayer::L2) => &BITRATES_V1_L2,
			(MpegVersion::V1, MpegLayer::L3) => &BITRATES_V1_L3,
			(_, MpegLayer::L1) => &BITRATES_V2_L1,
			(_, _) => &BITRATES_V2_L23,
		};

		let bitrate_kbps = *table.get(usize::from(b2 >> 4))?;
		if bitrate_kbps == 0 {
			return None;
		}

		let rates: [u32; 3] = match version {
			MpegVersion::V1 => [44_100, 48_000, 32_000],
			MpegVersion::V2 => [22_050, 24_000, 16_000],
			MpegVersion::V2_5 => [11_025, 12_000, 8_000],
		};
		let sample_rate = *rates.get(usize::from((b2 >> 2) & 0x03))?;

		let channel_mode = match b3 >> 6 {
			0 => ChannelMode::Stereo,
			1 => ChannelMode::JointStereo,
			2 => ChannelMode::DualChannel,
			_ => ChannelMode::Mono,
		};

		return Some(Self {
			version,
			layer,
			bitrate_kbps,
			sample_rate,
			padding: b2 & 0x02 != 0,
			channel_mode,
		});
	}

	/// The number of samples (per channel) in one frame
	pub fn samples_per_frame(&self) -> u32 {
		match (self.layer, self.version) {
			(MpegLayer::L1, _) => 384,
			(MpegLayer::L2, _) => 1152,
			(MpegLayer::L3, MpegVersion::V1) => 1152,
			(MpegLayer::L3, _) => 576,
		}
	}

	/// The length of this frame in bytes, header included
	pub fn frame_len(&self) -> usize {
		let bitrate = u64::from(self.bitrate_kbps) * 1000;
		let rate = u64::from(self.sample_rate);
		let padding = u64::from(self.padding);

		#[expect(clippy::integer_division)]
		let len = match self.layer {
			// Layer I slots are 4 bytes long
			MpegLayer::L1 => (12 * bitrate / rate + padding) * 4,
			_ => u64::from(self.samples_per_frame()) / 8 * bitrate / rate + padding,
		};

		return usize::try_from(len).unwrap();
	}

	/// The length of the side information block that follows this header.
	/// A Xing header starts right after it.
	pub fn side_info_len(&self) -> usize {
		match (self.version, self.channel_mode) {
			(MpegVersion::V1, ChannelMode::Mono) => 17,
			(MpegVersion::V1, _) => 32,
			(_, ChannelMode::Mono) => 9,
			(_, _) => 17,
		}
	}
}
