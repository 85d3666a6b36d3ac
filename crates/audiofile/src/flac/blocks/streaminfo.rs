use crate::{
	common::bytes::ByteCursor,
	flac::errors::{FlacDecodeError, FlacEncodeError},
};

use super::{FlacMetablockDecode, FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType};

/// The length of a streaminfo block, not including its header
pub const STREAMINFO_LEN: u32 = 34;

/// A streaminfo block in a flac file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacStreaminfoBlock {
	/// The minimum block size (in samples) used in the stream.
	pub min_block_size: u32,

	/// The maximum block size (in samples) used in the stream.
	/// (Minimum blocksize == maximum blocksize) implies a fixed-blocksize stream.
	pub max_block_size: u32,

	/// The minimum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub min_frame_size: u32,

	/// The minimum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub max_frame_size: u32,

	/// Sample rate in Hz.
	/// A value of 0 is invalid.
	pub sample_rate: u32,

	/// Number of channels. FLAC supports from 1 to 8 channels
	pub channels: u8,

	/// Bits per sample. FLAC supports from 4 to 32 bits per sample.
	pub bits_per_sample: u8,

	/// Total inter-channel samples in stream.
	/// Zero means the number of total samples is unknown.
	pub total_samples: u64,

	/// MD5 signature of the unencoded audio data.
	pub md5_signature: [u8; 16],
}

impl FlacMetablockDecode for FlacStreaminfoBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		let min_block_size = d.read_u16_be()?.into();
		let max_block_size = d.read_u16_be()?.into();
		let min_frame_size = d.read_u24_be()?;
		let max_frame_size = d.read_u24_be()?;

		let block = d.read_array::<8>()?;

		// 20 bits: sample rate in hz
		let sample_rate = u32::from_be_bytes([0, block[0], block[1], block[2]]) >> 4;

		// 3 bits: number of channels - 1.
		let channels = ((block[2] & 0b0000_1110) >> 1) + 1;

		// 5 bits: bits per sample - 1.
		let bits_per_sample =
			((block[2] & 0b0000_0001) << 4) + ((block[3] & 0b1111_0000) >> 4) + 1;

		// 36 bits: total "cross-channel" samples in the stream.
		let total_samples = u64::from_be_bytes([
			0,
			0,
			0,
			block[3] & 0b0000_1111,
			block[4],
			block[5],
			block[6],
			block[7],
		]);

		let md5_signature = d.read_array::<16>()?;

		Ok(Self {
			min_block_size,
			max_block_size,
			min_frame_size,
			max_frame_size,
			sample_rate,
			channels,
			bits_per_sample,
			total_samples,
			md5_signature,
		})
	}
}

impl FlacMetablockEncode for FlacStreaminfoBlock {
	fn get_len(&self) -> u32 {
		STREAMINFO_LEN
	}

	fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl std::io::Write,
	) -> Result<(), FlacEncodeError> {
		if with_header {
			let header = FlacMetablockHeader {
				block_type: FlacMetablockType::Streaminfo,
				length: self.get_len(),
				is_last,
			};
			header.encode(target)?;
		}

		target.write_all(&self.min_block_size.to_be_bytes()[2..])?;
		target.write_all(&self.max_block_size.to_be_bytes()[2..])?;
		target.write_all(&self.min_frame_size.to_be_bytes()[1..])?;
		target.write_all(&self.max_frame_size.to_be_bytes()[1..])?;

		let rate = (self.sample_rate & 0x000F_FFFF).to_be_bytes();
		let channels = self.channels.saturating_sub(1) & 0b111;
		let bps = self.bits_per_sample.saturating_sub(1) & 0b1_1111;
		let total = (self.total_samples & 0x000F_FFFF_FFFF).to_be_bytes();

		target.write_all(&[
			(rate[1] << 4) | (rate[2] >> 4),
			(rate[2] << 4) | (rate[3] >> 4),
			(rate[3] << 4) | (channels << 1) | (bps >> 4),
			((bps & 0b1111) << 4) | total[3],
			total[4],
			total[5],
			total[6],
			total[7],
		])?;

		target.write_all(&self.md5_signature)?;

		return Ok(());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> FlacStreaminfoBlock {
		FlacStreaminfoBlock {
			min_block_size: 4096,
			max_block_size: 4096,
			min_frame_size: 14,
			max_frame_size: 12_000,
			sample_rate: 44_100,
			channels: 2,
			bits_per_sample: 16,
			total_samples: 441_000,
			md5_signature: [7; 16],
		}
	}

	#[test]
	fn known_bytes() {
		let mut out = Vec::new();
		sample().encode(false, false, &mut out).unwrap();
		assert_eq!(out.len(), 34);

		// 44100 = 0x0AC44, then (2-1) << 1 and (16-1) split over two bytes
		assert_eq!(&out[10..14], &[0x0A, 0xC4, 0x42, 0xF0]);
	}

	#[test]
	fn roundtrip() {
		let s = sample();
		let mut out = Vec::new();
		s.encode(true, true, &mut out).unwrap();
		assert_eq!(&out[0..4], &[0x80, 0, 0, 34]);
		assert_eq!(FlacStreaminfoBlock::decode(&out[4..]).unwrap(), s);
	}

	#[test]
	fn truncated() {
		assert!(matches!(
			FlacStreaminfoBlock::decode(&[0u8; 20]),
			Err(FlacDecodeError::Truncated(_))
		));
	}
}
