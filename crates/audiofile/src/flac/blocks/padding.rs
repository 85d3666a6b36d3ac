use std::io::Read;
use tracing::debug;

use crate::flac::errors::{FlacDecodeError, FlacEncodeError};

use super::{FlacMetablockDecode, FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType};

/// A padding block in a FLAC file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacPaddingBlock {
	/// The length of this padding, in bytes.
	pub size: u32,
}

impl FlacMetablockDecode for FlacPaddingBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		// Some encoders leave junk in padding.
		// It's still padding, and we'll zero it on write.
		if data.iter().any(|x| *x != 0u8) {
			debug!(message = "Padding block has non-zero bytes", len = data.len());
		}

		#[expect(clippy::map_err_ignore)]
		let size = u32::try_from(data.len()).map_err(|_| FlacDecodeError::MalformedBlock)?;

		Ok(Self { size })
	}
}

impl FlacMetablockEncode for FlacPaddingBlock {
	fn get_len(&self) -> u32 {
		self.size
	}

	fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl std::io::Write,
	) -> Result<(), FlacEncodeError> {
		if with_header {
			let header = FlacMetablockHeader::new(
				FlacMetablockType::Padding,
				usize::try_from(self.size).unwrap(),
				is_last,
			)?;
			header.encode(target)?;
		}

		std::io::copy(&mut std::io::repeat(0u8).take(self.size.into()), target)?;

		return Ok(());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encode_zeroes() {
		let p = FlacPaddingBlock::decode(&[0, 3, 0]).unwrap();
		assert_eq!(p.size, 3);

		let mut out = Vec::new();
		p.encode(true, true, &mut out).unwrap();
		assert_eq!(out, [0x81, 0, 0, 3, 0, 0, 0]);
	}
}
