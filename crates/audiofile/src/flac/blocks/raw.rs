use crate::flac::errors::{FlacDecodeError, FlacEncodeError};

use super::{FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType};

/// A metadata block we carry through untouched:
/// application, seektable, and cuesheet blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacRawBlock {
	/// The type of this block
	pub block_type: FlacMetablockType,

	/// This block's payload, without its header
	pub data: Vec<u8>,
}

impl FlacRawBlock {
	/// Wrap the given payload
	pub fn decode(block_type: FlacMetablockType, data: &[u8]) -> Result<Self, FlacDecodeError> {
		Ok(Self {
			block_type,
			data: data.to_vec(),
		})
	}
}

impl FlacMetablockEncode for FlacRawBlock {
	fn get_len(&self) -> u32 {
		u32::try_from(self.data.len()).unwrap_or(u32::MAX)
	}

	fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl std::io::Write,
	) -> Result<(), FlacEncodeError> {
		if with_header {
			let header = FlacMetablockHeader::new(self.block_type, self.data.len(), is_last)?;
			header.encode(target)?;
		}

		target.write_all(&self.data)?;
		return Ok(());
	}
}
