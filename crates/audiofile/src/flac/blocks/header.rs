//! FLAC metablock headers
use crate::{
	common::bytes::ByteCursor,
	flac::errors::{FlacDecodeError, FlacEncodeError},
};

/// The largest length a metablock header can describe
pub const MAX_BLOCK_LEN: u32 = 0x00FF_FFFF;

/// A type of flac metadata block
#[allow(missing_docs)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlacMetablockType {
	Streaminfo,
	Padding,
	Application,
	Seektable,
	VorbisComment,
	Cuesheet,
	Picture,
}

impl FlacMetablockType {
	/// Decode a block type from the low seven bits of `id`
	pub(crate) fn from_id(id: u8) -> Result<Self, FlacDecodeError> {
		return Ok(match id & 0b01111111 {
			0 => FlacMetablockType::Streaminfo,
			1 => FlacMetablockType::Padding,
			2 => FlacMetablockType::Application,
			3 => FlacMetablockType::Seektable,
			4 => FlacMetablockType::VorbisComment,
			5 => FlacMetablockType::Cuesheet,
			6 => FlacMetablockType::Picture,
			x => return Err(FlacDecodeError::BadMetablockType(x)),
		});
	}

	/// The numeric id of this block type
	pub fn to_id(&self) -> u8 {
		match self {
			FlacMetablockType::Streaminfo => 0,
			FlacMetablockType::Padding => 1,
			FlacMetablockType::Application => 2,
			FlacMetablockType::Seektable => 3,
			FlacMetablockType::VorbisComment => 4,
			FlacMetablockType::Cuesheet => 5,
			FlacMetablockType::Picture => 6,
		}
	}
}

/// The header of a flac metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacMetablockHeader {
	/// The type of block this is
	pub block_type: FlacMetablockType,

	/// The length of this block, in bytes
	/// (not including this header)
	pub length: u32,

	/// If true, this is the last metadata block
	pub is_last: bool,
}

impl FlacMetablockHeader {
	/// Try to decode a flac metablock header from the given cursor
	pub fn decode(d: &mut ByteCursor<'_>) -> Result<Self, FlacDecodeError> {
		let id = d.read_u8()?;
		let length = d.read_u24_be()?;

		return Ok(Self {
			block_type: FlacMetablockType::from_id(id)?,
			length,
			is_last: id & 0b10000000 == 0b10000000,
		});
	}
}

impl FlacMetablockHeader {
	/// Make a header for a block of `length` bytes,
	/// checking that the length fits in 24 bits.
	pub fn new(
		block_type: FlacMetablockType,
		length: usize,
		is_last: bool,
	) -> Result<Self, FlacEncodeError> {
		let length = u32::try_from(length)
			.ok()
			.filter(|x| *x <= MAX_BLOCK_LEN)
			.ok_or(FlacEncodeError::BlockTooLarge(length))?;

		return Ok(Self {
			block_type,
			length,
			is_last,
		});
	}

	/// Try to encode this header
	pub fn encode(&self, target: &mut impl std::io::Write) -> Result<(), FlacEncodeError> {
		if self.length > MAX_BLOCK_LEN {
			return Err(FlacEncodeError::BlockTooLarge(
				self.length.try_into().unwrap(),
			));
		}

		let mut block_type = self.block_type.to_id();
		if self.is_last {
			block_type |= 0b1000_0000;
		};

		let x = self.length.to_be_bytes();
		target.write_all(&[block_type, x[1], x[2], x[3]])?;

		return Ok(());
	}
}
