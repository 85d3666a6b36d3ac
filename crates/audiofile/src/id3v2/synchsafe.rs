//! Synchsafe integers and unsynchronisation.
//!
//! ID3v2 stores most sizes with seven significant bits per byte,
//! so that a size field can never look like an mpeg frame sync.

use thiserror::Error;

/// The largest value a four-byte synchsafe integer can hold
pub const MAX_SYNCHSAFE: u32 = 0x0FFF_FFFF;

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SynchsafeError {
	/// An encoded byte had its high bit set
	#[error("byte {0:#04x} is not synchsafe")]
	InvalidSynchsafeInt(u8),

	/// This value needs more than 28 bits
	#[error("{0} does not fit in a synchsafe integer")]
	TooLarge(u32),
}

/// Decode a four-byte synchsafe integer
pub fn decode(bytes: [u8; 4]) -> Result<u32, SynchsafeError> {
	let mut out = 0u32;
	for b in bytes {
		if b & 0x80 != 0 {
			return Err(SynchsafeError::InvalidSynchsafeInt(b));
		}
		out = (out << 7) | u32::from(b);
	}
	return Ok(out);
}

/// Encode a value as a four-byte synchsafe integer
pub fn encode(value: u32) -> Result<[u8; 4], SynchsafeError> {
	if value > MAX_SYNCHSAFE {
		return Err(SynchsafeError::TooLarge(value));
	}

	Ok([
		((value >> 21) & 0x7F) as u8,
		((value >> 14) & 0x7F) as u8,
		((value >> 7) & 0x7F) as u8,
		(value & 0x7F) as u8,
	])
}

/// Undo unsynchronisation: drop every `0x00` that follows an `0xFF`.
pub fn resync(data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len());
	let mut last_ff = false;

	for b in data {
		if last_ff && *b == 0x00 {
			last_ff = false;
			continue;
		}
		last_ff = *b == 0xFF;
		out.push(*b);
	}

	return out;
}

#[cfg(test)]
mod tests {
	use super::*;
	use paste::paste;
	use rand::Rng;

	macro_rules! gen_tests {
		( $name:ident, $value:expr, $bytes:expr ) => {
			paste! {
				#[test]
				pub fn [<synchsafe_ $name>]() {
					assert_eq!(encode($value).unwrap(), $bytes);
					assert_eq!(decode($bytes).unwrap(), $value);
				}
			}
		};
	}

	gen_tests!(zero, 0, [0, 0, 0, 0]);
	gen_tests!(one_byte, 0x7F, [0, 0, 0, 0x7F]);
	gen_tests!(carry, 0x80, [0, 0, 1, 0]);
	gen_tests!(two_five_seven, 257, [0, 0, 2, 1]);
	gen_tests!(max, MAX_SYNCHSAFE, [0x7F, 0x7F, 0x7F, 0x7F]);

	#[test]
	fn random_roundtrip() {
		let mut rng = rand::thread_rng();
		for _ in 0..10_000 {
			let x = rng.gen_range(0..=MAX_SYNCHSAFE);
			assert_eq!(decode(encode(x).unwrap()).unwrap(), x);
		}
	}

	#[test]
	fn reject_high_bit() {
		for b in 0x80..=0xFFu8 {
			for pos in 0..4 {
				let mut bytes = [0u8; 4];
				bytes[pos] = b;
				assert_eq!(decode(bytes), Err(SynchsafeError::InvalidSynchsafeInt(b)));
			}
		}
	}

	#[test]
	fn reject_too_large() {
		assert_eq!(
			encode(MAX_SYNCHSAFE + 1),
			Err(SynchsafeError::TooLarge(MAX_SYNCHSAFE + 1))
		);
	}

	#[test]
	fn resync_guards() {
		assert_eq!(
			resync(&[0xFF, 0x00, 0xE0, 0x01, 0xFF, 0x00, 0x00, 0xFF]),
			vec![0xFF, 0xE0, 0x01, 0xFF, 0x00, 0xFF]
		);
		assert_eq!(resync(&[]), Vec::<u8>::new());
	}
}
