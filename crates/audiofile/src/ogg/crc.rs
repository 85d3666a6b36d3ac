//! The ogg page checksum: CRC-32, polynomial 0x04C11DB7,
//! initial value 0, no reflection, no final xor.

const POLY: u32 = 0x04C1_1DB7;

static TABLE: [u32; 256] = {
	let mut table = [0u32; 256];
	let mut i = 0;
	while i < 256 {
		let mut crc = (i as u32) << 24;
		let mut j = 0;
		while j < 8 {
			crc = if crc & 0x8000_0000 != 0 {
				(crc << 1) ^ POLY
			} else {
				crc << 1
			};
			j += 1;
		}
		table[i] = crc;
		i += 1;
	}
	table
};

/// Continue a checksum with more data
pub fn update(crc: u32, data: &[u8]) -> u32 {
	data.iter().fold(crc, |crc, b| {
		(crc << 8) ^ TABLE[usize::try_from((crc >> 24) ^ u32::from(*b)).unwrap()]
	})
}

/// Compute the checksum of `data`
pub fn checksum(data: &[u8]) -> u32 {
	update(0, data)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn check_value() {
		// CRC-32/POSIX without its final xor
		assert_eq!(checksum(b"123456789"), 0x765E_7680 ^ 0xFFFF_FFFF);
		assert_eq!(checksum(b""), 0);
	}

	#[test]
	fn incremental() {
		let a = update(checksum(b"Ogg"), b"S page");
		assert_eq!(a, checksum(b"OggS page"));
	}
}
