//! Ogg pages

use super::{crc, errors::OggDecodeError};
use crate::common::bytes::ByteCursor;

/// Every ogg page starts with these bytes
pub const CAPTURE_PATTERN: &[u8; 4] = b"OggS";

/// The most segments a page can hold
pub const MAX_SEGMENTS: usize = 255;

/// Header flag: this page continues a packet from the previous page
pub const FLAG_CONTINUED: u8 = 0x01;

/// Header flag: first page of a logical stream
pub const FLAG_BOS: u8 = 0x02;

/// Header flag: last page of a logical stream
pub const FLAG_EOS: u8 = 0x04;

/// A single ogg page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage {
	/// Header flags
	pub header_type: u8,

	/// Codec-defined position of the last packet that ends on this page.
	/// `u64::MAX` if no packet ends here.
	pub granule: u64,

	/// The logical stream this page belongs to
	pub serial: u32,

	/// This page's sequence number within its logical stream
	pub sequence: u32,

	/// The lacing values of this page
	pub segments: Vec<u8>,

	/// The page payload
	pub data: Vec<u8>,
}

impl OggPage {
	/// Read one page from `d`, checking its checksum
	pub fn decode(d: &mut ByteCursor<'_>) -> Result<Self, OggDecodeError> {
		let start = d.position();

		if d.read_bytes(4)? != CAPTURE_PATTERN {
			return Err(OggDecodeError::BadCapturePattern(start));
		}

		let version = d.read_u8()?;
		if version != 0 {
			return Err(OggDecodeError::MalformedPage(format!(
				"unknown stream structure version {version}"
			)));
		}

		let header_type = d.read_u8()?;
		let granule = d.read_u64_le()?;
		let serial = d.read_u32_le()?;
		let sequence = d.read_u32_le()?;
		let crc = d.read_u32_le()?;

		let n_segments = d.read_u8()?;
		let segments = d.read_bytes(n_segments.into())?.to_vec();
		let len = segments.iter().map(|x| usize::from(*x)).sum();
		let data = d.read_bytes(len)?.to_vec();

		let page = Self {
			header_type,
			granule,
			serial,
			sequence,
			segments,
			data,
		};

		if page.checksum() != crc {
			return Err(OggDecodeError::BadChecksum(sequence));
		}

		return Ok(page);
	}

	fn header_bytes(&self, crc: u32) -> Vec<u8> {
		let mut out = Vec::with_capacity(27 + self.segments.len());
		out.extend_from_slice(CAPTURE_PATTERN);
		out.push(0);
		out.push(self.header_type);
		out.extend_from_slice(&self.granule.to_le_bytes());
		out.extend_from_slice(&self.serial.to_le_bytes());
		out.extend_from_slice(&self.sequence.to_le_bytes());
		out.extend_from_slice(&crc.to_le_bytes());
		// Lacing tables never exceed 255 entries, see `OggPage::paginate`
		out.push(u8::try_from(self.segments.len()).unwrap_or(u8::MAX));
		out.extend_from_slice(&self.segments);
		return out;
	}

	/// The checksum of this page
	pub fn checksum(&self) -> u32 {
		let header = self.header_bytes(0);
		crc::update(crc::checksum(&header), &self.data)
	}

	/// Append this page to `out`, with a fresh checksum
	pub fn encode(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.header_bytes(self.checksum()));
		out.extend_from_slice(&self.data);
	}

	/// The number of bytes `encode()` writes
	pub fn len(&self) -> usize {
		27 + self.segments.len() + self.data.len()
	}

	/// Is this page empty?
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// The lacing values of a packet of `len` bytes
	pub fn lacing(len: usize) -> Vec<u8> {
		let mut out = Vec::new();
		let mut remaining = len;
		loop {
			if remaining >= 255 {
				out.push(255);
				remaining -= 255;
			} else {
				out.push(u8::try_from(remaining).unwrap());
				return out;
			}
		}
	}

	/// Lay out complete packets on new pages.
	/// Every page gets granule position `granule`.
	pub fn paginate(packets: &[&[u8]], serial: u32, first_sequence: u32, granule: u64) -> Vec<Self> {
		let mut pages = Vec::new();
		let mut page = Self {
			header_type: 0,
			granule,
			serial,
			sequence: first_sequence,
			segments: Vec::new(),
			data: Vec::new(),
		};

		for packet in packets {
			let mut offset = 0;
			for lace in Self::lacing(packet.len()) {
				if page.segments.len() == MAX_SEGMENTS {
					// A lace of 255 means the packet goes on
					let continued = page.segments.last() == Some(&255);
					let sequence = page.sequence + 1;
					pages.push(page);
					page = Self {
						header_type: if continued { FLAG_CONTINUED } else { 0 },
						granule,
						serial,
						sequence,
						segments: Vec::new(),
						data: Vec::new(),
					};
				}

				let lace_len = usize::from(lace);
				page.segments.push(lace);
				page.data.extend_from_slice(&packet[offset..offset + lace_len]);
				offset += lace_len;
			}
		}

		if !page.segments.is_empty() {
			pages.push(page);
		}

		// Pages where no packet ends have no granule position
		for p in &mut pages {
			if p.segments.iter().all(|x| *x == 255) {
				p.granule = u64::MAX;
			}
		}

		return pages;
	}
}
