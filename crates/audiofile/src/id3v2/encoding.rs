//! ID3v2 text encodings

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use super::errors::Id3v2DecodeError;

/// A text encoding, as selected by the first byte of most text-carrying frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1,

	/// UTF-16 with a byte order mark
	Utf16,

	/// UTF-16, big-endian, without a byte order mark.
	/// ID3v2.4 only.
	Utf16Be,

	/// UTF-8. ID3v2.4 only.
	Utf8,
}

impl TextEncoding {
	/// Decode an encoding selector byte
	pub fn from_byte(byte: u8) -> Result<Self, Id3v2DecodeError> {
		Ok(match byte {
			0 => Self::Latin1,
			1 => Self::Utf16,
			2 => Self::Utf16Be,
			3 => Self::Utf8,
			x => return Err(Id3v2DecodeError::BadEncoding(x)),
		})
	}

	/// The selector byte for this encoding
	pub fn to_byte(self) -> u8 {
		match self {
			Self::Latin1 => 0,
			Self::Utf16 => 1,
			Self::Utf16Be => 2,
			Self::Utf8 => 3,
		}
	}

	/// Is this encoding allowed in the given major version?
	pub fn valid_in(self, major: u8) -> bool {
		match self {
			Self::Latin1 | Self::Utf16 => true,
			Self::Utf16Be | Self::Utf8 => major >= 4,
		}
	}

	/// The best encoding for `text` in the given major version
	pub fn for_text(text: &str, major: u8) -> Self {
		if major >= 4 {
			Self::Utf8
		} else if text.chars().all(|c| u32::from(c) <= 0xFF) {
			Self::Latin1
		} else {
			Self::Utf16
		}
	}

	/// The length of a string terminator in this encoding
	pub fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::Utf8 => 1,
			Self::Utf16 | Self::Utf16Be => 2,
		}
	}

	/// Split `data` at the first string terminator.
	/// Returns (string, rest); the terminator belongs to neither.
	/// If there is no terminator, the whole buffer is the string.
	pub fn split_terminated(self, data: &[u8]) -> (&[u8], &[u8]) {
		let step = self.terminator_len();
		let mut i = 0;

		while i + step <= data.len() {
			if data[i..i + step].iter().all(|x| *x == 0) {
				return (&data[..i], &data[i + step..]);
			}
			i += step;
		}

		return (data, &[]);
	}

	/// Decode a string in this encoding.
	/// `data` should not include a terminator.
	pub fn decode(self, data: &[u8]) -> Result<String, Id3v2DecodeError> {
		match self {
			Self::Latin1 => Ok(data.iter().map(|x| char::from(*x)).collect()),

			Self::Utf8 => decode_with(UTF_8, data, "utf-8"),

			Self::Utf16 => {
				let (encoding, bom_len) = match Encoding::for_bom(data) {
					Some((e, n)) if e == UTF_16LE || e == UTF_16BE => (e, n),
					// No byte order mark. Most writers that forget it are little-endian.
					_ => (UTF_16LE, 0),
				};
				decode_with(encoding, utf16_units(&data[bom_len..]), "utf-16")
			}

			Self::Utf16Be => decode_with(UTF_16BE, utf16_units(data), "utf-16"),
		}
	}

	/// Append `text` in this encoding to `out`, without a terminator.
	/// Characters Latin-1 cannot represent become `?`.
	pub fn encode(self, text: &str, out: &mut Vec<u8>) {
		match self {
			Self::Latin1 => out.extend(
				text.chars()
					.map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
			),

			Self::Utf8 => out.extend_from_slice(text.as_bytes()),

			Self::Utf16 => {
				out.extend_from_slice(&[0xFF, 0xFE]);
				for x in text.encode_utf16() {
					out.extend_from_slice(&x.to_le_bytes());
				}
			}

			Self::Utf16Be => {
				for x in text.encode_utf16() {
					out.extend_from_slice(&x.to_be_bytes());
				}
			}
		}
	}

	/// Append a string terminator to `out`
	pub fn terminate(self, out: &mut Vec<u8>) {
		out.extend(std::iter::repeat(0u8).take(self.terminator_len()));
	}
}

/// Drop a dangling odd byte
fn utf16_units(data: &[u8]) -> &[u8] {
	&data[..data.len() & !1]
}

fn decode_with(
	encoding: &'static Encoding,
	data: &[u8],
	name: &'static str,
) -> Result<String, Id3v2DecodeError> {
	return encoding
		.decode_without_bom_handling_and_without_replacement(data)
		.map(|x| x.into_owned())
		.ok_or(Id3v2DecodeError::FailedStringDecode(name));
}
