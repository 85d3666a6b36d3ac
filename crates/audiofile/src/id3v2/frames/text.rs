use super::FrameId;
use crate::id3v2::{encoding::TextEncoding, errors::Id3v2DecodeError};

/// A text information frame (`T***`, except `TXXX`).
///
/// ID3v2.4 allows several null-separated values in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
	/// This frame's id, like `TIT2` or `TT2`
	pub id: FrameId,

	/// The encoding this frame was read with, or will be written with
	pub encoding: TextEncoding,

	/// This frame's values. Never empty.
	pub values: Vec<String>,
}

impl TextFrame {
	/// Make a frame with one value
	pub fn new(id: &str, encoding: TextEncoding, value: &str) -> Self {
		Self {
			id: id.into(),
			encoding,
			values: vec![value.to_owned()],
		}
	}

	/// The first value of this frame
	pub fn text(&self) -> &str {
		self.values.first().map(|x| x.as_str()).unwrap_or("")
	}

	pub(super) fn decode_body(id: &str, body: &[u8]) -> Result<Self, Id3v2DecodeError> {
		let (first, rest) = body
			.split_first()
			.ok_or_else(|| Id3v2DecodeError::MalformedFrame(format!("empty text frame {id}")))?;
		let encoding = TextEncoding::from_byte(*first)?;

		let mut values = Vec::new();
		let mut rest = rest;
		loop {
			let (value, tail) = encoding.split_terminated(rest);
			values.push(encoding.decode(value)?);

			if tail.is_empty() {
				break;
			}
			rest = tail;
		}

		// A trailing terminator does not start another value.
		// Only ID3v2.4 has multiple values, but some v2.3 writers
		// terminate their strings anyway.
		if values.len() > 1 && values.last().is_some_and(|x| x.is_empty()) {
			values.pop();
		}

		Ok(Self {
			id: id.into(),
			encoding,
			values,
		})
	}

	pub(super) fn encode_body(&self, major: u8, out: &mut Vec<u8>) {
		let encoding = if self.encoding.valid_in(major) {
			self.encoding
		} else {
			TextEncoding::for_text(&self.values.join(""), major)
		};

		out.push(encoding.to_byte());
		for (i, v) in self.values.iter().enumerate() {
			if i != 0 {
				encoding.terminate(out);
			}
			encoding.encode(v, out);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn multi_valued() {
		let f = TextFrame::decode_body("TPE1", b"\x03A\0B\0").unwrap();
		assert_eq!(f.values, vec!["A", "B"]);
		assert_eq!(f.text(), "A");

		let mut out = Vec::new();
		f.encode_body(4, &mut out);
		assert_eq!(out, b"\x03A\0B");
	}

	#[test]
	fn empty_value() {
		let f = TextFrame::decode_body("TIT2", b"\x00").unwrap();
		assert_eq!(f.values, vec![""]);
		assert!(TextFrame::decode_body("TIT2", b"").is_err());
	}

	#[test]
	fn utf16_values_each_have_bom() {
		let data = [1, 0xFF, 0xFE, b'a', 0, 0, 0, 0xFE, 0xFF, 0, b'b'];
		let f = TextFrame::decode_body("TCON", &data).unwrap();
		assert_eq!(f.values, vec!["a", "b"]);
	}

	#[test]
	fn downgrade_encoding() {
		let f = TextFrame::new("TIT2", TextEncoding::Utf8, "Ok");
		let mut out = Vec::new();
		f.encode_body(3, &mut out);
		assert_eq!(out, b"\x00Ok");
	}
}
