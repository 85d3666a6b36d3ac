use crate::id3v2::{encoding::TextEncoding, errors::Id3v2DecodeError};

/// A comment frame (`COMM`, or `COM` in ID3v2.2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrame {
	/// The encoding of `description` and `text`
	pub encoding: TextEncoding,

	/// ISO-639-2 language code
	pub language: [u8; 3],

	/// Short content description. Usually empty.
	pub description: String,

	/// The comment itself
	pub text: String,
}

impl CommentFrame {
	/// Make a new english comment with an empty description
	pub fn new(encoding: TextEncoding, text: &str) -> Self {
		Self {
			encoding,
			language: *b"eng",
			description: String::new(),
			text: text.to_owned(),
		}
	}

	pub(super) fn decode_body(body: &[u8]) -> Result<Self, Id3v2DecodeError> {
		let (first, rest) = body
			.split_first()
			.ok_or_else(|| Id3v2DecodeError::MalformedFrame("empty comment frame".into()))?;
		let encoding = TextEncoding::from_byte(*first)?;

		let language: [u8; 3] = rest
			.get(0..3)
			.and_then(|x| x.try_into().ok())
			.ok_or_else(|| Id3v2DecodeError::MalformedFrame("short comment frame".into()))?;

		let (description, text) = encoding.split_terminated(&rest[3..]);
		let (text, _) = encoding.split_terminated(text);

		Ok(Self {
			encoding,
			language,
			description: encoding.decode(description)?,
			text: encoding.decode(text)?,
		})
	}

	pub(super) fn encode_body(&self, major: u8, out: &mut Vec<u8>) {
		let encoding = if self.encoding.valid_in(major) {
			self.encoding
		} else {
			TextEncoding::for_text(&format!("{}{}", self.description, self.text), major)
		};

		out.push(encoding.to_byte());
		out.extend_from_slice(&self.language);
		encoding.encode(&self.description, out);
		encoding.terminate(out);
		encoding.encode(&self.text, out);
	}
}
