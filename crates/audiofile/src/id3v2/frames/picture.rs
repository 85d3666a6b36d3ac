use std::fmt::Debug;
use tagcore_util::MimeType;

use crate::{
	common::picturetype::PictureType,
	id3v2::{encoding::TextEncoding, errors::Id3v2DecodeError},
};

/// An attached picture frame (`APIC`, or `PIC` in ID3v2.2)
#[derive(Clone, PartialEq, Eq)]
pub struct AttachedPictureFrame {
	/// The encoding of `description`
	pub encoding: TextEncoding,

	/// This picture's mime type, like `image/jpeg`.
	/// ID3v2.2 format codes are converted to mime types when we can.
	pub mime: String,

	/// The picture type code. Usually 0..=20, but any value is kept.
	pub picture_type: u8,

	/// A description of this picture
	pub description: String,

	/// The image data
	pub data: Vec<u8>,
}

impl Debug for AttachedPictureFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AttachedPictureFrame")
			.field("mime", &self.mime)
			.field(
				"picture_type",
				&PictureType::from_idx(self.picture_type.into()),
			)
			.field("description", &self.description)
			.field("data.len()", &self.data.len())
			.finish()
	}
}

impl AttachedPictureFrame {
	/// This picture's type, as an enum
	pub fn picture_type(&self) -> PictureType {
		PictureType::from_idx(self.picture_type.into())
	}

	pub(super) fn decode_body(major: u8, body: &[u8]) -> Result<Self, Id3v2DecodeError> {
		let (first, rest) = body
			.split_first()
			.ok_or_else(|| Id3v2DecodeError::MalformedFrame("empty picture frame".into()))?;
		let encoding = TextEncoding::from_byte(*first)?;

		let (mime, rest) = if major == 2 {
			let format = rest.get(0..3).ok_or_else(|| {
				Id3v2DecodeError::MalformedFrame("short picture frame".into())
			})?;
			let format = TextEncoding::Latin1.decode(format)?;

			let mime = match MimeType::from_extension(format.trim()) {
				Some(m) => m.to_string(),
				None => format,
			};
			(mime, &rest[3..])
		} else {
			let (mime, rest) = TextEncoding::Latin1.split_terminated(rest);
			(TextEncoding::Latin1.decode(mime)?, rest)
		};

		let (picture_type, rest) = rest.split_first().ok_or_else(|| {
			Id3v2DecodeError::MalformedFrame("picture frame has no picture type".into())
		})?;

		let (description, data) = encoding.split_terminated(rest);

		Ok(Self {
			encoding,
			mime,
			picture_type: *picture_type,
			description: encoding.decode(description)?,
			data: data.to_vec(),
		})
	}

	/// The three-character image format code we write in ID3v2.2
	fn format_code(&self) -> [u8; 3] {
		let ext = MimeType::from(self.mime.as_str())
			.extension()
			.trim_start_matches('.')
			.to_ascii_uppercase();

		let code = if ext.is_empty() { &self.mime } else { &ext };
		let mut out = [b' '; 3];
		for (o, c) in out.iter_mut().zip(code.bytes()) {
			*o = c;
		}
		out
	}

	pub(super) fn encode_body(&self, major: u8, out: &mut Vec<u8>) {
		let encoding = if self.encoding.valid_in(major) {
			self.encoding
		} else {
			TextEncoding::for_text(&self.description, major)
		};

		out.push(encoding.to_byte());
		if major == 2 {
			out.extend_from_slice(&self.format_code());
		} else {
			TextEncoding::Latin1.encode(&self.mime, out);
			TextEncoding::Latin1.terminate(out);
		}

		out.push(self.picture_type);
		encoding.encode(&self.description, out);
		encoding.terminate(out);
		out.extend_from_slice(&self.data);
	}
}
