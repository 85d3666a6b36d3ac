use std::fmt::Debug;
use tagcore_util::MimeType;

use crate::{
	common::{bytes::ByteCursor, picturetype::PictureType},
	flac::errors::{FlacDecodeError, FlacEncodeError},
};

use super::{FlacMetablockDecode, FlacMetablockEncode, FlacMetablockHeader, FlacMetablockType};

/// A picture metablock in a flac file
#[derive(Clone, PartialEq, Eq)]
pub struct FlacPictureBlock {
	/// The type of this picture
	pub picture_type: PictureType,

	/// The format of this picture
	pub mime: MimeType,

	/// The description of this picture
	pub description: String,

	/// The width of this picture, in px
	pub width: u32,

	/// The height of this picture, in px
	pub height: u32,

	/// The bit depth of this picture
	pub bit_depth: u32,

	/// The color count of this picture (if indexed)
	pub color_count: u32,

	/// The image data
	pub img_data: Vec<u8>,
}

impl Debug for FlacPictureBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlacPicture")
			.field("type", &self.picture_type)
			.field("mime", &self.mime)
			.field("img_data.len()", &self.img_data.len())
			.finish()
	}
}

fn read_string(d: &mut ByteCursor<'_>) -> Result<String, FlacDecodeError> {
	let length = d.read_u32_be()?.try_into().unwrap();
	return Ok(String::from_utf8(d.read_bytes(length)?.to_vec())?);
}

impl FlacMetablockDecode for FlacPictureBlock {
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = ByteCursor::new(data);

		let picture_type = PictureType::from_idx(d.read_u32_be()?);
		let mime = read_string(&mut d)?.into();
		let description = read_string(&mut d)?;

		let width = d.read_u32_be()?;
		let height = d.read_u32_be()?;
		let bit_depth = d.read_u32_be()?;

		// Color count for indexed images
		let color_count = d.read_u32_be()?;

		let img_data = {
			let data_length = d.read_u32_be()?.try_into().unwrap();
			d.read_bytes(data_length)?.to_vec()
		};

		Ok(Self {
			picture_type,
			mime,
			description,
			width,
			height,
			bit_depth,
			color_count,
			img_data,
		})
	}
}

impl FlacMetablockEncode for FlacPictureBlock {
	fn get_len(&self) -> u32 {
		let len = (4 * 8)
			+ self.mime.to_string().len()
			+ self.description.len()
			+ self.img_data.len();
		u32::try_from(len).unwrap_or(u32::MAX)
	}

	fn encode(
		&self,
		is_last: bool,
		with_header: bool,
		target: &mut impl std::io::Write,
	) -> Result<(), FlacEncodeError> {
		let mime = self.mime.to_string();

		#[expect(clippy::map_err_ignore)]
		let len = |x: usize| -> Result<[u8; 4], FlacEncodeError> {
			Ok(u32::try_from(x)
				.map_err(|_| FlacEncodeError::BlockTooLarge(x))?
				.to_be_bytes())
		};

		if with_header {
			let header = FlacMetablockHeader::new(
				FlacMetablockType::Picture,
				usize::try_from(self.get_len()).unwrap(),
				is_last,
			)?;
			header.encode(target)?;
		}

		target.write_all(&self.picture_type.to_idx().to_be_bytes())?;

		target.write_all(&len(mime.len())?)?;
		target.write_all(mime.as_bytes())?;

		target.write_all(&len(self.description.len())?)?;
		target.write_all(self.description.as_bytes())?;

		target.write_all(&self.width.to_be_bytes())?;
		target.write_all(&self.height.to_be_bytes())?;
		target.write_all(&self.bit_depth.to_be_bytes())?;
		target.write_all(&self.color_count.to_be_bytes())?;

		target.write_all(&len(self.img_data.len())?)?;
		target.write_all(&self.img_data)?;

		return Ok(());
	}
}
