//! One tag model over every supported format

use itertools::Either;
use tagcore_util::MimeType;

use crate::{
	common::{picturetype::PictureType, tagtype::TagType, vorbiscomment::VorbisComment},
	id3v2::{
		encoding::TextEncoding,
		frames::{AttachedPictureFrame, Id3v2Frame},
		leading_int, FrameKey, Id3v2Tag,
	},
};

/// A borrowed view of an attached picture.
///
/// This is only valid until the tag it came from is modified.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef<'a> {
	key: FrameKey,
	major: u8,
	frame: &'a AttachedPictureFrame,
}

impl<'a> ImageRef<'a> {
	/// The key of this picture's frame.
	/// Pass this to [`crate::AudioFile::remove_image`].
	pub fn key(&self) -> FrameKey {
		self.key
	}

	/// This picture's frame id
	pub fn id(&self) -> &'static str {
		match self.major {
			2 => "PIC",
			_ => "APIC",
		}
	}

	/// The picture type code, exactly as stored
	pub fn picture_type(&self) -> u8 {
		self.frame.picture_type
	}

	/// The picture type, as an enum
	pub fn picture_kind(&self) -> PictureType {
		self.frame.picture_type()
	}

	/// The mime type of this picture
	pub fn mime_type(&self) -> &'a str {
		&self.frame.mime
	}

	/// This picture's description
	pub fn description(&self) -> &'a str {
		&self.frame.description
	}

	/// The image data
	pub fn data(&self) -> &'a [u8] {
		&self.frame.data
	}
}

/// A tag of any supported kind.
///
/// Scalar fields work on every kind of tag. Images are only stored in
/// ID3v2 tags: on other tags, image lists are empty and new images are ignored.
#[derive(Debug, Clone)]
pub enum Tag {
	Id3v2(Id3v2Tag),
	Vorbis(VorbisComment),
}

impl Tag {
	fn vorbis_text<'a>(c: &'a VorbisComment, tag: &TagType) -> &'a str {
		c.get_first(tag).unwrap_or("")
	}

	fn vorbis_set(c: &mut VorbisComment, tag: &TagType, value: &str) {
		if value.is_empty() {
			c.remove(tag);
		} else {
			c.set(tag, value);
		}
	}

	/// The track title, or `""`
	pub fn title(&self) -> &str {
		match self {
			Self::Id3v2(t) => t.title(),
			Self::Vorbis(c) => Self::vorbis_text(c, &TagType::TrackTitle),
		}
	}

	/// Set the track title. An empty value removes it.
	pub fn set_title(&mut self, value: &str) {
		match self {
			Self::Id3v2(t) => t.set_title(value),
			Self::Vorbis(c) => Self::vorbis_set(c, &TagType::TrackTitle, value),
		}
	}

	/// The track artist, or `""`
	pub fn artist(&self) -> &str {
		match self {
			Self::Id3v2(t) => t.artist(),
			Self::Vorbis(c) => Self::vorbis_text(c, &TagType::TrackArtist),
		}
	}

	/// Set the track artist. An empty value removes it.
	pub fn set_artist(&mut self, value: &str) {
		match self {
			Self::Id3v2(t) => t.set_artist(value),
			Self::Vorbis(c) => Self::vorbis_set(c, &TagType::TrackArtist, value),
		}
	}

	/// The album title, or `""`
	pub fn album(&self) -> &str {
		match self {
			Self::Id3v2(t) => t.album(),
			Self::Vorbis(c) => Self::vorbis_text(c, &TagType::Album),
		}
	}

	/// Set the album title. An empty value removes it.
	pub fn set_album(&mut self, value: &str) {
		match self {
			Self::Id3v2(t) => t.set_album(value),
			Self::Vorbis(c) => Self::vorbis_set(c, &TagType::Album, value),
		}
	}

	/// The comment, or `""`
	pub fn comment(&self) -> &str {
		match self {
			Self::Id3v2(t) => t.comment(),
			Self::Vorbis(c) => Self::vorbis_text(c, &TagType::Comment),
		}
	}

	/// Set the comment. An empty value removes it.
	pub fn set_comment(&mut self, value: &str) {
		match self {
			Self::Id3v2(t) => t.set_comment(value),
			Self::Vorbis(c) => Self::vorbis_set(c, &TagType::Comment, value),
		}
	}

	/// The genre, or `""`
	pub fn genre(&self) -> String {
		match self {
			Self::Id3v2(t) => t.genre(),
			Self::Vorbis(c) => Self::vorbis_text(c, &TagType::Genre).to_owned(),
		}
	}

	/// Set the genre. An empty value removes it.
	pub fn set_genre(&mut self, value: &str) {
		match self {
			Self::Id3v2(t) => t.set_genre(value),
			Self::Vorbis(c) => Self::vorbis_set(c, &TagType::Genre, value),
		}
	}

	/// The release year, or 0
	pub fn year(&self) -> u32 {
		match self {
			Self::Id3v2(t) => t.year(),
			Self::Vorbis(c) => c
				.get_first(&TagType::ReleaseDate)
				.or_else(|| c.get_first(&TagType::Year))
				.map(leading_int)
				.unwrap_or(0),
		}
	}

	/// Set the release year. 0 removes it.
	pub fn set_year(&mut self, year: u32) {
		match self {
			Self::Id3v2(t) => t.set_year(year),
			Self::Vorbis(c) => {
				c.remove(&TagType::Year);
				match year {
					0 => c.remove(&TagType::ReleaseDate),
					x => c.set(&TagType::ReleaseDate, &x.to_string()),
				}
			}
		}
	}

	/// The track number, or 0
	pub fn track(&self) -> u32 {
		match self {
			Self::Id3v2(t) => t.track(),
			Self::Vorbis(c) => c
				.get_first(&TagType::TrackNumber)
				.map(leading_int)
				.unwrap_or(0),
		}
	}

	/// Set the track number. 0 removes it.
	pub fn set_track(&mut self, track: u32) {
		match self {
			Self::Id3v2(t) => t.set_track(track),
			Self::Vorbis(c) => match track {
				0 => c.remove(&TagType::TrackNumber),
				x => c.set(&TagType::TrackNumber, &x.to_string()),
			},
		}
	}
}

// Images
impl Tag {
	/// Can this tag hold images?
	pub fn supports_images(&self) -> bool {
		matches!(self, Self::Id3v2(_))
	}

	/// All images in this tag, in order
	pub fn images(&self) -> impl Iterator<Item = ImageRef<'_>> + '_ {
		match self {
			Self::Id3v2(t) => {
				let major = t.major();
				Either::Left(t.pictures().map(move |(key, frame)| ImageRef {
					key,
					major,
					frame,
				}))
			}
			Self::Vorbis(_) => Either::Right(std::iter::empty()),
		}
	}

	/// Append an image to this tag.
	/// Returns `None` if this tag can't hold images.
	pub fn add_image(
		&mut self,
		picture_type: u8,
		mime: &MimeType,
		description: &str,
		data: Vec<u8>,
	) -> Option<FrameKey> {
		let Self::Id3v2(t) = self else {
			return None;
		};

		let frame = AttachedPictureFrame {
			encoding: TextEncoding::for_text(description, t.major()),
			mime: mime.to_string(),
			picture_type,
			description: description.to_owned(),
			data,
		};

		return Some(t.add_frame(Id3v2Frame::Picture(frame)));
	}

	/// Remove the image with the given key.
	/// Returns `false` if there is no such image.
	pub fn remove_image(&mut self, key: FrameKey) -> bool {
		let Self::Id3v2(t) = self else {
			return false;
		};

		if !matches!(t.frame(key), Some(Id3v2Frame::Picture(_))) {
			return false;
		}

		return t.remove_frame(key).is_some();
	}
}
