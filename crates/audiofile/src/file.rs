//! Open, edit, and save tagged audio files

use std::path::{Path, PathBuf};
use tagcore_util::MimeType;
use tracing::{debug, info, warn};

use crate::{
	common::{atomic::atomic_replace, vorbiscomment::VorbisComment},
	config::TagConfig,
	detect::{AudioFormat, FormatDetector, MagicDetector},
	errors::TagError,
	flac::FlacFile,
	id3v2::{header::Id3v2Header, FrameKey, Id3v2Tag},
	mpeg::MpegStream,
	ogg::OggVorbisFile,
	properties::AudioProperties,
	tag::{ImageRef, Tag},
};

/// The container around a file's tag
#[derive(Debug)]
enum Container {
	/// MPEG audio starts right after the id3v2 region
	Mpeg,
	Flac(FlacFile),
	Ogg(OggVorbisFile),
}

/// An audio file and its tag.
///
/// Opening a file reads it into memory. Edits change the in-memory tag,
/// and [`AudioFile::save`] writes the whole file back atomically.
#[derive(Debug)]
pub struct AudioFile {
	/// Where this file came from, if it came from disk
	path: Option<PathBuf>,

	/// The file as it was when we last read or saved it
	data: Vec<u8>,

	format: AudioFormat,
	container: Container,
	tag: Tag,
	properties: AudioProperties,
	config: TagConfig,

	/// Set if we replaced a corrupt tag with an empty one
	recovered: Option<TagError>,
}

impl AudioFile {
	/// Open the file at `path`, detecting its format by its contents
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TagError> {
		Self::open_with(path, &MagicDetector, TagConfig::default())
	}

	/// Open the file at `path` with the given detector and config
	pub fn open_with(
		path: impl AsRef<Path>,
		detector: &dyn FormatDetector,
		config: TagConfig,
	) -> Result<Self, TagError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(TagError::Io)?;
		let format = detector.classify(Some(path), &data);
		debug!(message = "Opening audio file", path = ?path, format = ?format);
		return Self::load(Some(path.to_path_buf()), data, format, config);
	}

	/// Read a file from memory, detecting its format by its contents.
	/// [`AudioFile::save`] updates the in-memory file,
	/// see [`AudioFile::into_bytes`].
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, TagError> {
		Self::from_bytes_with(data, &MagicDetector, TagConfig::default())
	}

	/// Read a file from memory with the given detector and config
	pub fn from_bytes_with(
		data: Vec<u8>,
		detector: &dyn FormatDetector,
		config: TagConfig,
	) -> Result<Self, TagError> {
		let format = detector.classify(None, &data);
		return Self::load(None, data, format, config);
	}

	fn load(
		path: Option<PathBuf>,
		data: Vec<u8>,
		format: AudioFormat,
		config: TagConfig,
	) -> Result<Self, TagError> {
		let mut recovered = None;

		let (container, tag, properties) = match format {
			AudioFormat::Unknown => return Err(TagError::UnsupportedFormat),

			AudioFormat::Mpeg => {
				let tag = if data.starts_with(b"ID3") {
					match Id3v2Tag::decode(&data) {
						Ok(t) => t,
						Err(e) => {
							// Replace the corrupt tag's region on save. If its header is
							// unreadable too, replace everything before the audio.
							let (major, region_len) = match Id3v2Header::decode(&data) {
								Ok(h) => (h.major, h.region_len().min(data.len())),
								Err(_) => (
									config.id3v2_version,
									MpegStream::find(&data, 0).map(|x| x.offset).unwrap_or(0),
								),
							};

							warn!(
								message = "Could not read id3v2 tag, replacing it with an empty one",
								error = %e,
								region_len
							);
							recovered = Some(TagError::from(e));
							Id3v2Tag::replacing(major, region_len)
						}
					}
				} else {
					Id3v2Tag::new(config.id3v2_version)
				};

				let properties = AudioProperties::from_mpeg(&data, tag.region_len());
				(Container::Mpeg, Tag::Id3v2(tag), properties)
			}

			AudioFormat::Flac => {
				let flac = FlacFile::parse(&data)?;
				let comment = match (flac.vorbis_comment(), flac.comment_error()) {
					(Some(c), _) => c.clone(),
					(None, Some(e)) => {
						warn!(
							message = "Could not read flac vorbis comment, replacing it with an empty one",
							error = %e
						);
						recovered = Some(TagError::CorruptTag(e.to_string()));
						VorbisComment::new(&config.vendor)
					}
					(None, None) => VorbisComment::new(&config.vendor),
				};

				let properties = AudioProperties::from_flac(&flac);
				(Container::Flac(flac), Tag::Vorbis(comment), properties)
			}

			AudioFormat::OggVorbis => {
				let ogg = OggVorbisFile::parse(&data)?;
				let comment = match (ogg.vorbis_comment(), ogg.comment_error()) {
					(Some(c), _) => c.clone(),
					(None, Some(e)) => {
						warn!(
							message = "Could not read vorbis comment header, replacing it with an empty one",
							error = %e
						);
						recovered = Some(TagError::CorruptTag(e.to_string()));
						VorbisComment::new(&config.vendor)
					}
					(None, None) => VorbisComment::new(&config.vendor),
				};

				let properties = AudioProperties::from_vorbis(&ogg);
				(Container::Ogg(ogg), Tag::Vorbis(comment), properties)
			}
		};

		return Ok(Self {
			path,
			data,
			format,
			container,
			tag,
			properties,
			config,
			recovered,
		});
	}
}

impl AudioFile {
	/// The path this file was opened from
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// This file's container format
	pub fn format(&self) -> AudioFormat {
		self.format
	}

	/// This file's tag
	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	/// This file's tag, mutably
	pub fn tag_mut(&mut self) -> &mut Tag {
		&mut self.tag
	}

	/// Audio stream properties, read when this file was opened
	pub fn properties(&self) -> &AudioProperties {
		&self.properties
	}

	/// If we replaced a corrupt tag with an empty one while opening
	/// this file, the error we got reading it.
	pub fn recovered_error(&self) -> Option<&TagError> {
		self.recovered.as_ref()
	}

	/// The file, as it was last read or saved
	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}
}

// Scalar fields
impl AudioFile {
	/// The track title, or `""`
	pub fn title(&self) -> &str {
		self.tag.title()
	}

	/// Set the track title
	pub fn set_title(&mut self, value: &str) {
		self.tag.set_title(value)
	}

	/// The track artist, or `""`
	pub fn artist(&self) -> &str {
		self.tag.artist()
	}

	/// Set the track artist
	pub fn set_artist(&mut self, value: &str) {
		self.tag.set_artist(value)
	}

	/// The album title, or `""`
	pub fn album(&self) -> &str {
		self.tag.album()
	}

	/// Set the album title
	pub fn set_album(&mut self, value: &str) {
		self.tag.set_album(value)
	}

	/// The comment, or `""`
	pub fn comment(&self) -> &str {
		self.tag.comment()
	}

	/// Set the comment
	pub fn set_comment(&mut self, value: &str) {
		self.tag.set_comment(value)
	}

	/// The genre, or `""`
	pub fn genre(&self) -> String {
		self.tag.genre()
	}

	/// Set the genre
	pub fn set_genre(&mut self, value: &str) {
		self.tag.set_genre(value)
	}

	/// The release year, or 0
	pub fn year(&self) -> u32 {
		self.tag.year()
	}

	/// Set the release year. 0 removes it.
	pub fn set_year(&mut self, year: u32) {
		self.tag.set_year(year)
	}

	/// The track number, or 0
	pub fn track(&self) -> u32 {
		self.tag.track()
	}

	/// Set the track number. 0 removes it.
	pub fn set_track(&mut self, track: u32) {
		self.tag.set_track(track)
	}
}

// Images
impl AudioFile {
	/// All images in this file's tag, in order.
	/// Only ID3v2 tags hold images.
	pub fn each_image(&self) -> impl Iterator<Item = ImageRef<'_>> + '_ {
		self.tag.images()
	}

	/// The number of images in this file's tag
	pub fn image_count(&self) -> usize {
		self.tag.images().count()
	}

	/// Get an image by index
	pub fn image(&self, index: usize) -> Result<ImageRef<'_>, TagError> {
		self.tag
			.images()
			.nth(index)
			.ok_or_else(|| TagError::IndexOutOfRange {
				index,
				len: self.image_count(),
			})
	}

	/// Add an image to this file's tag.
	///
	/// Returns `Ok(None)` and changes nothing if this file's tag
	/// can't hold images, even if the image is incomplete.
	pub fn add_image(
		&mut self,
		picture_type: u8,
		mime_type: &str,
		description: &str,
		data: Vec<u8>,
	) -> Result<Option<FrameKey>, TagError> {
		if !self.tag.supports_images() {
			debug!(message = "Ignoring image, this tag can't hold images", format = ?self.format);
			return Ok(None);
		}

		if mime_type.is_empty() {
			return Err(TagError::MissingRequiredField("mime_type"));
		}

		let mime = MimeType::from(mime_type);
		return Ok(self.tag.add_image(picture_type, &mime, description, data));
	}

	/// Remove an image by key.
	/// Returns `false` if there is no such image.
	pub fn remove_image(&mut self, key: FrameKey) -> bool {
		self.tag.remove_image(key)
	}
}

impl AudioFile {
	/// Build the new file
	fn render(&mut self) -> Result<Vec<u8>, TagError> {
		let padding = usize::try_from(self.config.padding).unwrap();

		return Ok(match (&mut self.container, &self.tag) {
			(Container::Mpeg, Tag::Id3v2(tag)) => {
				let region = tag.render(padding)?;
				let audio = self.data.get(tag.region_len()..).unwrap_or(&[]);

				let mut out = Vec::with_capacity(region.len() + audio.len());
				out.extend_from_slice(&region);
				out.extend_from_slice(audio);
				out
			}

			(Container::Flac(flac), Tag::Vorbis(comment)) => {
				flac.set_vorbis_comment(comment.clone());
				flac.render(&self.data, self.config.padding)?
			}

			(Container::Ogg(ogg), Tag::Vorbis(comment)) => {
				ogg.set_vorbis_comment(comment.clone())?;
				ogg.render()
			}

			// `load()` never pairs other tags and containers
			_ => return Err(TagError::UnsupportedFormat),
		});
	}

	/// Write this file's tag back to its source.
	///
	/// The whole file is rebuilt in memory, then atomically replaces the
	/// file on disk: if saving fails, the file on disk is unchanged.
	/// Image references are invalid after a save.
	pub fn save(&mut self) -> Result<(), TagError> {
		let new = self.render()?;

		if let Some(path) = &self.path {
			atomic_replace(path, &new).map_err(TagError::AtomicWriteFailure)?;
			info!(message = "Saved audio file", path = ?path, len = new.len());
		}

		match (&mut self.container, &mut self.tag) {
			(Container::Mpeg, Tag::Id3v2(tag)) => {
				// The audio didn't change, only its offset
				let region_len = if new.starts_with(b"ID3") {
					Id3v2Header::decode(&new)?.region_len()
				} else {
					0
				};
				tag.mark_saved(region_len);
			}
			(Container::Flac(flac), _) => *flac = FlacFile::parse(&new)?,
			(Container::Ogg(ogg), _) => *ogg = OggVorbisFile::parse(&new)?,
			_ => {}
		}

		self.data = new;
		self.recovered = None;
		return Ok(());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		common::tagtype::TagType,
		detect::ExtensionDetector,
		id3v2::{
			frames::{Id3v2Frame, UnknownFrame},
			Id3v2State,
		},
		testdata,
	};
	use sha2::{Digest, Sha256};

	fn mp3(frames: &[(&str, &str)], padding: usize) -> Vec<u8> {
		let mut data = testdata::id3v2_tag(3, frames, padding);
		data.extend(testdata::mpeg_frames(20));
		data
	}

	fn hash(data: &[u8]) -> Vec<u8> {
		Sha256::digest(data).to_vec()
	}

	fn id3v2(f: &AudioFile) -> &Id3v2Tag {
		match f.tag() {
			Tag::Id3v2(t) => t,
			Tag::Vorbis(_) => panic!("expected an id3v2 tag"),
		}
	}

	#[test]
	fn scenario_a_read_id3v23() {
		let f = AudioFile::from_bytes(mp3(
			&[("TIT2", "Test Song"), ("TPE1", "Test Artist")],
			0,
		))
		.unwrap();

		assert_eq!(f.format(), AudioFormat::Mpeg);
		assert_eq!(f.title(), "Test Song");
		assert_eq!(f.artist(), "Test Artist");
		assert_eq!(f.properties().sample_rate_hz, 44_100);
		assert_eq!(f.properties().bitrate_kbps, 128);
		assert!(f.recovered_error().is_none());
	}

	#[test]
	fn scenario_b_add_image() {
		let mut f = AudioFile::from_bytes(mp3(&[("TIT2", "Song")], 0)).unwrap();
		assert_eq!(f.image_count(), 0);

		let data: Vec<u8> = (1..=17).collect();
		let key = f
			.add_image(3, "image/jpeg", "cover", data.clone())
			.unwrap()
			.unwrap();

		assert_eq!(f.image_count(), 1);
		let img = f.image(0).unwrap();
		assert_eq!(img.key(), key);
		assert_eq!(img.id(), "APIC");
		assert_eq!(img.picture_type(), 3);
		assert_eq!(img.mime_type(), "image/jpeg");
		assert_eq!(img.description(), "cover");
		assert_eq!(img.data(), &data[..]);

		// The image survives a save
		f.save().unwrap();
		let f = AudioFile::from_bytes(f.into_bytes()).unwrap();
		assert_eq!(f.image_count(), 1);
		assert_eq!(f.image(0).unwrap().data(), &data[..]);
		assert_eq!(f.title(), "Song");
	}

	#[test]
	fn scenario_c_no_tag() {
		let mut f = AudioFile::from_bytes(testdata::mpeg_frames(20)).unwrap();

		assert_eq!(f.title(), "");
		assert_eq!(f.artist(), "");
		assert_eq!(f.album(), "");
		assert_eq!(f.comment(), "");
		assert_eq!(f.genre(), "");
		assert_eq!(f.year(), 0);
		assert_eq!(f.track(), 0);
		assert_eq!(f.image_count(), 0);
		assert_eq!(id3v2(&f).state(), Id3v2State::Absent);
		assert_eq!(id3v2(&f).major(), 4);

		// Saving an absent tag changes nothing
		f.save().unwrap();
		assert_eq!(f.into_bytes(), testdata::mpeg_frames(20));
	}

	#[test]
	fn scenario_d_vorbis_track() {
		let mut f =
			AudioFile::from_bytes(testdata::ogg_vorbis(&[("TRACKNUMBER", "7")])).unwrap();

		assert_eq!(f.format(), AudioFormat::OggVorbis);
		assert_eq!(f.track(), 7);

		let added = f.add_image(3, "image/jpeg", "cover", vec![1, 2, 3]).unwrap();
		assert!(added.is_none());
		assert_eq!(f.image_count(), 0);

		// Still a no-op when the image is incomplete
		assert!(matches!(f.add_image(3, "", "cover", vec![1]), Ok(None)));
		assert!(matches!(
			f.image(0),
			Err(TagError::IndexOutOfRange { index: 0, len: 0 })
		));
	}

	#[test]
	fn synthesize_tag_on_untagged_mpeg() {
		let mut f = AudioFile::from_bytes(testdata::mpeg_frames(20)).unwrap();
		f.set_title("New");
		f.set_year(2020);
		f.save().unwrap();

		assert_eq!(id3v2(&f).state(), Id3v2State::Loaded);

		let data = f.into_bytes();
		let g = AudioFile::from_bytes(data.clone()).unwrap();
		assert_eq!(g.title(), "New");
		assert_eq!(g.year(), 2020);
		assert_eq!(id3v2(&g).major(), 4);

		// Audio is untouched, after the tag and its padding
		let audio = testdata::mpeg_frames(20);
		assert_eq!(
			hash(&data[data.len() - audio.len()..]),
			hash(&audio)
		);
		assert_eq!(g.properties().duration_ms, duration_of(&audio));
	}

	fn duration_of(audio: &[u8]) -> u64 {
		AudioProperties::from_mpeg(audio, 0).duration_ms
	}

	#[test]
	fn grow_tag_moves_audio() {
		let data = mp3(&[("TIT2", "Song")], 0);
		let audio = testdata::mpeg_frames(20);

		let mut f = AudioFile::from_bytes(data.clone()).unwrap();
		f.set_album(&"a".repeat(500));
		f.save().unwrap();
		let out = f.into_bytes();

		assert!(out.len() > data.len());
		assert!(out.ends_with(&audio));

		let g = AudioFile::from_bytes(out).unwrap();
		assert_eq!(g.album(), "a".repeat(500));
		assert_eq!(g.title(), "Song");
	}

	#[test]
	fn padding_absorbs_small_edits() {
		let data = mp3(&[("TIT2", "Song")], 256);
		let mut f = AudioFile::from_bytes(data.clone()).unwrap();
		f.set_artist("Someone");
		f.save().unwrap();

		let out = f.into_bytes();
		assert_eq!(out.len(), data.len());
		assert_eq!(AudioFile::from_bytes(out).unwrap().artist(), "Someone");
	}

	#[test]
	fn save_is_idempotent() {
		let mut f = AudioFile::from_bytes(mp3(&[("TIT2", "Song")], 0)).unwrap();
		f.set_comment("Hello");
		f.save().unwrap();
		let first = f.data.clone();

		f.save().unwrap();
		assert_eq!(f.data, first);

		let g = AudioFile::from_bytes(first).unwrap();
		assert_eq!(g.comment(), "Hello");
		assert_eq!(g.title(), "Song");
	}

	#[test]
	fn unknown_frames_are_preserved() {
		let payload: Vec<u8> = (0..=255).collect();
		let mut f = AudioFile::from_bytes(mp3(&[("TIT2", "Song")], 0)).unwrap();

		if let Tag::Id3v2(t) = f.tag_mut() {
			t.add_frame(Id3v2Frame::Unknown(UnknownFrame {
				id: "PRIV".into(),
				flags: 0,
				payload: payload.clone(),
			}));
		}
		f.save().unwrap();

		let mut g = AudioFile::from_bytes(f.into_bytes()).unwrap();
		g.set_title("Changed");
		g.save().unwrap();

		let g = AudioFile::from_bytes(g.into_bytes()).unwrap();
		let priv_frame = id3v2(&g).frames().find_map(|(_, x)| match x {
			Id3v2Frame::Unknown(u) if u.id.as_str() == "PRIV" => Some(u.payload.clone()),
			_ => None,
		});
		assert_eq!(priv_frame, Some(payload));
	}

	#[test]
	fn remove_image_by_key() {
		let mut f = AudioFile::from_bytes(mp3(&[], 0)).unwrap();
		let a = f.add_image(3, "image/png", "a", vec![1]).unwrap().unwrap();
		let b = f.add_image(4, "image/png", "b", vec![2]).unwrap().unwrap();

		let keys: Vec<FrameKey> = f.each_image().map(|x| x.key()).collect();
		assert_eq!(keys, vec![a, b]);

		assert!(f.remove_image(a));
		assert!(!f.remove_image(a));
		assert_eq!(f.image_count(), 1);
		assert_eq!(f.image(0).unwrap().description(), "b");
		assert!(matches!(
			f.image(1),
			Err(TagError::IndexOutOfRange { index: 1, len: 1 })
		));
	}

	#[test]
	fn add_image_needs_mime_type() {
		let mut f = AudioFile::from_bytes(mp3(&[], 0)).unwrap();
		assert!(matches!(
			f.add_image(3, "", "cover", vec![1]),
			Err(TagError::MissingRequiredField("mime_type"))
		));
		assert_eq!(f.image_count(), 0);
		assert_eq!(id3v2(&f).state(), Id3v2State::Loaded);
	}

	#[test]
	fn corrupt_id3v2_is_recovered() {
		let mut data = mp3(&[("TIT2", "Song")], 0);
		// Frame size runs past the tag
		data[10 + 7] = 0x7F;
		let tag_len = testdata::id3v2_tag(3, &[("TIT2", "Song")], 0).len();

		let mut f = AudioFile::from_bytes(data).unwrap();
		assert!(matches!(f.recovered_error(), Some(TagError::CorruptTag(_))));
		assert_eq!(f.title(), "");
		assert_eq!(id3v2(&f).major(), 3);

		// Small enough to fit in the old tag's region
		f.set_title("Fix");
		f.save().unwrap();
		assert!(f.recovered_error().is_none());

		let out = f.into_bytes();
		assert!(out.ends_with(&testdata::mpeg_frames(20)));
		assert_eq!(out.len(), tag_len + testdata::mpeg_frames(20).len());
		assert_eq!(AudioFile::from_bytes(out).unwrap().title(), "Fix");
	}

	#[test]
	fn unreadable_id3v2_header_is_replaced() {
		// Unknown major version, then junk before the first frame
		let mut data = b"ID3\x09\x00\x00\x00\x00\x00\x10".to_vec();
		data.extend([0x55; 16]);
		let audio = testdata::mpeg_frames(20);
		data.extend(&audio);

		let mut f = AudioFile::from_bytes(data).unwrap();
		assert!(f.recovered_error().is_some());
		assert_eq!(f.properties().bitrate_kbps, 128);

		f.set_title("Clean");
		f.save().unwrap();
		let out = f.into_bytes();

		let g = AudioFile::from_bytes(out.clone()).unwrap();
		assert_eq!(g.title(), "Clean");
		assert!(g.recovered_error().is_none());
		assert_eq!(id3v2(&g).region_len() + audio.len(), out.len());
		assert!(out.ends_with(&audio));
	}

	#[test]
	fn damaged_ogg_audio_still_opens() {
		let data = testdata::ogg_vorbis(&[("TRACKNUMBER", "7")]);
		let truncated = data[..data.len() - 5].to_vec();

		let mut f = AudioFile::from_bytes(truncated.clone()).unwrap();
		assert_eq!(f.track(), 7);

		f.set_title("Song");
		f.save().unwrap();
		let out = f.into_bytes();
		assert!(out.ends_with(&truncated[truncated.len() - 50..]));

		let g = AudioFile::from_bytes(out).unwrap();
		assert_eq!(g.title(), "Song");
		assert_eq!(g.track(), 7);

		let mut tagged = data;
		tagged.extend_from_slice(b"TAG");
		tagged.extend([0u8; 125]);
		assert_eq!(AudioFile::from_bytes(tagged).unwrap().track(), 7);
	}

	#[test]
	fn unsupported() {
		assert!(matches!(
			AudioFile::from_bytes(b"RIFF\x00\x00\x00\x00WAVE".to_vec()),
			Err(TagError::UnsupportedFormat)
		));
	}

	#[test]
	fn broken_container_fails() {
		let data = testdata::flac(&[("TITLE", "Song")], 0);
		assert!(matches!(
			AudioFile::from_bytes(data[..50].to_vec()),
			Err(TagError::CorruptTag(_))
		));
	}

	#[test]
	fn flac_roundtrip() {
		let mut f = AudioFile::from_bytes(testdata::flac(&[("TITLE", "Song")], 0)).unwrap();
		assert_eq!(f.format(), AudioFormat::Flac);
		assert_eq!(f.title(), "Song");
		assert_eq!(f.properties().duration_seconds(), 2);

		f.set_artist("Someone");
		f.set_track(3);
		assert_eq!(f.add_image(3, "image/png", "", vec![1]).unwrap(), None);
		f.save().unwrap();

		let out = f.into_bytes();
		assert!(out.ends_with(testdata::FLAC_AUDIO));

		let g = AudioFile::from_bytes(out).unwrap();
		assert_eq!(g.title(), "Song");
		assert_eq!(g.artist(), "Someone");
		assert_eq!(g.track(), 3);

		let Tag::Vorbis(c) = g.tag() else {
			panic!("expected a vorbis comment")
		};
		assert_eq!(c.get_first(&TagType::TrackNumber), Some("3"));
	}

	#[test]
	fn flac_corrupt_comment_is_recovered() {
		let mut data = testdata::flac(&[("TITLE", "Song")], 0);
		let at = 4 + 4 + 34 + 4;
		data[at..at + 4].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0x00]);

		let mut f = AudioFile::from_bytes(data).unwrap();
		assert!(f.recovered_error().is_some());
		assert_eq!(f.title(), "");

		f.set_title("Fixed");
		f.save().unwrap();
		let g = AudioFile::from_bytes(f.into_bytes()).unwrap();
		assert_eq!(g.title(), "Fixed");
		assert!(g.recovered_error().is_none());
	}

	#[test]
	fn ogg_roundtrip() {
		let mut f = AudioFile::from_bytes(testdata::ogg_vorbis(&[("TITLE", "Song")])).unwrap();
		assert_eq!(f.properties().duration_ms, 2_000);

		f.set_genre("Jazz");
		f.set_year(1959);
		f.save().unwrap();

		let g = AudioFile::from_bytes(f.into_bytes()).unwrap();
		assert_eq!(g.title(), "Song");
		assert_eq!(g.genre(), "Jazz");
		assert_eq!(g.year(), 1959);
		assert_eq!(g.properties().duration_ms, 2_000);
	}

	#[test]
	fn save_to_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("song.mp3");
		std::fs::write(&path, mp3(&[("TIT2", "Song")], 0)).unwrap();

		let mut f = AudioFile::open(&path).unwrap();
		assert_eq!(f.path(), Some(path.as_path()));
		f.set_title("On disk");
		f.save().unwrap();

		let g = AudioFile::open(&path).unwrap();
		assert_eq!(g.title(), "On disk");
	}

	#[test]
	fn failed_save_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("song.mp3");
		let original = mp3(&[("TIT2", "Song")], 0);
		std::fs::write(&path, &original).unwrap();

		let mut f = AudioFile::open(&path).unwrap();
		f.set_title("Lost");

		// Nowhere to put the temporary file
		drop(dir);
		assert!(matches!(f.save(), Err(TagError::AtomicWriteFailure(_))));

		// The in-memory state still describes the old file
		assert_eq!(f.data, original);
	}

	#[test]
	fn open_missing_file() {
		assert!(matches!(
			AudioFile::open("/no/such/file.mp3"),
			Err(TagError::Io(_))
		));
	}

	#[test]
	fn extension_detector() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("song.ogg");
		std::fs::write(&path, testdata::ogg_vorbis(&[("ARTIST", "X")])).unwrap();

		let f = AudioFile::open_with(&path, &ExtensionDetector, TagConfig::default()).unwrap();
		assert_eq!(f.format(), AudioFormat::OggVorbis);
		assert_eq!(f.artist(), "X");

		// Extensions can lie
		let bad = dir.path().join("song.flac");
		std::fs::write(&bad, testdata::ogg_vorbis(&[])).unwrap();
		assert!(matches!(
			AudioFile::open_with(&bad, &ExtensionDetector, TagConfig::default()),
			Err(TagError::CorruptTag(_))
		));
	}

	#[test]
	fn config_controls_new_tags() {
		let config = TagConfig {
			id3v2_version: 3,
			padding: 0,
			vendor: "custom".into(),
			..Default::default()
		};

		let mut f = AudioFile::from_bytes_with(
			testdata::mpeg_frames(5),
			&MagicDetector,
			config.clone(),
		)
		.unwrap();
		f.set_title("x");
		f.save().unwrap();
		let out = f.into_bytes();
		assert_eq!(out[3], 3);
		// TIT2 frame header, encoding byte, "x", and no padding
		assert_eq!(out.len(), 10 + 10 + 2 + 417 * 5);

		let flac = testdata::flac_without_comment();
		let f = AudioFile::from_bytes_with(flac, &MagicDetector, config).unwrap();
		let Tag::Vorbis(c) = f.tag() else {
			panic!("expected a vorbis comment")
		};
		assert_eq!(c.vendor.as_str(), "custom");
	}
}
