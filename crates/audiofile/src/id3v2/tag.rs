//! An in-memory id3v2 tag

use tracing::{debug, trace};

use super::{
	encoding::TextEncoding,
	errors::{Id3v2DecodeError, Id3v2EncodeError},
	frames::{AttachedPictureFrame, CommentFrame, Id3v2Frame, TextFrame},
	genres::resolve_genre,
	header::{Id3v2Header, FLAG_EXTENDED, HEADER_LEN},
	synchsafe::{self, MAX_SYNCHSAFE},
};
use crate::common::bytes::ByteCursor;

/// Identifies one frame inside one tag.
///
/// Keys are never reused within a tag, so a key held across
/// a removal can't silently point at another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey(u32);

/// Where a tag is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3v2State {
	/// This tag was not found in the file and has not been modified
	Absent,

	/// This tag matches what's in the file
	Loaded,

	/// This tag has been modified since it was loaded or saved
	Dirty,
}

/// A scalar field with a canonical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
	Title,
	Artist,
	Album,
	Genre,
	Year,
	Track,
}

impl Field {
	/// The frame we write this field to
	fn frame_id(self, major: u8) -> &'static str {
		match (self, major) {
			(Self::Title, 2) => "TT2",
			(Self::Title, _) => "TIT2",
			(Self::Artist, 2) => "TP1",
			(Self::Artist, _) => "TPE1",
			(Self::Album, 2) => "TAL",
			(Self::Album, _) => "TALB",
			(Self::Genre, 2) => "TCO",
			(Self::Genre, _) => "TCON",
			(Self::Track, 2) => "TRK",
			(Self::Track, _) => "TRCK",
			(Self::Year, 2) => "TYE",
			(Self::Year, 3) => "TYER",
			(Self::Year, _) => "TDRC",
		}
	}

	/// Frames we read this field from, in order of preference
	fn read_ids(self, major: u8) -> &'static [&'static str] {
		match (self, major) {
			(Self::Year, 3) => &["TYER", "TDRC"],
			(Self::Year, 4) => &["TDRC", "TYER"],
			(Self::Title, 2) => &["TT2"],
			(Self::Title, _) => &["TIT2"],
			(Self::Artist, 2) => &["TP1"],
			(Self::Artist, _) => &["TPE1"],
			(Self::Album, 2) => &["TAL"],
			(Self::Album, _) => &["TALB"],
			(Self::Genre, 2) => &["TCO"],
			(Self::Genre, _) => &["TCON"],
			(Self::Track, 2) => &["TRK"],
			(Self::Track, _) => &["TRCK"],
			(Self::Year, _) => &["TYE"],
		}
	}
}

/// Parse the integer at the start of `s`: `"7/12"` is 7, `"2004-05-01"` is 2004.
pub(crate) fn leading_int(s: &str) -> u32 {
	let s = s.trim_start();
	let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
	s[..end].parse().unwrap_or(0)
}

/// An id3v2 tag: a version and an ordered list of frames
#[derive(Debug, Clone)]
pub struct Id3v2Tag {
	major: u8,
	revision: u8,
	frames: Vec<(FrameKey, Id3v2Frame)>,
	next_key: u32,

	/// The number of bytes this tag used in its file.
	/// Zero if it wasn't read from a file.
	region_len: usize,

	state: Id3v2State,
}

impl Id3v2Tag {
	/// Make a new empty tag.
	/// `major` must be 2, 3, or 4.
	pub fn new(major: u8) -> Self {
		Self {
			major: major.clamp(2, 4),
			revision: 0,
			frames: Vec::new(),
			next_key: 0,
			region_len: 0,
			state: Id3v2State::Absent,
		}
	}

	/// Make an empty tag that replaces `region_len` bytes of an existing one.
	/// Used when the existing tag can't be read.
	pub fn replacing(major: u8, region_len: usize) -> Self {
		let mut t = Self::new(major);
		t.region_len = region_len;
		t.state = Id3v2State::Dirty;
		return t;
	}

	/// Decode the tag at the start of `data`.
	pub fn decode(data: &[u8]) -> Result<Self, Id3v2DecodeError> {
		let header = Id3v2Header::decode(data)?;

		if header.major == 2 && header.flags & FLAG_EXTENDED != 0 {
			// This bit means "compressed" in v2.2, and no compression scheme was ever defined
			return Err(Id3v2DecodeError::MalformedFrame(
				"compressed id3v2.2 tag".into(),
			));
		}

		let mut d = ByteCursor::new(data);
		d.seek(HEADER_LEN)?;
		let body = d.read_bytes(header.size.try_into().unwrap())?;

		let body = if header.is_unsynchronised() {
			synchsafe::resync(body)
		} else {
			body.to_vec()
		};

		let mut d = ByteCursor::new(&body);

		if header.major > 2 && header.flags & FLAG_EXTENDED != 0 {
			let skip: usize = if header.major == 3 {
				// Size excludes itself
				d.read_u32_be()?.try_into().unwrap()
			} else {
				// Size includes itself
				let n: usize = synchsafe::decode(d.read_array::<4>()?)?
					.try_into()
					.unwrap();
				n.checked_sub(4).ok_or_else(|| {
					Id3v2DecodeError::MalformedFrame("bad extended header size".into())
				})?
			};
			trace!(message = "Skipping extended header", len = skip);
			d.skip(skip)?;
		}

		let mut tag = Self::new(header.major);
		tag.revision = header.revision;
		tag.region_len = header.region_len();
		tag.state = Id3v2State::Loaded;

		while let Some(frame) = Id3v2Frame::parse(&mut d, header.major)? {
			tag.push(frame);
		}

		debug!(
			message = "Read id3v2 tag",
			version = header.major,
			n_frames = tag.frames.len(),
			region_len = tag.region_len
		);

		return Ok(tag);
	}
}

impl Id3v2Tag {
	fn push(&mut self, frame: Id3v2Frame) -> FrameKey {
		let key = FrameKey(self.next_key);
		self.next_key += 1;
		self.frames.push((key, frame));
		return key;
	}

	fn touch(&mut self) {
		self.state = Id3v2State::Dirty;
	}

	/// This tag's major version
	pub fn major(&self) -> u8 {
		self.major
	}

	/// Where this tag is in its lifecycle
	pub fn state(&self) -> Id3v2State {
		self.state
	}

	/// The number of bytes this tag used in its file
	pub fn region_len(&self) -> usize {
		self.region_len
	}

	/// Record that this tag now occupies `region_len` bytes on disk
	pub fn mark_saved(&mut self, region_len: usize) {
		self.region_len = region_len;
		self.state = if region_len == 0 {
			Id3v2State::Absent
		} else {
			Id3v2State::Loaded
		};
	}

	/// All frames, in order
	pub fn frames(&self) -> impl Iterator<Item = (FrameKey, &Id3v2Frame)> + '_ {
		self.frames.iter().map(|(k, f)| (*k, f))
	}

	/// Get a frame by key
	pub fn frame(&self, key: FrameKey) -> Option<&Id3v2Frame> {
		self.frames.iter().find(|(k, _)| *k == key).map(|(_, f)| f)
	}

	/// Append a frame to this tag
	pub fn add_frame(&mut self, frame: Id3v2Frame) -> FrameKey {
		self.touch();
		self.push(frame)
	}

	/// Remove the frame with the given key.
	/// Returns `None` if there is no such frame.
	pub fn remove_frame(&mut self, key: FrameKey) -> Option<Id3v2Frame> {
		let i = self.frames.iter().position(|(k, _)| *k == key)?;
		self.touch();
		Some(self.frames.remove(i).1)
	}

	/// All attached pictures, in order
	pub fn pictures(&self) -> impl Iterator<Item = (FrameKey, &AttachedPictureFrame)> + '_ {
		self.frames.iter().filter_map(|(k, f)| match f {
			Id3v2Frame::Picture(p) => Some((*k, p)),
			_ => None,
		})
	}
}

// Scalar fields
impl Id3v2Tag {
	fn text_frame(&self, id: &str) -> Option<&TextFrame> {
		self.frames.iter().find_map(|(_, f)| match f {
			Id3v2Frame::Text(t) if t.id.as_str() == id => Some(t),
			_ => None,
		})
	}

	fn get(&self, field: Field) -> &str {
		field
			.read_ids(self.major)
			.iter()
			.find_map(|id| self.text_frame(id))
			.map(|x| x.text())
			.unwrap_or("")
	}

	/// Set the first frame for `field` to `value`, removing other frames
	/// this field could be read from. An empty value removes the field.
	fn set(&mut self, field: Field, value: &str) {
		self.touch();
		let id = field.frame_id(self.major);
		let read_ids = field.read_ids(self.major);

		let mut found = false;
		let major = self.major;
		self.frames.retain_mut(|(_, f)| {
			let Id3v2Frame::Text(t) = f else {
				return true;
			};

			if !read_ids.contains(&t.id.as_str()) {
				return true;
			}

			if value.is_empty() || found || t.id.as_str() != id {
				return false;
			}

			found = true;
			t.values = vec![value.to_owned()];
			t.encoding = TextEncoding::for_text(value, major);
			true
		});

		if !found && !value.is_empty() {
			let enc = TextEncoding::for_text(value, self.major);
			self.push(Id3v2Frame::Text(TextFrame::new(id, enc, value)));
		}
	}

	/// The track title, or `""`
	pub fn title(&self) -> &str {
		self.get(Field::Title)
	}

	/// Set the track title
	pub fn set_title(&mut self, value: &str) {
		self.set(Field::Title, value)
	}

	/// The track artist, or `""`
	pub fn artist(&self) -> &str {
		self.get(Field::Artist)
	}

	/// Set the track artist
	pub fn set_artist(&mut self, value: &str) {
		self.set(Field::Artist, value)
	}

	/// The album title, or `""`
	pub fn album(&self) -> &str {
		self.get(Field::Album)
	}

	/// Set the album title
	pub fn set_album(&mut self, value: &str) {
		self.set(Field::Album, value)
	}

	/// The genre, with id3v1 genre references resolved
	pub fn genre(&self) -> String {
		resolve_genre(self.get(Field::Genre))
	}

	/// Set the genre
	pub fn set_genre(&mut self, value: &str) {
		self.set(Field::Genre, value)
	}

	/// The release year, or 0
	pub fn year(&self) -> u32 {
		leading_int(self.get(Field::Year))
	}

	/// Set the release year. 0 removes it.
	pub fn set_year(&mut self, year: u32) {
		match year {
			0 => self.set(Field::Year, ""),
			x => self.set(Field::Year, &x.to_string()),
		}
	}

	/// The track number, or 0
	pub fn track(&self) -> u32 {
		leading_int(self.get(Field::Track))
	}

	/// Set the track number. 0 removes it.
	/// A track total (`"n/total"`) is kept.
	pub fn set_track(&mut self, track: u32) {
		if track == 0 {
			return self.set(Field::Track, "");
		}

		let value = match self.get(Field::Track).split_once('/') {
			Some((_, total)) if !total.is_empty() => format!("{track}/{total}"),
			_ => track.to_string(),
		};
		self.set(Field::Track, &value)
	}

	/// The comment frame the comment field maps to:
	/// the first one without a description, else the first one.
	fn comment_frame(&self) -> Option<usize> {
		let mut first = None;
		for (i, (_, f)) in self.frames.iter().enumerate() {
			if let Id3v2Frame::Comment(c) = f {
				if c.description.is_empty() {
					return Some(i);
				}
				first = first.or(Some(i));
			}
		}
		return first;
	}

	/// The comment, or `""`
	pub fn comment(&self) -> &str {
		match self.comment_frame().map(|i| &self.frames[i].1) {
			Some(Id3v2Frame::Comment(c)) => &c.text,
			_ => "",
		}
	}

	/// Set the comment. An empty value removes it.
	pub fn set_comment(&mut self, value: &str) {
		self.touch();
		let major = self.major;

		match self.comment_frame() {
			Some(i) if value.is_empty() => {
				self.frames.remove(i);
			}
			Some(i) => {
				if let Id3v2Frame::Comment(c) = &mut self.frames[i].1 {
					c.text = value.to_owned();
					c.encoding = TextEncoding::for_text(&format!("{}{value}", c.description), major);
				}
			}
			None if value.is_empty() => {}
			None => {
				let encoding = TextEncoding::for_text(value, major);
				self.push(Id3v2Frame::Comment(CommentFrame::new(encoding, value)));
			}
		}
	}
}

impl Id3v2Tag {
	/// Encode this tag: header, frames, then `padding` zero bytes.
	/// Writers never unsynchronise, and never emit an extended header or footer.
	pub fn encode(&self, padding: usize) -> Result<Vec<u8>, Id3v2EncodeError> {
		let mut frames = Vec::new();
		for (_, f) in &self.frames {
			f.encode(self.major, &mut frames)?;
		}

		let size = frames.len() + padding;
		let size_u32 = u32::try_from(size)
			.ok()
			.filter(|x| *x <= MAX_SYNCHSAFE)
			.ok_or(Id3v2EncodeError::TooLarge(size))?;

		let header = Id3v2Header {
			major: self.major,
			revision: self.revision,
			flags: 0,
			size: size_u32,
		};

		let mut out = Vec::with_capacity(HEADER_LEN + size);
		header.encode(&mut out)?;
		out.extend_from_slice(&frames);
		out.resize(HEADER_LEN + size, 0);
		return Ok(out);
	}

	/// Encode this tag to replace its old region.
	///
	/// If the tag fits in the old region, padding fills the rest and the
	/// result is exactly `region_len()` bytes long. Otherwise, the tag
	/// gets `padding` bytes of padding and the caller must move the audio.
	/// An empty tag that was never in the file encodes to nothing.
	pub fn render(&self, padding: usize) -> Result<Vec<u8>, Id3v2EncodeError> {
		if self.frames.is_empty() && self.region_len == 0 {
			return Ok(Vec::new());
		}

		let tight = self.encode(0)?;
		if tight.len() <= self.region_len {
			debug!(
				message = "Id3v2 tag fits in old region",
				len = tight.len(),
				region_len = self.region_len
			);
			return self.encode(self.region_len - tight.len());
		}

		debug!(
			message = "Id3v2 tag outgrew its region",
			len = tight.len(),
			region_len = self.region_len,
			padding
		);
		return self.encode(padding);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{id3v2::frames::UnknownFrame, testdata};

	#[test]
	fn read_v3() {
		let data = testdata::id3v2_tag(
			3,
			&[("TIT2", "Test Song"), ("TPE1", "Test Artist"), ("TRCK", "7/12")],
			64,
		);
		let t = Id3v2Tag::decode(&data).unwrap();

		assert_eq!(t.state(), Id3v2State::Loaded);
		assert_eq!(t.major(), 3);
		assert_eq!(t.title(), "Test Song");
		assert_eq!(t.artist(), "Test Artist");
		assert_eq!(t.track(), 7);
		assert_eq!(t.album(), "");
		assert_eq!(t.year(), 0);
		assert_eq!(t.region_len(), data.len());
	}

	#[test]
	fn read_v2() {
		let data = testdata::id3v2_tag(2, &[("TT2", "Old"), ("TYE", "1999"), ("TCO", "(17)")], 0);
		let t = Id3v2Tag::decode(&data).unwrap();
		assert_eq!(t.title(), "Old");
		assert_eq!(t.year(), 1999);
		assert_eq!(t.genre(), "Rock");
	}

	#[test]
	fn year_frames_by_version() {
		let data = testdata::id3v2_tag(4, &[("TDRC", "2004-05-01")], 0);
		let mut t = Id3v2Tag::decode(&data).unwrap();
		assert_eq!(t.year(), 2004);

		t.set_year(2010);
		assert_eq!(t.frames().count(), 1);
		assert_eq!(t.frames().next().unwrap().1.id(4), "TDRC");

		let mut t3 = Id3v2Tag::new(3);
		t3.set_year(1987);
		assert_eq!(t3.frames().next().unwrap().1.id(3), "TYER");
		assert_eq!(t3.year(), 1987);
	}

	#[test]
	fn setters_update_first_frame() {
		let data = testdata::id3v2_tag(3, &[("TIT2", "A"), ("TALB", "X"), ("TIT2", "B")], 0);
		let mut t = Id3v2Tag::decode(&data).unwrap();

		t.set_title("C");
		assert_eq!(t.state(), Id3v2State::Dirty);
		assert_eq!(t.title(), "C");
		let ids: Vec<_> = t.frames().map(|(_, f)| f.id(3).to_owned()).collect();
		assert_eq!(ids, vec!["TIT2", "TALB"]);

		t.set_album("");
		assert_eq!(t.album(), "");
		assert_eq!(t.frames().count(), 1);
	}

	#[test]
	fn track_total_is_kept() {
		let data = testdata::id3v2_tag(3, &[("TRCK", "3/10")], 0);
		let mut t = Id3v2Tag::decode(&data).unwrap();
		t.set_track(4);
		assert_eq!(t.get(Field::Track), "4/10");
		assert_eq!(t.track(), 4);
	}

	#[test]
	fn comments() {
		let mut t = Id3v2Tag::new(3);
		let mut named = CommentFrame::new(TextEncoding::Latin1, "named");
		named.description = "iTunNORM".into();
		t.add_frame(Id3v2Frame::Comment(named));
		assert_eq!(t.comment(), "named");

		t.add_frame(Id3v2Frame::Comment(CommentFrame::new(
			TextEncoding::Latin1,
			"plain",
		)));
		assert_eq!(t.comment(), "plain");

		t.set_comment("changed");
		assert_eq!(t.comment(), "changed");
		assert_eq!(t.frames().count(), 2);

		t.set_comment("");
		assert_eq!(t.comment(), "named");
	}

	#[test]
	fn remove_by_key() {
		let mut t = Id3v2Tag::new(4);
		let a = t.add_frame(Id3v2Frame::Text(TextFrame::new(
			"TIT2",
			TextEncoding::Utf8,
			"same",
		)));
		let b = t.add_frame(Id3v2Frame::Text(TextFrame::new(
			"TIT2",
			TextEncoding::Utf8,
			"same",
		)));
		assert_ne!(a, b);

		assert!(t.remove_frame(b).is_some());
		assert!(t.remove_frame(b).is_none());
		assert!(t.frame(a).is_some());

		// Keys are not reused
		let c = t.add_frame(Id3v2Frame::Text(TextFrame::new(
			"TPE1",
			TextEncoding::Utf8,
			"x",
		)));
		assert_ne!(b, c);
	}

	#[test]
	fn roundtrip_is_semantic() {
		let data = testdata::id3v2_tag(
			4,
			&[("TIT2", "Title"), ("TPE1", "Artist"), ("TCON", "Jazz")],
			10,
		);
		let t = Id3v2Tag::decode(&data).unwrap();
		let again = Id3v2Tag::decode(&t.encode(0).unwrap()).unwrap();

		let a: Vec<_> = t.frames().map(|(_, f)| f.clone()).collect();
		let b: Vec<_> = again.frames().map(|(_, f)| f.clone()).collect();
		assert_eq!(a, b);
	}

	#[test]
	fn unknown_frames_survive() {
		let mut t = Id3v2Tag::new(3);
		let payload: Vec<u8> = (0..50).collect();
		t.add_frame(Id3v2Frame::Unknown(UnknownFrame {
			id: "PRIV".into(),
			flags: 0,
			payload: payload.clone(),
		}));

		let again = Id3v2Tag::decode(&t.encode(0).unwrap()).unwrap();
		match again.frames().next().unwrap().1 {
			Id3v2Frame::Unknown(u) => assert_eq!(u.payload, payload),
			_ => panic!("expected an unknown frame"),
		};
	}

	#[test]
	fn render_reuses_region() {
		let data = testdata::id3v2_tag(3, &[("TIT2", "Song")], 100);
		let mut t = Id3v2Tag::decode(&data).unwrap();

		t.set_artist("Someone");
		let out = t.render(1024).unwrap();
		assert_eq!(out.len(), data.len());
		assert_eq!(Id3v2Tag::decode(&out).unwrap().artist(), "Someone");

		t.set_album(&"x".repeat(200));
		let out = t.render(1024).unwrap();
		assert!(out.len() > data.len());
		assert_eq!(Id3v2Header::decode(&out).unwrap().size as usize + 10, out.len());
		assert!(out.ends_with(&[0u8; 1024]));
	}

	#[test]
	fn render_empty() {
		assert!(Id3v2Tag::new(4).render(1024).unwrap().is_empty());

		// An emptied tag still fills its old region
		let data = testdata::id3v2_tag(3, &[("TIT2", "Song")], 0);
		let mut t = Id3v2Tag::decode(&data).unwrap();
		t.set_title("");
		let out = t.render(1024).unwrap();
		assert_eq!(out.len(), data.len());
		assert_eq!(Id3v2Tag::decode(&out).unwrap().frames().count(), 0);
	}

	#[test]
	fn extended_header_and_footer() {
		// v2.4 tag with a 6-byte extended header and a footer
		let mut frames = Vec::new();
		Id3v2Frame::Text(TextFrame::new("TIT2", TextEncoding::Utf8, "Ext"))
			.encode(4, &mut frames)
			.unwrap();

		let mut body = vec![0, 0, 0, 6, 1, 0];
		body.extend(&frames);

		let mut data = b"ID3\x04\x00\x50".to_vec();
		data.extend(synchsafe::encode(body.len() as u32).unwrap());
		data.extend(&body);
		data.extend(b"3DI\x04\x00\x50");
		data.extend(synchsafe::encode(body.len() as u32).unwrap());

		let t = Id3v2Tag::decode(&data).unwrap();
		assert_eq!(t.title(), "Ext");
		assert_eq!(t.region_len(), data.len());

		// Written without extended header or footer
		let out = t.encode(0).unwrap();
		assert_eq!(out[5], 0);
		assert_eq!(out.len(), 10 + frames.len());
	}

	#[test]
	fn unsynchronised_v3_tag() {
		// TIT2 "a\xFF", unsynchronised
		let body = b"TIT2\x00\x00\x00\x03\x00\x00\x00a\xFF\x00";
		let mut data = b"ID3\x03\x00\x80".to_vec();
		data.extend(synchsafe::encode(body.len() as u32).unwrap());
		data.extend(body);

		let t = Id3v2Tag::decode(&data).unwrap();
		assert_eq!(t.title(), "a\u{FF}");

		let out = t.encode(0).unwrap();
		assert_eq!(out[5] & 0x80, 0);
	}

	#[test]
	fn corrupt_frames() {
		let mut data = testdata::id3v2_tag(3, &[("TIT2", "Song")], 0);

		// Frame size larger than the tag
		data[10 + 7] = 0x7F;
		assert!(matches!(
			Id3v2Tag::decode(&data),
			Err(Id3v2DecodeError::MalformedFrame(_))
		));

		// Tag size larger than the data
		let data = testdata::id3v2_tag(3, &[("TIT2", "Song")], 0);
		assert!(matches!(
			Id3v2Tag::decode(&data[..data.len() - 1]),
			Err(Id3v2DecodeError::OutOfBounds(_))
		));
	}

	#[test]
	fn leading_ints() {
		assert_eq!(leading_int("7/12"), 7);
		assert_eq!(leading_int("2004-05-01"), 2004);
		assert_eq!(leading_int(" 12"), 12);
		assert_eq!(leading_int("x"), 0);
		assert_eq!(leading_int(""), 0);
		assert_eq!(leading_int("99999999999"), 0);
	}
}
