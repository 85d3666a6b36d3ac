//! Cross-format normalized tag types

use smartstring::{LazyCompact, SmartString};

/// A universal tag type
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub enum TagType {
	/// A tag we didn't recognize
	Other(SmartString<LazyCompact>),

	/// Album name
	Album,
	/// Album artist
	AlbumArtist,
	/// Comment
	Comment,
	/// Release date
	ReleaseDate,
	/// Disk number
	DiskNumber,
	/// Total disks in album
	DiskTotal,
	/// Genre
	Genre,
	/// International standard recording code
	Isrc,
	/// Track lyrics, possibly time-coded
	Lyrics,
	/// This track's number in its album
	TrackNumber,
	/// The total number of tracks in this track's album
	TrackTotal,
	/// The title of this track
	TrackTitle,
	/// This track's artist (the usual `Artist`,
	/// compare to `AlbumArtist`)
	TrackArtist,
	/// The year this track was released
	Year,
}

impl TagType {
	/// The upper-case vorbis comment key we write for this tag type.
	pub fn vorbis_key(&self) -> SmartString<LazyCompact> {
		match self {
			// This must match `from_vorbis_key` below
			TagType::TrackTitle => "TITLE".into(),
			TagType::Album => "ALBUM".into(),
			TagType::TrackNumber => "TRACKNUMBER".into(),
			TagType::TrackArtist => "ARTIST".into(),
			TagType::AlbumArtist => "ALBUMARTIST".into(),
			TagType::Genre => "GENRE".into(),
			TagType::Isrc => "ISRC".into(),
			TagType::ReleaseDate => "DATE".into(),
			TagType::TrackTotal => "TRACKTOTAL".into(),
			TagType::Lyrics => "LYRICS".into(),
			TagType::Comment => "COMMENT".into(),
			TagType::DiskNumber => "DISCNUMBER".into(),
			TagType::DiskTotal => "DISCTOTAL".into(),
			TagType::Year => "YEAR".into(),
			TagType::Other(x) => x.to_uppercase().into(),
		}
	}

	/// Classify a vorbis comment key. Keys are case-insensitive.
	pub fn from_vorbis_key(key: &str) -> Self {
		match &key.to_uppercase()[..] {
			"TITLE" => TagType::TrackTitle,
			"ALBUM" => TagType::Album,
			"TRACKNUMBER" => TagType::TrackNumber,
			"ARTIST" => TagType::TrackArtist,
			"ALBUMARTIST" => TagType::AlbumArtist,
			"GENRE" => TagType::Genre,
			"ISRC" => TagType::Isrc,
			"DATE" => TagType::ReleaseDate,
			"TRACKTOTAL" | "TOTALTRACKS" => TagType::TrackTotal,
			"LYRICS" => TagType::Lyrics,
			"COMMENT" | "DESCRIPTION" => TagType::Comment,
			"DISCNUMBER" | "DISKNUMBER" => TagType::DiskNumber,
			"DISCTOTAL" | "DISKTOTAL" | "TOTALDISCS" => TagType::DiskTotal,
			"YEAR" => TagType::Year,
			x => TagType::Other(x.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vorbis_keys_are_case_insensitive() {
		assert_eq!(TagType::from_vorbis_key("title"), TagType::TrackTitle);
		assert_eq!(TagType::from_vorbis_key("TrackNumber"), TagType::TrackNumber);
		assert_eq!(
			TagType::from_vorbis_key("replaygain_track_gain"),
			TagType::Other("REPLAYGAIN_TRACK_GAIN".into())
		);
	}

	#[test]
	fn vorbis_key_roundtrip() {
		for t in [
			TagType::TrackTitle,
			TagType::Album,
			TagType::TrackNumber,
			TagType::TrackArtist,
			TagType::AlbumArtist,
			TagType::Genre,
			TagType::Isrc,
			TagType::ReleaseDate,
			TagType::TrackTotal,
			TagType::Lyrics,
			TagType::Comment,
			TagType::DiskNumber,
			TagType::DiskTotal,
			TagType::Year,
			TagType::Other("MOOD".into()),
		] {
			assert_eq!(TagType::from_vorbis_key(&t.vorbis_key()), t);
		}
	}
}
