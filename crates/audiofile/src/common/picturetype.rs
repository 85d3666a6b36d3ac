//! An audio picture type, according to the ID3v2 APIC frame

use std::fmt::Display;

// TODO: There may only be one each of picture type 1 and 2 in a file.

/// A picture type according to the ID3v2 APIC frame.
///
/// Codes outside of 0..=20 are kept as [`PictureType::Unknown`],
/// so every code survives a decode/encode cycle unchanged.
#[allow(missing_docs)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PictureType {
	Other,
	PngFileIcon,
	OtherFileIcon,
	FrontCover,
	BackCover,
	LeafletPage,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	BandOrchestra,
	Composer,
	Lyricist,
	RecLocation,
	DuringRecording,
	DuringPerformance,
	VideoScreenCapture,
	ABrightColoredFish,
	Illustration,
	ArtistLogotype,
	PublisherLogotype,

	/// A code the ID3v2 standard doesn't define
	Unknown(u32),
}

impl PictureType {
	/// Decode a picture type from the given integer.
	pub fn from_idx(idx: u32) -> Self {
		match idx {
			0 => PictureType::Other,
			1 => PictureType::PngFileIcon,
			2 => PictureType::OtherFileIcon,
			3 => PictureType::FrontCover,
			4 => PictureType::BackCover,
			5 => PictureType::LeafletPage,
			6 => PictureType::Media,
			7 => PictureType::LeadArtist,
			8 => PictureType::Artist,
			9 => PictureType::Conductor,
			10 => PictureType::BandOrchestra,
			11 => PictureType::Composer,
			12 => PictureType::Lyricist,
			13 => PictureType::RecLocation,
			14 => PictureType::DuringRecording,
			15 => PictureType::DuringPerformance,
			16 => PictureType::VideoScreenCapture,
			17 => PictureType::ABrightColoredFish,
			18 => PictureType::Illustration,
			19 => PictureType::ArtistLogotype,
			20 => PictureType::PublisherLogotype,
			x => PictureType::Unknown(x),
		}
	}

	/// Return the index of this picture type
	pub fn to_idx(&self) -> u32 {
		match self {
			PictureType::Other => 0,
			PictureType::PngFileIcon => 1,
			PictureType::OtherFileIcon => 2,
			PictureType::FrontCover => 3,
			PictureType::BackCover => 4,
			PictureType::LeafletPage => 5,
			PictureType::Media => 6,
			PictureType::LeadArtist => 7,
			PictureType::Artist => 8,
			PictureType::Conductor => 9,
			PictureType::BandOrchestra => 10,
			PictureType::Composer => 11,
			PictureType::Lyricist => 12,
			PictureType::RecLocation => 13,
			PictureType::DuringRecording => 14,
			PictureType::DuringPerformance => 15,
			PictureType::VideoScreenCapture => 16,
			PictureType::ABrightColoredFish => 17,
			PictureType::Illustration => 18,
			PictureType::ArtistLogotype => 19,
			PictureType::PublisherLogotype => 20,
			PictureType::Unknown(x) => *x,
		}
	}
}

impl Display for PictureType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Other => write!(f, "Other"),
			Self::PngFileIcon => write!(f, "32x32 pixels file icon (PNG only)"),
			Self::OtherFileIcon => write!(f, "Other file icon"),
			Self::FrontCover => write!(f, "Cover (front)"),
			Self::BackCover => write!(f, "Cover (back)"),
			Self::LeafletPage => write!(f, "Leaflet page"),
			Self::Media => write!(f, "Media"),
			Self::LeadArtist => write!(f, "Lead artist/lead performer/soloist"),
			Self::Artist => write!(f, "Artist/performer"),
			Self::Conductor => write!(f, "Conductor"),
			Self::BandOrchestra => write!(f, "Band/Orchestra"),
			Self::Composer => write!(f, "Composer"),
			Self::Lyricist => write!(f, "Lyricist/text writer"),
			Self::RecLocation => write!(f, "Recording Location"),
			Self::DuringRecording => write!(f, "During recording"),
			Self::DuringPerformance => write!(f, "During performance"),
			Self::VideoScreenCapture => write!(f, "Movie/video screen capture"),
			Self::ABrightColoredFish => write!(f, "A bright coloured fish"),
			Self::Illustration => write!(f, "Illustration"),
			Self::ArtistLogotype => write!(f, "Band/artist logotype"),
			Self::PublisherLogotype => write!(f, "Publisher/Studio logotype"),
			Self::Unknown(x) => write!(f, "Unknown picture type `{x}`"),
		}
	}
}
