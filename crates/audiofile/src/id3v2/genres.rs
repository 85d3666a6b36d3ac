//! ID3v1 genre names, still referenced by many id3v2 `TCON` frames

/// Genres 0..=79 of the original ID3v1 list
pub const ID3V1_GENRES: [&str; 80] = [
	"Blues",
	"Classic Rock",
	"Country",
	"Dance",
	"Disco",
	"Funk",
	"Grunge",
	"Hip-Hop",
	"Jazz",
	"Metal",
	"New Age",
	"Oldies",
	"Other",
	"Pop",
	"R&B",
	"Rap",
	"Reggae",
	"Rock",
	"Techno",
	"Industrial",
	"Alternative",
	"Ska",
	"Death Metal",
	"Pranks",
	"Soundtrack",
	"Euro-Techno",
	"Ambient",
	"Trip-Hop",
	"Vocal",
	"Jazz+Funk",
	"Fusion",
	"Trance",
	"Classical",
	"Instrumental",
	"Acid",
	"House",
	"Game",
	"Sound Clip",
	"Gospel",
	"Noise",
	"AlternRock",
	"Bass",
	"Soul",
	"Punk",
	"Space",
	"Meditative",
	"Instrumental Pop",
	"Instrumental Rock",
	"Ethnic",
	"Gothic",
	"Darkwave",
	"Techno-Industrial",
	"Electronic",
	"Pop-Folk",
	"Eurodance",
	"Dream",
	"Southern Rock",
	"Comedy",
	"Cult",
	"Gangsta",
	"Top 40",
	"Christian Rap",
	"Pop/Funk",
	"Jungle",
	"Native American",
	"Cabaret",
	"New Wave",
	"Psychadelic",
	"Rave",
	"Showtunes",
	"Trailer",
	"Lo-Fi",
	"Tribal",
	"Acid Punk",
	"Acid Jazz",
	"Polka",
	"Retro",
	"Musical",
	"Rock & Roll",
	"Hard Rock",
];

fn lookup(code: &str) -> Option<&'static str> {
	match code {
		"RX" => Some("Remix"),
		"CR" => Some("Cover"),
		x => x
			.parse::<usize>()
			.ok()
			.and_then(|i| ID3V1_GENRES.get(i).copied()),
	}
}

/// Resolve a `TCON` value to a genre name.
///
/// `"(17)"` and `"17"` become `"Rock"`, `"(RX)"` becomes `"Remix"`.
/// A reference followed by text (`"(4)Eurodisco"`) resolves to that text.
/// Anything else is returned unchanged.
pub fn resolve_genre(value: &str) -> String {
	if let Some(rest) = value.strip_prefix('(') {
		if let Some((code, refinement)) = rest.split_once(')') {
			if !refinement.is_empty() {
				return refinement.to_owned();
			}
			if let Some(g) = lookup(code) {
				return g.to_owned();
			}
		}
	} else if value.bytes().all(|x| x.is_ascii_digit()) {
		if let Some(g) = lookup(value) {
			return g.to_owned();
		}
	}

	return value.to_owned();
}
