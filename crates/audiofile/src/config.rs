use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use tagcore_util::{load_env, logging::LoggingPreset, EnvLoadError};

/// Options that control how tags are written
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TagConfig {
	/// The ID3v2 version of new tags, 3 or 4.
	/// Tags we read are always written back in their own version.
	#[serde(default = "TagConfig::default_id3v2_version")]
	pub id3v2_version: u8,

	/// Bytes of padding to add when a tag outgrows its space,
	/// so the next edit doesn't have to rewrite the whole file.
	#[serde(default = "TagConfig::default_padding")]
	pub padding: u32,

	/// The vendor string of new vorbis comments
	#[serde(default = "TagConfig::default_vendor")]
	pub vendor: SmartString<LazyCompact>,

	/// The log filter a host application should install.
	/// We never install a subscriber ourselves.
	#[serde(default)]
	pub loglevel: LoggingPreset,
}

impl TagConfig {
	fn default_id3v2_version() -> u8 {
		4
	}

	fn default_padding() -> u32 {
		1024
	}

	fn default_vendor() -> SmartString<LazyCompact> {
		"tagcore".into()
	}

	/// Load config from `TAGCORE_*` environment variables,
	/// and from `.env` if it exists.
	pub fn from_env() -> Result<Self, EnvLoadError> {
		let mut config = load_env::<Self>("TAGCORE_")?.into_config();

		if !(3..=4).contains(&config.id3v2_version) {
			tracing::warn!(
				message = "Unsupported id3v2 version in config, using default",
				id3v2_version = config.id3v2_version
			);
			config.id3v2_version = Self::default_id3v2_version();
		}

		return Ok(config);
	}
}

impl Default for TagConfig {
	fn default() -> Self {
		Self {
			id3v2_version: Self::default_id3v2_version(),
			padding: Self::default_padding(),
			vendor: Self::default_vendor(),
			loglevel: LoggingPreset::default(),
		}
	}
}
