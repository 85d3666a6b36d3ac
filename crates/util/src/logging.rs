//! Log filter presets for applications that embed the tag codec.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::Info
	}
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Trace => write!(f, "trace"),
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
		}
	}
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LoggingPreset {
	Default,
	Verbose,
	Develop,
	Trace,
}

impl Default for LoggingPreset {
	fn default() -> Self {
		return Self::Default;
	}
}

impl LoggingPreset {
	pub fn get_config(&self) -> LoggingConfig {
		match self {
			Self::Default => LoggingConfig {
				other: LogLevel::Warn,

				id3v2: LogLevel::Warn,
				flac: LogLevel::Warn,
				ogg: LogLevel::Warn,
				mpeg: LogLevel::Warn,
				file: LogLevel::Info,
			},

			Self::Verbose => LoggingConfig {
				other: LogLevel::Warn,

				id3v2: LogLevel::Info,
				flac: LogLevel::Info,
				ogg: LogLevel::Info,
				mpeg: LogLevel::Info,
				file: LogLevel::Debug,
			},

			Self::Develop => LoggingConfig {
				other: LogLevel::Debug,

				id3v2: LogLevel::Debug,
				flac: LogLevel::Debug,
				ogg: LogLevel::Debug,
				mpeg: LogLevel::Debug,
				file: LogLevel::Trace,
			},

			Self::Trace => LoggingConfig {
				other: LogLevel::Trace,

				id3v2: LogLevel::Trace,
				flac: LogLevel::Trace,
				ogg: LogLevel::Trace,
				mpeg: LogLevel::Trace,
				file: LogLevel::Trace,
			},
		}
	}
}

#[derive(Debug)]
pub struct LoggingConfig {
	other: LogLevel,

	id3v2: LogLevel,
	flac: LogLevel,
	ogg: LogLevel,
	mpeg: LogLevel,
	file: LogLevel,
}

impl LoggingConfig {
	/// The filter directives for this config, joined with commas.
	pub fn directives(&self) -> String {
		[
			format!("tagcore_audiofile::id3v2={}", self.id3v2),
			format!("tagcore_audiofile::flac={}", self.flac),
			format!("tagcore_audiofile::ogg={}", self.ogg),
			format!("tagcore_audiofile::mpeg={}", self.mpeg),
			format!("tagcore_audiofile::file={}", self.file),
			format!("tagcore_util={}", self.other),
			self.other.to_string(),
		]
		.join(",")
	}
}

impl From<LoggingConfig> for EnvFilter {
	fn from(value: LoggingConfig) -> Self {
		EnvFilter::from_str(&value.directives()).unwrap()
	}
}
