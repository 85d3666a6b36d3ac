//! Ogg vorbis streams

pub mod crc;
pub mod errors;
pub mod page;

mod vorbis;
pub use vorbis::*;
