//! Read and write ID3v2 tags.
//!
//! Versions 2.2, 2.3, and 2.4 are supported.
//! A tag is always written back in the version it was read in.

pub mod encoding;
pub mod errors;
pub mod frames;
pub mod genres;
pub mod header;
pub mod synchsafe;

mod tag;
pub use header::tag_region_len;
pub use tag::*;
