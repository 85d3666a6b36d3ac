//! Read and rewrite FLAC metadata.

pub mod blocks;
pub mod errors;
mod walker;
pub use walker::*;
