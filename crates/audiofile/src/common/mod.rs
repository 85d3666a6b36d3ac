//! Types and codecs shared by several formats

pub mod atomic;
pub mod bytes;
pub mod picturetype;
pub mod tagtype;
pub mod vorbiscomment;
