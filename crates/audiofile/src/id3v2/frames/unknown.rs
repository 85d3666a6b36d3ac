use super::FrameId;

/// A frame we do not interpret.
///
/// Its payload and flags are written back exactly as they were read.
/// Compressed and encrypted frames always end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFrame {
	/// This frame's id
	pub id: FrameId,

	/// This frame's flags, as found in the file.
	/// Always zero in ID3v2.2.
	pub flags: u16,

	/// This frame's raw payload
	pub payload: Vec<u8>,
}
