//! Synthetic audio files for tests.
//!
//! Tags and headers are laid out by hand here, so codec tests
//! don't only check that our encoder agrees with our decoder.

use crate::ogg::page::{OggPage, FLAG_BOS, FLAG_EOS};

/// Stands in for flac audio frames
pub const FLAC_AUDIO: &[u8] = &[
	0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x5A, 0x3C, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
	0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0xC3, 0x9E,
];

fn synchsafe(n: usize) -> [u8; 4] {
	let n = u32::try_from(n).unwrap();
	[
		u8::try_from((n >> 21) & 0x7F).unwrap(),
		u8::try_from((n >> 14) & 0x7F).unwrap(),
		u8::try_from((n >> 7) & 0x7F).unwrap(),
		u8::try_from(n & 0x7F).unwrap(),
	]
}

fn u24_be(n: usize) -> [u8; 3] {
	let [_, a, b, c] = u32::try_from(n).unwrap().to_be_bytes();
	[a, b, c]
}

fn u32_le(n: usize) -> [u8; 4] {
	u32::try_from(n).unwrap().to_le_bytes()
}

/// A vorbis comment body with vendor `testdata`
pub fn vorbis_comment_body(comments: &[(&str, &str)]) -> Vec<u8> {
	let vendor = b"testdata";
	let mut out = Vec::new();
	out.extend(u32_le(vendor.len()));
	out.extend(vendor);
	out.extend(u32_le(comments.len()));
	for (k, v) in comments {
		let entry = format!("{k}={v}");
		out.extend(u32_le(entry.len()));
		out.extend(entry.as_bytes());
	}
	return out;
}

/// A streaminfo block payload:
/// 44.1khz, 2 channels, 16 bits, 88200 samples (two seconds).
fn streaminfo() -> Vec<u8> {
	let mut out = vec![0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0, 0];
	out.extend([0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x01, 0x58, 0x88]);
	out.extend([0u8; 16]);
	assert_eq!(out.len(), 34);
	return out;
}

/// A flac file with a vorbis comment block,
/// then a padding block if `padding` isn't zero.
pub fn flac(comments: &[(&str, &str)], padding: usize) -> Vec<u8> {
	let mut out = b"fLaC".to_vec();

	out.extend([0x00, 0, 0, 34]);
	out.extend(streaminfo());

	let comment = vorbis_comment_body(comments);
	out.push(if padding == 0 { 0x84 } else { 0x04 });
	out.extend(u24_be(comment.len()));
	out.extend(comment);

	if padding != 0 {
		out.push(0x81);
		out.extend(u24_be(padding));
		out.extend(std::iter::repeat(0u8).take(padding));
	}

	out.extend(FLAC_AUDIO);
	return out;
}

/// A flac file with only a streaminfo block
pub fn flac_without_comment() -> Vec<u8> {
	let mut out = b"fLaC".to_vec();
	out.extend([0x80, 0, 0, 34]);
	out.extend(streaminfo());
	out.extend(FLAC_AUDIO);
	return out;
}

/// An id3v2 tag of the given version with latin-1 text frames,
/// followed by `padding` zero bytes.
pub fn id3v2_tag(major: u8, frames: &[(&str, &str)], padding: usize) -> Vec<u8> {
	let mut body = Vec::new();

	for (id, text) in frames {
		let mut payload = vec![0u8];
		payload.extend(text.chars().map(|c| u8::try_from(u32::from(c)).unwrap()));

		body.extend(id.as_bytes());
		match major {
			2 => body.extend(u24_be(payload.len())),
			3 => {
				body.extend(u32::try_from(payload.len()).unwrap().to_be_bytes());
				body.extend([0, 0]);
			}
			_ => {
				body.extend(synchsafe(payload.len()));
				body.extend([0, 0]);
			}
		}
		body.extend(payload);
	}

	body.extend(std::iter::repeat(0u8).take(padding));

	let mut out = vec![b'I', b'D', b'3', major, 0, 0];
	out.extend(synchsafe(body.len()));
	out.extend(body);
	return out;
}

/// A 128kbps, 44.1khz, joint stereo mpeg-1 layer III frame
fn mpeg_frame() -> Vec<u8> {
	let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
	frame.resize(417, 0);
	return frame;
}

/// `n` silent mpeg frames, 417 bytes each
pub fn mpeg_frames(n: usize) -> Vec<u8> {
	mpeg_frame().repeat(n)
}

/// `n` mpeg frames. The first holds a xing header claiming `frames` frames.
pub fn mpeg_xing(frames: u32, n: usize) -> Vec<u8> {
	let mut first = mpeg_frame();
	first[36..40].copy_from_slice(b"Xing");
	first[40..44].copy_from_slice(&[0, 0, 0, 1]);
	first[44..48].copy_from_slice(&frames.to_be_bytes());

	let mut out = first;
	out.extend(mpeg_frames(n - 1));
	return out;
}

/// A vorbis identification header:
/// 2 channels, 44.1khz, 128kbps nominal.
pub fn vorbis_ident() -> Vec<u8> {
	let mut out = b"\x01vorbis".to_vec();
	out.extend(0u32.to_le_bytes());
	out.push(2);
	out.extend(44_100u32.to_le_bytes());
	out.extend(0i32.to_le_bytes());
	out.extend(128_000i32.to_le_bytes());
	out.extend(0i32.to_le_bytes());
	// Block sizes, framing bit
	out.extend([0xB8, 0x01]);
	return out;
}

/// A vorbis comment header packet
pub fn vorbis_comment_packet(comments: &[(&str, &str)]) -> Vec<u8> {
	let mut out = b"\x03vorbis".to_vec();
	out.extend(vorbis_comment_body(comments));
	out.push(0x01);
	return out;
}

/// A vorbis setup header packet. The codebooks are nonsense.
pub fn vorbis_setup() -> Vec<u8> {
	let mut out = b"\x05vorbis".to_vec();
	out.extend((0u8..200).map(|x| x.wrapping_mul(7)));
	return out;
}

fn page(header_type: u8, granule: u64, sequence: u32, packets: &[&[u8]]) -> OggPage {
	let mut segments = Vec::new();
	let mut data = Vec::new();
	for p in packets {
		segments.extend(OggPage::lacing(p.len()));
		data.extend_from_slice(p);
	}

	OggPage {
		header_type,
		granule,
		serial: 0x7A67_0001,
		sequence,
		segments,
		data,
	}
}

/// An ogg stream. The first header packet gets its own page,
/// the rest share the second page. Every audio packet gets its
/// own page, and each one adds 44100 to the granule position.
pub fn ogg_stream(headers: &[&[u8]], audio: &[&[u8]]) -> Vec<u8> {
	let mut pages = Vec::new();

	if let Some((first, rest)) = headers.split_first() {
		pages.push(page(FLAG_BOS, 0, 0, &[*first]));
		if !rest.is_empty() {
			pages.push(page(0, 0, 1, rest));
		}
	}

	let mut granule = 0;
	for (i, packet) in audio.iter().enumerate() {
		granule += 44_100;
		let flags = if i + 1 == audio.len() { FLAG_EOS } else { 0 };
		let sequence = u32::try_from(pages.len()).unwrap();
		pages.push(page(flags, granule, sequence, &[*packet]));
	}

	let mut out = Vec::new();
	for p in &pages {
		p.encode(&mut out);
	}
	return out;
}

/// A two-second ogg vorbis stream with the given comments
pub fn ogg_vorbis(comments: &[(&str, &str)]) -> Vec<u8> {
	let ident = vorbis_ident();
	let comment = vorbis_comment_packet(comments);
	let setup = vorbis_setup();
	let audio = [vec![0x11; 300], vec![0x22; 100]];
	ogg_stream(&[&ident, &comment, &setup], &[&audio[0], &audio[1]])
}
