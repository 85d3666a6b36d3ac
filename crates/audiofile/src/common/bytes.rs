//! Bounds-checked primitive readers and writers over byte buffers.
//!
//! Every codec in this crate reads through a [`ByteCursor`],
//! so a truncated buffer always surfaces as [`CursorError::OutOfBounds`]
//! instead of a panic.

use std::io::Write;
use thiserror::Error;

/// An error produced by a [`ByteCursor`] or a [`BinaryWriter`]
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CursorError {
	/// We tried to read or seek past the end of the buffer
	#[error("access of {wanted} bytes at offset {offset} exceeds buffer length {len}")]
	OutOfBounds {
		offset: usize,
		wanted: usize,
		len: usize,
	},

	/// Integers are at most eight bytes wide
	#[error("bad integer width {0}")]
	BadWidth(usize),

	/// We tried to write an integer into too few bytes
	#[error("value {value} does not fit in {width} bytes")]
	ValueTooWide { value: u64, width: usize },
}

/// Byte order of a multi-byte integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	Big,
	Little,
}

/// A read-only cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteCursor<'a> {
	/// Make a new cursor at the start of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	/// The current read position
	pub fn position(&self) -> usize {
		self.pos
	}

	/// The total length of the underlying buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// The number of bytes left to read
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	/// True if there is nothing left to read
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Everything we haven't read yet. Does not move the cursor.
	pub fn rest(&self) -> &'a [u8] {
		&self.data[self.pos..]
	}

	fn check(&self, offset: usize, wanted: usize) -> Result<(), CursorError> {
		match offset.checked_add(wanted) {
			Some(end) if end <= self.data.len() => Ok(()),
			_ => Err(CursorError::OutOfBounds {
				offset,
				wanted,
				len: self.data.len(),
			}),
		}
	}

	/// Move to an absolute position.
	/// Seeking to `len()` is allowed, and leaves the cursor empty.
	pub fn seek(&mut self, pos: usize) -> Result<(), CursorError> {
		self.check(pos, 0)?;
		self.pos = pos;
		return Ok(());
	}

	/// Skip `n` bytes
	pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
		self.check(self.pos, n)?;
		self.pos += n;
		return Ok(());
	}

	/// Look at the next `n` bytes without consuming them
	pub fn peek(&self, n: usize) -> Result<&'a [u8], CursorError> {
		self.check(self.pos, n)?;
		return Ok(&self.data[self.pos..self.pos + n]);
	}

	/// Read the next `n` bytes
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
		let out = self.peek(n)?;
		self.pos += n;
		return Ok(out);
	}

	/// Read a fixed number of bytes into an array
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read_bytes(N)?);
		return Ok(out);
	}

	/// Read one byte
	pub fn read_u8(&mut self) -> Result<u8, CursorError> {
		return Ok(self.read_bytes(1)?[0]);
	}

	/// Read an unsigned integer that is `n` bytes wide.
	pub fn read_uint(&mut self, n: usize, endianness: Endianness) -> Result<u64, CursorError> {
		if n > 8 {
			return Err(CursorError::BadWidth(n));
		}

		let bytes = self.read_bytes(n)?;
		let mut out = 0u64;
		match endianness {
			Endianness::Big => {
				for b in bytes {
					out = (out << 8) | u64::from(*b);
				}
			}
			Endianness::Little => {
				for b in bytes.iter().rev() {
					out = (out << 8) | u64::from(*b);
				}
			}
		}

		return Ok(out);
	}

	pub fn read_u16_be(&mut self) -> Result<u16, CursorError> {
		Ok(u16::from_be_bytes(self.read_array()?))
	}

	pub fn read_u24_be(&mut self) -> Result<u32, CursorError> {
		let [a, b, c] = self.read_array()?;
		Ok(u32::from_be_bytes([0, a, b, c]))
	}

	pub fn read_u32_be(&mut self) -> Result<u32, CursorError> {
		Ok(u32::from_be_bytes(self.read_array()?))
	}

	pub fn read_u32_le(&mut self) -> Result<u32, CursorError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	pub fn read_u64_le(&mut self) -> Result<u64, CursorError> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}
}

/// A growable output buffer.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
	buf: Vec<u8>,
}

impl BinaryWriter {
	/// Make a new, empty writer
	pub fn new() -> Self {
		Self::default()
	}

	/// Make a new writer with room for `capacity` bytes
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: Vec::with_capacity(capacity),
		}
	}

	/// Make room for at least `additional` more bytes
	pub fn reserve(&mut self, additional: usize) {
		self.buf.reserve(additional);
	}

	/// The number of bytes written so far
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.buf
	}

	pub fn into_inner(self) -> Vec<u8> {
		self.buf
	}

	pub fn write_bytes(&mut self, data: &[u8]) {
		self.buf.extend_from_slice(data);
	}

	pub fn write_u8(&mut self, value: u8) {
		self.buf.push(value);
	}

	/// Append `n` copies of `byte`
	pub fn write_repeat(&mut self, byte: u8, n: usize) {
		self.buf.resize(self.buf.len() + n, byte);
	}

	/// Write `value` as an unsigned integer `n` bytes wide.
	/// Fails (and writes nothing) if `value` needs more than `n` bytes.
	pub fn write_uint(
		&mut self,
		value: u64,
		n: usize,
		endianness: Endianness,
	) -> Result<(), CursorError> {
		if n > 8 {
			return Err(CursorError::BadWidth(n));
		}

		if n < 8 && value >> (8 * n) != 0 {
			return Err(CursorError::ValueTooWide { value, width: n });
		}

		let be = value.to_be_bytes();
		let bytes = &be[8 - n..];
		match endianness {
			Endianness::Big => self.buf.extend_from_slice(bytes),
			Endianness::Little => self.buf.extend(bytes.iter().rev()),
		}

		return Ok(());
	}

	pub fn write_u16_be(&mut self, value: u16) {
		self.write_bytes(&value.to_be_bytes());
	}

	/// Write the low 24 bits of `value`
	pub fn write_u24_be(&mut self, value: u32) {
		self.write_bytes(&value.to_be_bytes()[1..]);
	}

	pub fn write_u32_be(&mut self, value: u32) {
		self.write_bytes(&value.to_be_bytes());
	}

	pub fn write_u32_le(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	pub fn write_u64_le(&mut self, value: u64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Overwrite already-written bytes at `offset`.
	pub fn patch(&mut self, offset: usize, data: &[u8]) -> Result<(), CursorError> {
		match offset.checked_add(data.len()) {
			Some(end) if end <= self.buf.len() => {
				self.buf[offset..end].copy_from_slice(data);
				Ok(())
			}
			_ => Err(CursorError::OutOfBounds {
				offset,
				wanted: data.len(),
				len: self.buf.len(),
			}),
		}
	}
}

impl Write for BinaryWriter {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.buf.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}
