#![doc = r#"
A byte cursor over an in-memory MIDI buffer.

All multi-byte integers in a Standard MIDI File are big-endian. Every read
either succeeds completely or returns a [`ReaderError`] that records where in
the buffer it failed; the cursor is never advanced by a failed read.
"#]

mod error;
pub use error::*;

use crate::vlq;

/// Reads big-endian integers, variable-length quantities and raw slices from
/// a borrowed buffer.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of `data`.
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The offset of the next unread byte.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// How many bytes are left.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True once every byte has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// True if the unread bytes begin with `tag`.
    pub fn starts_with(&self, tag: &[u8]) -> bool {
        self.data[self.position..].starts_with(tag)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(ReaderError::truncated(self.position))
    }

    /// Consume one byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Consume `len` bytes, borrowed from the underlying buffer.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ReaderError::truncated(self.position))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Big-endian `u16`.
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Big-endian `i16`.
    pub fn read_i16(&mut self) -> ReadResult<i16> {
        self.read_exact_size().map(i16::from_be_bytes)
    }

    /// Big-endian `u32`.
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// A MIDI variable-length quantity.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let (value, len) = vlq::decode(self.data, self.position)
            .map_err(|kind| ReaderError::new(self.position, kind))?;
        self.position += len;
        Ok(value)
    }

    /// Build an error of `kind` at the current position.
    pub const fn error(&self, kind: FormatError) -> ReaderError {
        ReaderError::new(self.position, kind)
    }
}

#[test]
fn reads_big_endian_fields() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x06, 0xFF, 0xE0, 0x00, 0x00, 0x01, 0x00, 0x81, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_u16().unwrap(), 6);
    assert_eq!(reader.read_i16().unwrap(), -32);
    assert_eq!(reader.read_u32().unwrap(), 256);
    assert_eq!(reader.read_vlq().unwrap(), 128);
    assert!(reader.is_at_end());
}

#[test]
fn failed_read_does_not_advance() {
    use pretty_assertions::assert_eq;
    let bytes = [0x4D, 0x54];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = reader.read_u32().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(reader.buffer_position(), 0);
    assert_eq!(reader.remaining(), 2);
}
