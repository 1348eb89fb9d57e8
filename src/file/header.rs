use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::reader::{FormatError, ReadResult, Reader, ReaderError};

/// The chunk tag of the header.
pub const HEADER_TAG: &[u8; 4] = b"MThd";

/// The only header length the format defines.
pub const HEADER_LENGTH: u32 = 6;

/// The largest ticks-per-quarter-note division. Larger values set the sign
/// bit, which marks a SMPTE division.
pub const MAX_DIVISION: u16 = 0x7FFF;

#[doc = r#"
How the tracks of a file relate to each other.

Format 2 (sequentially independent patterns) is not supported.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0: one track carrying every channel
    SingleMultiChannel = 0,
    /// Format 1: simultaneous tracks, tempo in the first
    Simultaneous = 1,
}

#[doc = r#"
Information about the file from its `MThd` chunk.

```text
|------|--------|--------|-------------|----------|
| MThd | 0x0006 | format | track count | division |
| 4    | 4      | 2      | 2           | 2        |
|------|--------|--------|-------------|----------|
```
The track count is not kept: it always equals the number of tracks the
file holds.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: Format,
    division: u16,
}

impl Header {
    /// Create a header. `division` is ticks per quarter note.
    ///
    /// Fails with [`FormatError::UnsupportedTimeFormat`] unless `division`
    /// is in `1..=MAX_DIVISION`.
    pub const fn new(format: Format, division: u16) -> Result<Self, FormatError> {
        if division == 0 || division > MAX_DIVISION {
            return Err(FormatError::UnsupportedTimeFormat(division as i16));
        }
        Ok(Self { format, division })
    }

    /// Read the header chunk, returning it with the declared track count.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<(Self, u16)> {
        if !reader.starts_with(HEADER_TAG) {
            return Err(reader.error(FormatError::MissingHeader));
        }
        reader.read_slice(HEADER_TAG.len())?;

        let at = reader.buffer_position();
        let length = reader.read_u32()?;
        if length != HEADER_LENGTH {
            return Err(ReaderError::new(at, FormatError::WrongHeaderLength(length)));
        }

        // 0: single multi-channel track
        // 1: one or more simultaneous tracks
        // 2: one or more sequentially independent single-track patterns
        let at = reader.buffer_position();
        let format = reader.read_u16()?;
        let format =
            Format::try_from(format).map_err(|_| ReaderError::new(at, FormatError::UnsupportedFormat(format)))?;

        let at = reader.buffer_position();
        let track_count = reader.read_u16()?;
        if track_count < 1 {
            return Err(ReaderError::new(at, FormatError::MissingTrackInfo));
        }

        // > 0: ticks per quarter note
        // < 0: SMPTE frames per second and ticks per frame
        let at = reader.buffer_position();
        let division = reader.read_i16()?;
        if division <= 0 {
            return Err(ReaderError::new(at, FormatError::UnsupportedTimeFormat(division)));
        }

        Ok((
            Self {
                format,
                division: division as u16,
            },
            track_count,
        ))
    }

    /// Append the header chunk to `out`.
    pub fn write(&self, track_count: u16, out: &mut Vec<u8>) {
        out.extend_from_slice(HEADER_TAG);
        out.extend_from_slice(&HEADER_LENGTH.to_be_bytes());
        out.extend_from_slice(&u16::from(self.format).to_be_bytes());
        out.extend_from_slice(&track_count.to_be_bytes());
        out.extend_from_slice(&self.division.to_be_bytes());
    }

    /// Format 0 or 1
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Ticks per quarter note
    pub const fn division(&self) -> u16 {
        self.division
    }
}

#[cfg(test)]
fn read_header(bytes: &[u8]) -> ReadResult<(Header, u16)> {
    Header::read(&mut Reader::from_byte_slice(bytes))
}

#[test]
fn reads_valid_header() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 3, 0x01, 0xE0];
    let (header, count) = read_header(&bytes).unwrap();
    assert_eq!(header, Header::new(Format::Simultaneous, 480).unwrap());
    assert_eq!(count, 3);

    let mut out = Vec::new();
    header.write(count, &mut out);
    assert_eq!(out, bytes);
}

#[test]
fn rejects_bad_headers() {
    use pretty_assertions::assert_eq;
    let kind = |bytes: &[u8]| *read_header(bytes).unwrap_err().kind();

    assert_eq!(kind(b"RIFF\0\0\0\x06"), FormatError::MissingHeader);
    assert_eq!(kind(b"MT"), FormatError::MissingHeader);
    assert_eq!(
        kind(b"MThd\0\0\0\x08\0\0\0\x01\x01\xE0"),
        FormatError::WrongHeaderLength(8)
    );
    assert_eq!(
        kind(b"MThd\0\0\0\x06\0\x02\0\x01\x01\xE0"),
        FormatError::UnsupportedFormat(2)
    );
    assert_eq!(
        kind(b"MThd\0\0\0\x06\0\x01\0\0\x01\xE0"),
        FormatError::MissingTrackInfo
    );
    assert_eq!(
        kind(b"MThd\0\0\0\x06\0\x01\0\x01\xE7\x28"),
        FormatError::UnsupportedTimeFormat(-6360)
    );
    assert_eq!(kind(b"MThd\0\0\0\x06\0\x01"), FormatError::Truncated);
}

#[test]
fn built_headers_need_a_metrical_division() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        Header::new(Format::SingleMultiChannel, 0),
        Err(FormatError::UnsupportedTimeFormat(0))
    );
    assert_eq!(
        Header::new(Format::SingleMultiChannel, 0x8000),
        Err(FormatError::UnsupportedTimeFormat(-32768))
    );

    let header = Header::new(Format::SingleMultiChannel, MAX_DIVISION).unwrap();
    let mut out = Vec::new();
    header.write(1, &mut out);
    let (read, _) = read_header(&out).unwrap();
    assert_eq!(read.division(), MAX_DIVISION);
}
