#![doc = r#"
MIDI variable-length quantities.

A VLQ stores an unsigned integer as big-endian groups of seven bits. Every
byte except the last has its high bit set:

```text
0x00000000 -> 00
0x00000040 -> 40
0x00000080 -> 81 00
0x00003FFF -> FF 7F
0x0FFFFFFF -> FF FF FF 7F
```

Standard MIDI Files never use more than four bytes, so the largest value is
`0x0FFF_FFFF`.
"#]

use crate::reader::FormatError;

/// The largest value a four-byte quantity can hold.
pub const MAX: u32 = 0x0FFF_FFFF;

const MAX_LEN: usize = 4;

/// Decode the quantity starting at `offset`.
///
/// Returns the value and the number of bytes it occupied, terminator
/// included.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u32, usize), FormatError> {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().skip(offset).enumerate() {
        if i == MAX_LEN {
            return Err(FormatError::VlqOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(FormatError::Truncated)
}

/// Append the minimal encoding of `value` to `out`.
///
/// Values above [`MAX`] do not fit in four bytes and are written as `MAX`.
pub fn write(value: u32, out: &mut Vec<u8>) {
    let mut groups = [0u8; MAX_LEN];
    let mut len = 0;
    let mut rest = value.min(MAX);
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..len).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(groups[i] | continuation);
    }
}

/// The minimal encoding of `value`.
pub fn encode(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_LEN);
    write(value, &mut out);
    out
}

/// Number of bytes [`encode`] would produce.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

#[test]
fn encodes_reference_values() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode(0x00), [0x00]);
    assert_eq!(encode(0x40), [0x40]);
    assert_eq!(encode(0x7F), [0x7F]);
    assert_eq!(encode(0x80), [0x81, 0x00]);
    assert_eq!(encode(0x2000), [0xC0, 0x00]);
    assert_eq!(encode(0x3FFF), [0xFF, 0x7F]);
    assert_eq!(encode(0x4000), [0x81, 0x80, 0x00]);
    assert_eq!(encode(0x10_0000), [0xC0, 0x80, 0x00]);
    assert_eq!(encode(0x08_000_000), [0xC0, 0x80, 0x80, 0x00]);
    assert_eq!(encode(MAX), [0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn decodes_at_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x90, 0x3C, 0x83, 0x60, 0x00];
    assert_eq!(decode(&bytes, 2), Ok((480, 2)));
    assert_eq!(decode(&bytes, 4), Ok((0, 1)));
}

#[test]
fn round_trips_across_every_length() {
    use pretty_assertions::assert_eq;
    let samples = [
        0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0ABC_DEF0, MAX,
    ];
    for value in samples {
        let bytes = encode(value);
        assert_eq!(bytes.len(), encoded_len(value));
        assert_eq!(decode(&bytes, 0), Ok((value, bytes.len())));
    }
}

#[test]
fn oversized_values_saturate() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode(MAX + 1), encode(MAX));
    assert_eq!(encode(u32::MAX), [0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(encoded_len(u32::MAX), 4);
    assert_eq!(decode(&encode(u32::MAX), 0), Ok((MAX, 4)));
}

#[test]
fn missing_terminator_is_truncated() {
    assert_eq!(decode(&[0x81, 0x80], 0), Err(FormatError::Truncated));
    assert_eq!(decode(&[0x00], 1), Err(FormatError::Truncated));
}

#[test]
fn five_byte_quantity_overflows() {
    assert_eq!(
        decode(&[0x81, 0x80, 0x80, 0x80, 0x00], 0),
        Err(FormatError::VlqOverflow)
    );
}
