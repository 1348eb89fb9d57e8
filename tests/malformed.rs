use pretty_assertions::assert_eq;
use smfkit::prelude::*;

const HEADER: &[u8] = b"MThd\0\0\0\x06\0\x01\0\x01\0\x60";

fn with_track(header: &[u8], body: &[u8]) -> Vec<u8> {
    let mut bytes = header.to_vec();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn kind(bytes: &[u8]) -> FormatError {
    *MidiFile::parse(bytes).unwrap_err().kind()
}

const END: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];

#[test]
fn missing_header() {
    let mut bytes = with_track(HEADER, END);
    bytes[..4].copy_from_slice(b"RIFF");

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), FormatError::MissingHeader);
    assert_eq!(err.position(), 0);
    assert_eq!(err.to_string(), "Reading at Position 0, Missing file header");

    assert_eq!(kind(&[]), FormatError::MissingHeader);
}

#[test]
fn smpte_division_is_unsupported() {
    // 25 fps, 40 ticks per frame
    let header = b"MThd\0\0\0\x06\0\0\0\x01\xE7\x28";
    assert_eq!(
        kind(&with_track(header, END)),
        FormatError::UnsupportedTimeFormat(-6360)
    );

    let zero = b"MThd\0\0\0\x06\0\0\0\x01\0\0";
    assert_eq!(kind(&with_track(zero, END)), FormatError::UnsupportedTimeFormat(0));
}

#[test]
fn track_count_must_match() {
    let header = b"MThd\0\0\0\x06\0\x01\0\x02\0\x60";
    let err = MidiFile::parse(&with_track(header, END)).unwrap_err();
    assert_eq!(
        *err.kind(),
        FormatError::InconsistentTrackCount {
            declared: 2,
            found: 1
        }
    );

    let twice = with_track(&with_track(HEADER, END), END);
    assert_eq!(
        kind(&twice),
        FormatError::InconsistentTrackCount {
            declared: 1,
            found: 2
        }
    );
}

#[test]
fn chunks_after_the_header_must_be_tracks() {
    let mut bytes = HEADER.to_vec();
    bytes.extend_from_slice(b"MTrx\0\0\0\x04");
    bytes.extend_from_slice(END);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), FormatError::MissingTrackHeaderMarker);
    assert_eq!(err.position(), HEADER.len());
}

#[test]
fn track_length_past_the_end() {
    let mut bytes = with_track(HEADER, END);
    bytes.truncate(bytes.len() - 1);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn payload_past_the_track() {
    // the title claims 9 bytes, the track holds 2
    let body = [0x00, 0xFF, 0x03, 0x09, b'h', b'i'];
    assert_eq!(kind(&with_track(HEADER, &body)), FormatError::Truncated);
}

#[test]
fn end_of_track_must_be_last() {
    let missing = [0x00, 0x90, 0x3C, 0x64];
    assert_eq!(kind(&with_track(HEADER, &missing)), FormatError::MissingEndOfTrack);

    let trailing = [0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 0x3C, 0x64];
    let err = MidiFile::parse(&with_track(HEADER, &trailing)).unwrap_err();
    assert_eq!(*err.kind(), FormatError::MissingEndOfTrack);
    // right after the end of track event
    assert_eq!(err.position(), HEADER.len() + 8 + 4);
}

#[test]
fn data_byte_without_status() {
    let body = [0x00, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00];
    assert_eq!(
        kind(&with_track(HEADER, &body)),
        FormatError::MissingRunningStatus(0x3C)
    );
}

#[test]
fn oversized_delta() {
    let body = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0xFF, 0x2F, 0x00];
    let err = MidiFile::parse(&with_track(HEADER, &body)).unwrap_err();
    assert_eq!(*err.kind(), FormatError::VlqOverflow);
    assert_eq!(err.position(), HEADER.len() + 8);
}
