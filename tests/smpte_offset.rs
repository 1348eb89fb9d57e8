use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// The five payload bytes of an `FF 54` event.
fn smpte_bytes(fps_bits: u8, hour: u8, minute: u8, second: u8, frame: u8, subframe: u8) -> Vec<u8> {
    vec![(fps_bits << 5) | (hour & 0x1F), minute, second, frame, subframe]
}

/// A one-track file whose first event is a SMPTE offset.
fn file_with_offset(payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0x00, 0xFF, 0x54, payload.len() as u8];
    body.extend_from_slice(payload);
    body.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x40]);
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut bytes = b"MThd\0\0\0\x06\0\0\0\x01\0\x60".to_vec();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

fn first_offset(bytes: &[u8]) -> Option<SmpteOffset> {
    let file = MidiFile::parse(bytes).unwrap();
    file.tracks()[0].events()[0].meta()?.as_smpte_offset()
}

#[test]
fn offset_from_a_parsed_file() {
    let offset = first_offset(&file_with_offset(&smpte_bytes(0, 12, 30, 15, 18, 50))).unwrap();
    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 12);
    assert_eq!(offset.minute, 30);
    assert_eq!(offset.second, 15);
    assert_eq!(offset.frame, 18);
    assert_eq!(offset.subframe, 50);
    assert_eq!(offset.to_string(), "12:30:15 18.50");

    let expected = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.
        + (18. / 24.) * 1_000_000.
        + (50. / 100. / 24.) * 1_000_000.;
    assert!((offset.as_micros() - expected).abs() < 0.01);
}

#[test]
fn every_frame_rate() {
    let rates = [
        (0, SmpteFps::TwentyFour),
        (1, SmpteFps::TwentyFive),
        (2, SmpteFps::TwentyNine),
        (3, SmpteFps::Thirty),
    ];
    for (bits, fps) in rates {
        let offset = first_offset(&file_with_offset(&smpte_bytes(bits, 1, 23, 45, 15, 0))).unwrap();
        assert_eq!(offset.fps, fps);
        assert_eq!(offset.hour, 1);
    }
}

#[test]
fn drop_frame_precision() {
    let offset = SmpteOffset::parse(&smpte_bytes(2, 0, 0, 0, 1, 0)).unwrap();
    // one frame lasts 1001/30000 s
    assert!((offset.as_micros() - 1_001_000. / 30.).abs() < 0.001);
}

#[test]
fn malformed_offsets_stay_raw() {
    // the file still parses, the payload just has no typed view
    let bytes = file_with_offset(&smpte_bytes(0, 24, 0, 0, 0, 0));
    assert_eq!(first_offset(&bytes), None);

    let file = MidiFile::parse(&bytes).unwrap();
    let meta = file.tracks()[0].events()[0].meta().unwrap();
    assert_eq!(meta.kind(), MetaKind::SmpteOffset);
    assert_eq!(meta.payload(), &[24, 0, 0, 0, 0]);
}

#[test]
fn validation_errors() {
    assert_eq!(SmpteOffset::parse(&[0, 0, 0]), Err(SmpteError::Length(3)));
    assert_eq!(SmpteOffset::parse(&[]), Err(SmpteError::Length(0)));
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(0b100, 12, 30, 15, 10, 50)),
        Err(SmpteError::TrackFrame(4))
    );
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(0, 31, 0, 0, 0, 0)),
        Err(SmpteError::HourOffset(31))
    );
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(0, 12, 60, 30, 15, 50)),
        Err(SmpteError::MinuteOffset(60))
    );
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(1, 12, 30, 255, 15, 50)),
        Err(SmpteError::SecondOffset(255))
    );
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(2, 12, 30, 45, 15, 100)),
        Err(SmpteError::Subframe(100))
    );
    // the first problem wins
    assert_eq!(
        SmpteOffset::parse(&smpte_bytes(0, 25, 61, 30, 15, 50)),
        Err(SmpteError::HourOffset(25))
    );
}
