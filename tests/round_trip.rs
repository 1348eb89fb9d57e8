use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// Wrap track bodies into a complete file.
fn smf(format: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for body in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
    }
    bytes
}

const CONDUCTOR: &[u8] = &[
    0x00, 0xFF, 0x03, 0x04, b'S', b'o', b'n', b'g', // title
    0x00, 0xFF, 0x58, 0x04, 0x06, 0x03, 0x18, 0x08, // 6/8
    0x00, 0xFF, 0x59, 0x02, 0xFD, 0x00, // E flat major
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 BPM
    0x83, 0x60, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, // 60 BPM at 480
    0x83, 0x60, 0xFF, 0x2F, 0x00,
];

// A chord written with running status, then released with zero velocities.
const CHORD: &[u8] = &[
    0x00, 0xC2, 0x00, // piano
    0x00, 0x92, 0x30, 0x7F, // C3
    0x00, 0x3C, 0x7F, // C4, running status
    0x60, 0x43, 0x50, // G4
    0x60, 0x4C, 0x28, // E5
    0x81, 0x40, 0x30, 0x00, // releases at 384
    0x00, 0x3C, 0x00,
    0x00, 0x43, 0x00,
    0x00, 0x4C, 0x00,
    0x00, 0xF0, 0x03, 0x7E, 0x09, 0xF7, // general midi on
    0x00, 0xF7, 0x01, 0xF8, // escaped clock
    0x00, 0xFF, 0x60, 0x02, 0xAB, 0xCD, // undefined meta kind
    0x00, 0xFF, 0x2F, 0x00,
];

#[test]
fn parse_encode_parse_is_stable() {
    let bytes = smf(1, 96, &[CONDUCTOR, CHORD]);
    let file = MidiFile::parse(&bytes).unwrap();

    let encoded = file.encode();
    // seven running status events gain their status byte back
    assert_eq!(encoded.len(), bytes.len() + 7);

    let reparsed = MidiFile::parse(&encoded).unwrap();
    assert_eq!(reparsed.tracks(), file.tracks());
    assert_eq!(reparsed.header(), file.header());
    assert_eq!(reparsed.timeline(), file.timeline());
    assert_eq!(reparsed.encode(), encoded);
}

#[test]
fn explicit_status_bytes_are_kept_byte_for_byte() {
    let body: &[u8] = &[
        0x00, 0x90, 0x3C, 0x64,
        0x60, 0x80, 0x3C, 0x40,
        0x00, 0xB0, 0x07, 0x64,
        0x00, 0xE0, 0x00, 0x40,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 96, &[body]);
    assert_eq!(MidiFile::parse(&bytes).unwrap().encode(), bytes);
}

#[test]
fn running_status_is_resolved() {
    let file = MidiFile::parse(&smf(1, 96, &[CONDUCTOR, CHORD])).unwrap();
    let notes: Vec<_> = file.tracks()[1]
        .events()
        .iter()
        .filter_map(TrackEvent::channel)
        .filter(|channel| channel.status() == StatusType::NoteOn)
        .map(|channel| (channel.channel(), channel.data()[0], channel.data()[1]))
        .collect();
    assert_eq!(
        notes,
        vec![(2, 0x30, 0x7F), (2, 0x3C, 0x7F), (2, 0x43, 0x50), (2, 0x4C, 0x28)]
    );
}

#[test]
fn zero_velocity_note_on_becomes_note_off() {
    let file = MidiFile::parse(&smf(1, 96, &[CONDUCTOR, CHORD])).unwrap();
    let releases: Vec<_> = file.tracks()[1]
        .events()
        .iter()
        .filter(|event| event.tick() == 384)
        .filter_map(TrackEvent::channel)
        .collect();
    assert_eq!(releases.len(), 4);
    for release in releases {
        assert_eq!(release.status(), StatusType::NoteOff);
        assert_eq!(release.data()[1], 64);
    }

    let single = smf(0, 96, &[&[0x00, 0x90, 60, 0, 0x00, 0xFF, 0x2F, 0x00]]);
    let file = MidiFile::parse(&single).unwrap();
    assert_eq!(
        file.tracks()[0].events()[0].channel(),
        Some(&ChannelEvent::note_off(0, 60, 64))
    );
}

#[test]
fn ticks_never_decrease() {
    let file = MidiFile::parse(&smf(1, 96, &[CONDUCTOR, CHORD])).unwrap();
    for track in file.tracks() {
        let mut tick = 0;
        for event in track.events() {
            assert!(event.tick() >= tick, "{} went back to {}", tick, event.tick());
            tick = event.tick();
        }
        assert!(track.events().last().unwrap().is_end_of_track());
    }
    assert_eq!(file.tracks()[0].tick_max(), 960);
    assert_eq!(file.tracks()[1].tick_max(), 384);
}

#[test]
fn meta_payloads_decode() {
    let file = MidiFile::parse(&smf(1, 96, &[CONDUCTOR, CHORD])).unwrap();
    let conductor = &file.tracks()[0];
    assert_eq!(conductor.tag(TagKind::Title).as_deref(), Some("Song"));

    let metas: Vec<_> = conductor.events().iter().filter_map(TrackEvent::meta).collect();
    assert_eq!(metas[1].as_time_signature().unwrap().to_string(), "6 / 8");
    assert_eq!(metas[2].as_key_signature().unwrap().to_string(), "E♭ Major");
    assert_eq!(metas[3].as_tempo(), Some(Tempo::new(500_000)));
    assert_eq!(metas[4].as_tempo().unwrap().bpm(), 60.);

    let chord = &file.tracks()[1];
    let summary = chord.summary();
    assert_eq!(summary.system_exclusive, 1);
    assert_eq!(summary.escaped, 1);
    assert_eq!(summary.meta_count(MetaKind::Other(0x60)), 1);
    assert_eq!(chord.program(), Some(0));
}

#[test]
fn tempo_map_follows_the_first_track() {
    let file = MidiFile::parse(&smf(1, 96, &[CONDUCTOR, CHORD])).unwrap();
    let timeline = file.timeline().unwrap();
    assert_eq!(timeline.tick_max(), 960);

    let changes = timeline.tempo_map().changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].tick, 480);

    // five beats at 120 BPM, then five at 60 BPM
    assert!((timeline.tick_to_seconds(480) - 2.5).abs() < 1e-6);
    assert!((timeline.runtime_seconds() - 7.5).abs() < 1e-6);
}

#[test]
fn long_deltas_use_multi_byte_quantities() {
    let mut track = Track::new();
    track.push(0x0FFF_FFFF, MetaEvent::new(MetaKind::Marker, *b"far"));
    let file = MidiFile::new(Format::SingleMultiChannel, 96, vec![track]).unwrap();

    let encoded = file.encode();
    let reparsed = MidiFile::parse(&encoded).unwrap();
    assert_eq!(reparsed.tracks()[0].tick_max(), 0x0FFF_FFFF);
    assert_eq!(reparsed.tracks()[0].events()[0].delta(), 0x0FFF_FFFF);
}

#[test]
fn deltas_past_four_bytes_still_encode_a_valid_file() {
    let mut track = Track::new();
    track.push(0x1000_0000, MetaEvent::new(MetaKind::Marker, *b"beyond"));
    let file = MidiFile::new(Format::SingleMultiChannel, 96, vec![track]).unwrap();

    let reparsed = MidiFile::parse(&file.encode()).unwrap();
    assert_eq!(reparsed.tracks()[0].events()[0].delta(), 0x0FFF_FFFF);
    assert_eq!(reparsed.tracks()[0].tick_max(), 0x0FFF_FFFF);
}
