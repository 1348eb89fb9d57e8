use pretty_assertions::assert_eq;
use smfkit::prelude::*;

// One track: a title, a program change, a four note chord on three channels.
fn simple() -> MidiFile {
    let body: &[u8] = &[
        0x00, 0xFF, 0x03, 0x06, b'S', b'i', b'm', b'p', b'l', b'e',
        0x00, 0xC2, 0x05,
        0x00, 0x92, 0x30, 0x60,
        0x00, 0x3C, 0x60,
        0x60, 0x91, 0x43, 0x40,
        0x60, 0x90, 0x4C, 0x20,
        0x81, 0x40, 0x82, 0x30, 0x40,
        0x00, 0x3C, 0x40,
        0x00, 0x81, 0x43, 0x40,
        0x00, 0x80, 0x4C, 0x40,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = b"MThd\0\0\0\x06\0\0\0\x01\0\x60".to_vec();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    MidiFile::parse(&bytes).unwrap()
}

fn note(event: &TrackEvent, tick: u64, status: StatusType, channel: u8, key: u8) {
    assert_eq!(event.tick(), tick);
    let message = event.channel().unwrap();
    assert_eq!(message.status(), status);
    assert_eq!(message.channel(), channel);
    assert_eq!(message.data()[0], key);
}

#[test]
fn parses_the_chord() {
    let file = simple();
    assert_eq!(file.format(), Format::SingleMultiChannel);
    let track = file.track(0).unwrap();
    assert!(track.has_midi_messages());

    let mut events = track.events().iter().skip(2);
    use StatusType::*;
    note(events.next().unwrap(), 0, NoteOn, 2, 0x30);
    note(events.next().unwrap(), 0, NoteOn, 2, 0x3C);
    note(events.next().unwrap(), 96, NoteOn, 1, 0x43);
    note(events.next().unwrap(), 192, NoteOn, 0, 0x4C);
    note(events.next().unwrap(), 384, NoteOff, 2, 0x30);
    note(events.next().unwrap(), 384, NoteOff, 2, 0x3C);
    note(events.next().unwrap(), 384, NoteOff, 1, 0x43);
    note(events.next().unwrap(), 384, NoteOff, 0, 0x4C);
    assert!(events.next().unwrap().is_end_of_track());
}

#[test]
fn tags_are_replaced_inserted_and_deleted() {
    let mut file = simple();
    let track = file.track_mut(0).unwrap();
    assert_eq!(track.tag(TagKind::Title).as_deref(), Some("Simple"));
    assert_eq!(track.tag(TagKind::Instrument), None);

    track.set_tag(TagKind::Title, "Chord");
    track.set_tag(TagKind::Instrument, "Grand Piano");
    assert_eq!(track.events()[0].meta().unwrap().kind(), MetaKind::Instrument);

    file.refresh_timeline();
    let reparsed = MidiFile::parse(&file.encode()).unwrap();
    let track = reparsed.track(0).unwrap();
    assert_eq!(track.tag(TagKind::Title).as_deref(), Some("Chord"));
    assert_eq!(track.tag(TagKind::Instrument).as_deref(), Some("Grand Piano"));

    let mut reparsed = reparsed;
    let track = reparsed.track_mut(0).unwrap();
    assert!(track.delete_tag(TagKind::Instrument));
    assert!(!track.delete_tag(TagKind::Instrument));
    assert_eq!(track.tag(TagKind::Instrument), None);
}

#[test]
fn timed_tags_are_not_deleted() {
    let mut track = Track::new();
    track.push(10, MetaEvent::new(MetaKind::Title, *b"A"));
    track.push(10, ChannelEvent::note_on(0, 60, 100));
    let before = track.clone();

    assert!(!track.delete_tag(TagKind::Title));
    assert_eq!(track, before);

    let mut track = Track::new();
    track.push(0, MetaEvent::new(MetaKind::Title, *b"A"));
    track.push(10, ChannelEvent::note_on(0, 60, 100));
    assert!(track.delete_tag(TagKind::Title));
    assert_eq!(track.len(), 2);
    assert_eq!(track.events()[0].tick(), 10);
}

#[test]
fn latin1_tags() {
    let mut track = Track::new();
    track.push(0, MetaEvent::new(MetaKind::Copyright, [0xA9, b' ', b'1', b'9']));
    assert_eq!(track.tag(TagKind::Copyright).as_deref(), Some("© 19"));
}

#[test]
fn program_edits() {
    let mut file = simple();
    let track = file.track_mut(0).unwrap();
    assert_eq!(track.program(), Some(5));
    assert_eq!(track.program_name(), Some("Electric Piano 2"));

    track.set_program(0x80 | 33);
    assert_eq!(track.program(), Some(33));

    assert!(track.delete_program());
    assert_eq!(track.program(), None);

    // a new program change follows the first channel event
    track.set_program(12);
    let first = track.events()[0].channel().unwrap();
    assert_eq!(first.status(), StatusType::ProgramChange);
    assert_eq!(first.channel(), 2);
    assert_eq!(first.data(), &[12]);
}

#[test]
fn delete_event_shifts_later_events() {
    let mut file = simple();
    let track = file.track_mut(0).unwrap();
    let len = track.len();

    // the G4 at 96
    let removed = track.delete_event(4).unwrap();
    assert_eq!(removed.delta(), 96);
    assert_eq!(track.len(), len - 1);
    assert_eq!(track.events()[4].tick(), 96);
    assert_eq!(track.tick_max(), 288);

    // the end of track marker stays
    assert_eq!(track.delete_event(track.len() - 1), None);
    assert_eq!(track.delete_event(100), None);

    let timeline = file.refresh_timeline();
    assert_eq!(timeline.tick_max(), 288);
}

#[test]
fn removable_events() {
    let file = simple();
    let removable: Vec<_> = file.tracks()[0]
        .events()
        .iter()
        .map(TrackEvent::is_removable)
        .collect();
    // title and program change at delta zero; notes and end of track never
    assert_eq!(&removable[..3], &[true, true, false]);
    assert!(!removable.last().unwrap());
}
