use crate::{
    file::{ChannelEvent, MetaEvent, TrackEvent, TrackMessage, TrackSummary},
    message::{MetaKind, StatusType, TagKind, gm_program_name},
    reader::{FormatError, ReadResult, Reader},
};

/// The chunk tag of a track.
pub const TRACK_TAG: &[u8; 4] = b"MTrk";

#[doc = r#"
An ordered list of [`TrackEvent`]s that always ends with exactly one
end-of-track meta event.

Every event knows its cumulative tick. Edits keep the ticks consistent with
the deltas, so `tick` never decreases from one event to the next.

# Index stability
[`Track::delete_event`] and the tag/program edits insert or remove events,
which shifts the index of everything after them. Indices held elsewhere must
be looked up again after any edit.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// A track holding only its end-of-track marker.
    pub fn new() -> Self {
        Self {
            events: vec![TrackEvent::new(0, MetaEvent::end_of_track())],
        }
    }

    /// Parse the body of an `MTrk` chunk (without tag and length).
    ///
    /// The running status lives only for the duration of this call.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut running_status = None;
        let mut events = Vec::with_capacity(bytes.len() / 3);
        let mut tick = 0u64;

        while !reader.is_at_end() {
            let delta = reader.read_vlq()?;
            tick += delta as u64;

            let message = TrackMessage::read(&mut reader, &mut running_status)?;
            let mut event = TrackEvent::new(delta, message);
            event.set_tick(tick);

            let terminated = event.is_end_of_track();
            events.push(event);
            if terminated {
                if !reader.is_at_end() {
                    return Err(reader.error(FormatError::MissingEndOfTrack));
                }
                return Ok(Self { events });
            }
        }

        Err(reader.error(FormatError::MissingEndOfTrack))
    }

    /// All events, the end-of-track marker last.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Number of events, including the end-of-track marker.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds nothing but its end-of-track marker.
    pub fn is_empty(&self) -> bool {
        self.events.len() <= 1
    }

    /// The tick of the last event.
    pub fn tick_max(&self) -> u64 {
        self.events.last().map(TrackEvent::tick).unwrap_or(0)
    }

    /// Append an event just before the end-of-track marker.
    ///
    /// `delta` is measured from the event that used to precede the marker
    /// and saturates at [`vlq::MAX`](crate::vlq::MAX). The marker keeps its
    /// own delta.
    pub fn push(&mut self, delta: u32, message: impl Into<TrackMessage>) {
        let at = self.events.len().saturating_sub(1);
        self.events.insert(at, TrackEvent::new(delta, message));
        self.retick();
    }

    /// Remove the event at `index`.
    ///
    /// Neighbouring deltas are left as they are, so everything after the
    /// removed event moves earlier by its delta. Out of range indices and the
    /// end-of-track marker are left alone and yield `None`.
    pub fn delete_event(&mut self, index: usize) -> Option<TrackEvent> {
        if self.events.get(index)?.is_end_of_track() {
            return None;
        }
        let removed = self.events.remove(index);
        self.retick();
        Some(removed)
    }

    /// The text of the first `kind` meta event that carries any.
    ///
    /// UTF-8 is tried first, Latin-1 is the fallback.
    pub fn tag(&self, kind: TagKind) -> Option<String> {
        let kind = MetaKind::from(kind);
        self.events
            .iter()
            .filter_map(TrackEvent::meta)
            .find(|meta| {
                meta.kind() == kind && meta.payload().first().is_some_and(|&byte| byte != 0)
            })
            .map(MetaEvent::text)
    }

    /// Replace the text of the first `kind` meta event, or insert one at
    /// the start of the track.
    pub fn set_tag(&mut self, kind: TagKind, text: &str) {
        let index = self.tag_index(kind);
        let payload = text.as_bytes().to_vec();
        match index.and_then(|index| self.events[index].meta_mut()) {
            Some(meta) => meta.set_payload(payload),
            None => self
                .events
                .insert(0, TrackEvent::new(0, MetaEvent::new(kind.into(), payload))),
        }
    }

    /// Remove the first `kind` meta event if it has no delta.
    ///
    /// An event with a delta carries part of the track's timing and is kept.
    /// Returns whether an event was removed.
    pub fn delete_tag(&mut self, kind: TagKind) -> bool {
        self.delete_if_untimed(self.tag_index(kind))
    }

    /// The program number of the first program change.
    pub fn program(&self) -> Option<u8> {
        self.program_index()
            .and_then(|index| self.events[index].channel())
            .map(|channel| channel.data()[0])
    }

    /// The General MIDI instrument name of [`Track::program`].
    pub fn program_name(&self) -> Option<&'static str> {
        self.program().and_then(gm_program_name)
    }

    /// Change the first program change, or insert one at the start of the
    /// track.
    ///
    /// A new event uses the channel of the track's first channel event.
    /// `program` is masked to seven bits.
    pub fn set_program(&mut self, program: u8) {
        let program = program & 0x7F;
        let index = self.program_index();
        match index.and_then(|index| self.events[index].channel_mut()) {
            Some(channel) => channel.set_data(0, program),
            None => {
                let channel = self
                    .events
                    .iter()
                    .filter_map(TrackEvent::channel)
                    .find(|channel| channel.status().is_channel_message())
                    .map(ChannelEvent::channel)
                    .unwrap_or(0);
                self.events.insert(
                    0,
                    TrackEvent::new(0, ChannelEvent::program_change(channel, program)),
                );
            }
        }
    }

    /// Remove the first program change if it has no delta.
    ///
    /// Returns whether an event was removed.
    pub fn delete_program(&mut self) -> bool {
        self.delete_if_untimed(self.program_index())
    }

    /// True if the track carries any channel or system message.
    pub fn has_midi_messages(&self) -> bool {
        self.events.iter().any(|event| event.channel().is_some())
    }

    /// Count the track's events by category.
    pub fn summary(&self) -> TrackSummary {
        TrackSummary::from_events(&self.events)
    }

    /// Append the complete `MTrk` chunk to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(TRACK_TAG);
        let length_at = out.len();
        out.extend_from_slice(&[0; 4]);

        for event in &self.events {
            event.write(out);
        }

        let length = (out.len() - length_at - 4) as u32;
        out[length_at..length_at + 4].copy_from_slice(&length.to_be_bytes());
    }

    /// The complete `MTrk` chunk.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.events.len() * 4);
        self.write(&mut out);
        out
    }

    fn tag_index(&self, kind: TagKind) -> Option<usize> {
        let kind = MetaKind::from(kind);
        self.events
            .iter()
            .position(|event| event.meta().is_some_and(|meta| meta.kind() == kind))
    }

    fn program_index(&self) -> Option<usize> {
        self.events.iter().position(|event| {
            event
                .channel()
                .is_some_and(|channel| channel.status() == StatusType::ProgramChange)
        })
    }

    fn delete_if_untimed(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(index) if self.events[index].delta() == 0 => {
                self.delete_event(index).is_some()
            }
            _ => false,
        }
    }

    fn retick(&mut self) {
        let mut tick = 0u64;
        for event in &mut self.events {
            tick += event.delta() as u64;
            event.set_tick(tick);
        }
    }
}

#[cfg(test)]
fn titled_track(title_delta: u8) -> Track {
    Track::parse(&[
        title_delta, 0xFF, 0x03, 0x01, b'A', // title
        0x0A, 0x90, 0x3C, 0x64, // note on
        0x00, 0xFF, 0x2F, 0x00,
    ])
    .unwrap()
}

#[test]
fn parse_accumulates_ticks() {
    use pretty_assertions::assert_eq;
    let track = titled_track(5);
    let ticks: Vec<_> = track.events().iter().map(TrackEvent::tick).collect();
    assert_eq!(ticks, [5, 15, 15]);
    assert_eq!(track.tick_max(), 15);
}

#[test]
fn missing_end_of_track() {
    use pretty_assertions::assert_eq;
    let err = Track::parse(&[0x00, 0x90, 0x3C, 0x64]).unwrap_err();
    assert_eq!(err.kind(), &FormatError::MissingEndOfTrack);

    // trailing bytes after the marker
    let err = Track::parse(&[0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 0x3C, 0x64]).unwrap_err();
    assert_eq!(err.kind(), &FormatError::MissingEndOfTrack);
    assert_eq!(err.position(), 4);
}

#[test]
fn delete_tag_only_without_delta() {
    use pretty_assertions::assert_eq;
    let mut track = titled_track(0);
    assert!(track.delete_tag(TagKind::Title));
    assert_eq!(track.len(), 2);
    assert_eq!(track.tag(TagKind::Title), None);

    let mut track = titled_track(10);
    let before = track.clone();
    assert!(!track.delete_tag(TagKind::Title));
    assert_eq!(track, before);
}

#[test]
fn set_tag_replaces_or_inserts() {
    use pretty_assertions::assert_eq;
    let mut track = titled_track(0);
    track.set_tag(TagKind::Title, "Strings");
    assert_eq!(track.len(), 3);
    assert_eq!(track.tag(TagKind::Title).as_deref(), Some("Strings"));

    track.set_tag(TagKind::Copyright, "© 2019");
    assert_eq!(track.len(), 4);
    assert_eq!(track.events()[0].delta(), 0);
    assert_eq!(track.tag(TagKind::Copyright).as_deref(), Some("© 2019"));
}

#[test]
fn empty_or_nul_tags_are_skipped() {
    use pretty_assertions::assert_eq;
    let track = Track::parse(&[
        0x00, 0xFF, 0x03, 0x00, // empty title
        0x00, 0xFF, 0x03, 0x02, 0x00, 0x00, // NUL padded title
        0x00, 0xFF, 0x03, 0x02, b'O', b'k', // title
        0x00, 0xFF, 0x2F, 0x00,
    ])
    .unwrap();
    assert_eq!(track.tag(TagKind::Title).as_deref(), Some("Ok"));
}

#[test]
fn program_edits() {
    use pretty_assertions::assert_eq;
    let mut track = titled_track(0);
    assert_eq!(track.program(), None);

    track.set_program(19);
    assert_eq!(track.program(), Some(19));
    let inserted = track.events()[0].channel().unwrap();
    assert_eq!(inserted.status_byte(), 0xC0);

    track.set_program(200);
    assert_eq!(track.program(), Some(200 & 0x7F));

    assert!(track.delete_program());
    assert_eq!(track.program(), None);
    assert!(!track.delete_program());
}

#[test]
fn new_program_uses_track_channel() {
    use pretty_assertions::assert_eq;
    let mut track = Track::new();
    track.push(0, ChannelEvent::note_on(9, 36, 100));
    track.set_program(0);
    assert_eq!(track.events()[0].channel().unwrap().status_byte(), 0xC9);
}

#[test]
fn new_program_skips_system_messages() {
    use pretty_assertions::assert_eq;
    let mut track = Track::new();
    track.push(0, ChannelEvent::new(StatusType::SongSelect, 0, &[3]));
    track.push(0, ChannelEvent::note_on(4, 60, 100));
    track.set_program(7);
    assert_eq!(track.events()[0].channel().unwrap().status_byte(), 0xC4);
}

#[test]
fn delete_event_keeps_end_of_track() {
    use pretty_assertions::assert_eq;
    let mut track = titled_track(4);
    let end = track.len() - 1;
    assert_eq!(track.delete_event(end), None);
    assert_eq!(track.delete_event(99), None);

    let removed = track.delete_event(0).unwrap();
    assert_eq!(removed.delta(), 4);
    // the note now starts 4 ticks earlier
    assert_eq!(track.events()[0].tick(), 10);
    assert!(track.events().last().unwrap().is_end_of_track());
}

#[test]
fn has_midi_messages() {
    assert!(titled_track(0).has_midi_messages());
    assert!(!Track::new().has_midi_messages());
}

#[test]
fn encode_backfills_length() {
    use pretty_assertions::assert_eq;
    let track = titled_track(0);
    let bytes = track.encode();
    assert_eq!(&bytes[..4], TRACK_TAG);
    assert_eq!(u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 13);
    assert_eq!(Track::parse(&bytes[8..]).unwrap(), track);
}
