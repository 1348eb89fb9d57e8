use std::collections::HashMap;

use crate::{
    file::{SysExTag, TrackEvent, TrackMessage},
    message::{MetaKind, StatusType},
};

/// Event counts for one track, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSummary {
    /// Every event, end-of-track included
    pub events: usize,
    /// Meta events of any kind
    pub meta_events: usize,
    /// Channel and system messages
    pub midi_events: usize,
    /// `F0` system exclusive events
    pub system_exclusive: usize,
    /// `F7` escaped data events
    pub escaped: usize,
    meta: HashMap<MetaKind, usize>,
    midi: HashMap<StatusType, usize>,
}

impl TrackSummary {
    pub(crate) fn from_events(events: &[TrackEvent]) -> Self {
        let mut summary = Self {
            events: events.len(),
            ..Default::default()
        };
        for event in events {
            match event.message() {
                TrackMessage::Meta(meta) => {
                    summary.meta_events += 1;
                    *summary.meta.entry(meta.kind()).or_default() += 1;
                }
                TrackMessage::Channel(channel) => {
                    summary.midi_events += 1;
                    *summary.midi.entry(channel.status()).or_default() += 1;
                }
                TrackMessage::SystemExclusive(sysex) => match sysex.tag() {
                    SysExTag::Exclusive => summary.system_exclusive += 1,
                    SysExTag::Escape => summary.escaped += 1,
                },
            }
        }
        summary
    }

    /// How many meta events of `kind` the track holds.
    pub fn meta_count(&self, kind: MetaKind) -> usize {
        self.meta.get(&kind).copied().unwrap_or(0)
    }

    /// How many messages of `status` the track holds.
    pub fn midi_count(&self, status: StatusType) -> usize {
        self.midi.get(&status).copied().unwrap_or(0)
    }
}

#[test]
fn counts_by_category() {
    use crate::file::{ChannelEvent, MetaEvent, SysExEvent, Track};
    use pretty_assertions::assert_eq;

    let mut track = Track::new();
    track.push(0, MetaEvent::new(MetaKind::Title, *b"Bass"));
    track.push(0, ChannelEvent::program_change(1, 33));
    track.push(0, ChannelEvent::note_on(1, 40, 90));
    track.push(96, ChannelEvent::note_on(1, 40, 0));
    track.push(0, SysExEvent::new(SysExTag::Escape, [0xF8]));

    let summary = track.summary();
    assert_eq!(summary.events, 6);
    assert_eq!(summary.meta_events, 2);
    assert_eq!(summary.midi_events, 3);
    assert_eq!(summary.escaped, 1);
    assert_eq!(summary.system_exclusive, 0);
    assert_eq!(summary.meta_count(MetaKind::EndOfTrack), 1);
    assert_eq!(summary.midi_count(StatusType::NoteOn), 1);
    assert_eq!(summary.midi_count(StatusType::NoteOff), 1);
    assert_eq!(summary.midi_count(StatusType::PitchBend), 0);
}
