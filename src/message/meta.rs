use num_enum::FromPrimitive;

#[doc = r#"
The kind byte that follows `0xFF` in a meta event.

Kinds this crate does not know about are kept as [`MetaKind::Other`] so that
they survive a parse and encode cycle unchanged.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// `FF 00 02` sequence number
    Sequence = 0x00,
    /// `FF 01` any text
    Text = 0x01,
    /// `FF 02` copyright notice
    Copyright = 0x02,
    /// `FF 03` sequence or track name
    Title = 0x03,
    /// `FF 04` instrument name
    Instrument = 0x04,
    /// `FF 05` lyric
    Lyric = 0x05,
    /// `FF 06` marker
    Marker = 0x06,
    /// `FF 07` cue point
    CuePoint = 0x07,
    /// `FF 08` program name
    ProgramName = 0x08,
    /// `FF 09` device name
    DeviceName = 0x09,
    /// `FF 20 01` channel prefix
    ChannelPrefix = 0x20,
    /// `FF 21 01` port
    Port = 0x21,
    /// `FF 2F 00` end of track
    EndOfTrack = 0x2F,
    /// `FF 51 03` microseconds per quarter note
    Tempo = 0x51,
    /// `FF 54 05` SMPTE offset
    SmpteOffset = 0x54,
    /// `FF 58 04` time signature
    TimeSignature = 0x58,
    /// `FF 59 02` key signature
    KeySignature = 0x59,
    /// `FF 7F` sequencer specific data
    SequencerSpecific = 0x7F,
    /// Any other kind
    #[num_enum(catch_all)]
    Other(u8),
}

impl MetaKind {
    /// The kind byte.
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Sequence => 0x00,
            Self::Text => 0x01,
            Self::Copyright => 0x02,
            Self::Title => 0x03,
            Self::Instrument => 0x04,
            Self::Lyric => 0x05,
            Self::Marker => 0x06,
            Self::CuePoint => 0x07,
            Self::ProgramName => 0x08,
            Self::DeviceName => 0x09,
            Self::ChannelPrefix => 0x20,
            Self::Port => 0x21,
            Self::EndOfTrack => 0x2F,
            Self::Tempo => 0x51,
            Self::SmpteOffset => 0x54,
            Self::TimeSignature => 0x58,
            Self::KeySignature => 0x59,
            Self::SequencerSpecific => 0x7F,
            Self::Other(byte) => *byte,
        }
    }

    /// A human readable label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sequence => "Sequence",
            Self::Text => "Text",
            Self::Copyright => "Copyright",
            Self::Title => "Title",
            Self::Instrument => "Instrument",
            Self::Lyric => "Lyric",
            Self::Marker => "Marker",
            Self::CuePoint => "Cue Point",
            Self::ProgramName => "Program Name",
            Self::DeviceName => "Device Name",
            Self::ChannelPrefix => "MIDI Channel",
            Self::Port => "MIDI Port",
            Self::EndOfTrack => "End Of Track",
            Self::Tempo => "Tempo",
            Self::SmpteOffset => "SMPTE Offset",
            Self::TimeSignature => "Time Signature",
            Self::KeySignature => "Key Signature",
            Self::SequencerSpecific => "Sequencer",
            Self::Other(_) => "Unknown",
        }
    }

    /// The text kind this meta kind corresponds to, if any.
    pub const fn tag_kind(&self) -> Option<TagKind> {
        Some(match self {
            Self::Text => TagKind::Text,
            Self::Copyright => TagKind::Copyright,
            Self::Title => TagKind::Title,
            Self::Instrument => TagKind::Instrument,
            Self::Lyric => TagKind::Lyric,
            Self::Marker => TagKind::Marker,
            Self::CuePoint => TagKind::CuePoint,
            Self::ProgramName => TagKind::ProgramName,
            Self::DeviceName => TagKind::DeviceName,
            _ => return None,
        })
    }
}

/// The meta kinds whose payload is text, and can be read or edited with
/// [`Track::tag`](crate::file::Track::tag) and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagKind {
    /// Any text
    Text,
    /// Copyright notice
    Copyright,
    /// Sequence or track name
    Title,
    /// Instrument name
    Instrument,
    /// Lyric
    Lyric,
    /// Marker
    Marker,
    /// Cue point
    CuePoint,
    /// Program name
    ProgramName,
    /// Device name
    DeviceName,
}

impl From<TagKind> for MetaKind {
    fn from(value: TagKind) -> Self {
        match value {
            TagKind::Text => Self::Text,
            TagKind::Copyright => Self::Copyright,
            TagKind::Title => Self::Title,
            TagKind::Instrument => Self::Instrument,
            TagKind::Lyric => Self::Lyric,
            TagKind::Marker => Self::Marker,
            TagKind::CuePoint => Self::CuePoint,
            TagKind::ProgramName => Self::ProgramName,
            TagKind::DeviceName => Self::DeviceName,
        }
    }
}

#[test]
fn unknown_kinds_are_preserved() {
    use pretty_assertions::assert_eq;
    let kind = MetaKind::from(0x4B);
    assert_eq!(kind, MetaKind::Other(0x4B));
    assert_eq!(kind.byte(), 0x4B);
    assert_eq!(MetaKind::from(0x2F), MetaKind::EndOfTrack);
}

#[test]
fn tag_kinds_map_both_ways() {
    use pretty_assertions::assert_eq;
    for kind in [TagKind::Title, TagKind::Copyright, TagKind::DeviceName] {
        assert_eq!(MetaKind::from(kind).tag_kind(), Some(kind));
    }
    assert_eq!(MetaKind::Tempo.tag_kind(), None);
}
