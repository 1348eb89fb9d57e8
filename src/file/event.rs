use core::fmt;

use crate::{
    file::{KeySignature, SmpteOffset, Tempo, TimeSignature},
    message::{MetaKind, StatusType, controller_name},
    reader::{FormatError, ReadResult, Reader},
    vlq,
};

/// The velocity a zero-velocity note on is rewritten with.
pub const NOTE_OFF_VELOCITY: u8 = 64;

#[doc = r#"
One event of a track: how long after the previous event it happens, where
that puts it on the track's timeline, and what it is.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta: u32,
    tick: u64,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create an event `delta` ticks after its predecessor.
    ///
    /// `delta` saturates at [`vlq::MAX`], the largest delta a file can hold.
    /// The cumulative tick is filled in once the event belongs to a
    /// [`Track`](crate::file::Track).
    pub fn new(delta: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta: delta.min(vlq::MAX),
            tick: 0,
            message: message.into(),
        }
    }

    /// Ticks since the previous event of the track
    pub const fn delta(&self) -> u32 {
        self.delta
    }

    /// Ticks since the start of the track
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// The event itself
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }

    /// The meta event, if this is one
    pub const fn meta(&self) -> Option<&MetaEvent> {
        match &self.message {
            TrackMessage::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// The channel event, if this is one
    pub const fn channel(&self) -> Option<&ChannelEvent> {
        match &self.message {
            TrackMessage::Channel(channel) => Some(channel),
            _ => None,
        }
    }

    pub(crate) fn meta_mut(&mut self) -> Option<&mut MetaEvent> {
        match &mut self.message {
            TrackMessage::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    pub(crate) fn channel_mut(&mut self) -> Option<&mut ChannelEvent> {
        match &mut self.message {
            TrackMessage::Channel(channel) => Some(channel),
            _ => None,
        }
    }

    /// True for the `FF 2F` meta event that terminates every track.
    pub fn is_end_of_track(&self) -> bool {
        self.meta()
            .is_some_and(|meta| meta.kind() == MetaKind::EndOfTrack)
    }

    /// True for a tempo meta event.
    pub fn is_tempo(&self) -> bool {
        self.meta().is_some_and(|meta| meta.kind() == MetaKind::Tempo)
    }

    /// Whether an editor may offer to delete this event on its own.
    ///
    /// Only events without a delta qualify, so deleting never shifts the rest
    /// of the track. Timing structure (end of track, tempo) and notes are
    /// never removable.
    pub fn is_removable(&self) -> bool {
        if self.delta > 0 {
            return false;
        }
        match &self.message {
            TrackMessage::Meta(meta) => {
                !matches!(meta.kind(), MetaKind::EndOfTrack | MetaKind::Tempo)
            }
            TrackMessage::Channel(channel) => !matches!(
                channel.status(),
                StatusType::NoteOn | StatusType::NoteOff
            ),
            TrackMessage::SystemExclusive(_) => true,
        }
    }

    /// Append the delta-time and the event bytes to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        vlq::write(self.delta, out);
        self.message.write(out);
    }
}

#[doc = r#"
The three shapes a track event can take.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// `FF <kind> <len> <payload>`
    Meta(MetaEvent),
    /// A status byte and its data bytes
    Channel(ChannelEvent),
    /// `F0|F7 <len> <payload>`
    SystemExclusive(SysExEvent),
}

impl From<MetaEvent> for TrackMessage {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<ChannelEvent> for TrackMessage {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<SysExEvent> for TrackMessage {
    fn from(value: SysExEvent) -> Self {
        Self::SystemExclusive(value)
    }
}

impl TrackMessage {
    /// Decode the event at the reader's position.
    ///
    /// `running_status` is the last status byte seen in this track. It is
    /// updated by every explicit status byte and consulted when a data byte
    /// appears where a status byte was expected.
    pub fn read(reader: &mut Reader<'_>, running_status: &mut Option<u8>) -> ReadResult<Self> {
        match reader.peek_byte()? {
            0xFF => {
                reader.read_byte()?;
                let kind = MetaKind::from(reader.read_byte()?);
                let len = reader.read_vlq()?;
                let payload = reader.read_slice(len as usize)?.to_vec();
                Ok(Self::Meta(MetaEvent { kind, payload }))
            }
            tag @ (0xF0 | 0xF7) => {
                reader.read_byte()?;
                let tag = if tag == 0xF0 {
                    SysExTag::Exclusive
                } else {
                    SysExTag::Escape
                };
                let len = reader.read_vlq()?;
                let payload = reader.read_slice(len as usize)?.to_vec();
                Ok(Self::SystemExclusive(SysExEvent { tag, payload }))
            }
            byte => {
                let status = if byte & 0x80 != 0 {
                    reader.read_byte()?;
                    *running_status = Some(byte);
                    byte
                } else {
                    running_status.ok_or(reader.error(FormatError::MissingRunningStatus(byte)))?
                };
                let (status, channel) = StatusType::from_status_byte(status);
                let len = status.data_len();
                let mut data = [0; 2];
                data[..len].copy_from_slice(reader.read_slice(len)?);

                let mut event = ChannelEvent {
                    status,
                    channel,
                    data,
                };
                event.normalize_note_off();
                Ok(Self::Channel(event))
            }
        }
    }

    /// Append the event bytes, without delta-time, to `out`.
    ///
    /// Channel events always carry their status byte.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Meta(meta) => {
                out.push(0xFF);
                out.push(meta.kind.byte());
                vlq::write(meta.payload.len() as u32, out);
                out.extend_from_slice(&meta.payload);
            }
            Self::Channel(channel) => {
                out.push(channel.status_byte());
                out.extend_from_slice(channel.data());
            }
            Self::SystemExclusive(sysex) => {
                out.push(sysex.tag.byte());
                vlq::write(sysex.payload.len() as u32, out);
                out.extend_from_slice(&sysex.payload);
            }
        }
    }

    /// Length of the variable part: the payload, or the channel data bytes.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Meta(meta) => meta.payload.len(),
            Self::Channel(channel) => channel.data().len(),
            Self::SystemExclusive(sysex) => sysex.payload.len(),
        }
    }
}

impl fmt::Display for TrackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meta(meta) => fmt::Display::fmt(meta, f),
            Self::Channel(channel) => fmt::Display::fmt(channel, f),
            Self::SystemExclusive(sysex) => fmt::Display::fmt(sysex, f),
        }
    }
}

/// A non-MIDI annotation: text, tempo, signatures, end of track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    kind: MetaKind,
    payload: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event from raw payload bytes.
    ///
    /// The payload is cut at [`vlq::MAX`] bytes, the longest a length field
    /// can describe.
    pub fn new(kind: MetaKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: bounded_payload(payload.into()),
        }
    }

    /// The `FF 2F 00` end of track marker.
    pub fn end_of_track() -> Self {
        Self::new(MetaKind::EndOfTrack, Vec::new())
    }

    /// A tempo change.
    pub fn tempo(tempo: Tempo) -> Self {
        Self::new(MetaKind::Tempo, tempo.to_bytes().to_vec())
    }

    /// The kind byte
    pub const fn kind(&self) -> MetaKind {
        self.kind
    }

    /// The raw payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub(crate) fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = bounded_payload(payload);
    }

    /// The payload as text, UTF-8 first and Latin-1 when that fails.
    pub fn text(&self) -> String {
        match core::str::from_utf8(&self.payload) {
            Ok(text) => text.to_owned(),
            Err(_) => self.payload.iter().map(|&byte| byte as char).collect(),
        }
    }

    /// The tempo, for a well-formed tempo event.
    pub fn as_tempo(&self) -> Option<Tempo> {
        (self.kind == MetaKind::Tempo)
            .then(|| Tempo::from_bytes(&self.payload))
            .flatten()
    }

    /// The time signature, for a well-formed time signature event.
    pub fn as_time_signature(&self) -> Option<TimeSignature> {
        (self.kind == MetaKind::TimeSignature)
            .then(|| TimeSignature::from_bytes(&self.payload))
            .flatten()
    }

    /// The key signature, for a well-formed key signature event.
    pub fn as_key_signature(&self) -> Option<KeySignature> {
        (self.kind == MetaKind::KeySignature)
            .then(|| KeySignature::from_bytes(&self.payload))
            .flatten()
    }

    /// The SMPTE offset, for a well-formed SMPTE offset event.
    pub fn as_smpte_offset(&self) -> Option<SmpteOffset> {
        (self.kind == MetaKind::SmpteOffset)
            .then(|| SmpteOffset::parse(&self.payload).ok())
            .flatten()
    }
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind.name();
        if self.kind.tag_kind().is_some() {
            return write!(f, "{name}: {}", self.text());
        }
        if let Some(tempo) = self.as_tempo() {
            return write!(f, "{name} {:.1}", tempo.bpm());
        }
        if let Some(signature) = self.as_time_signature() {
            return write!(f, "{name} {signature}");
        }
        if let Some(key) = self.as_key_signature() {
            return write!(f, "{name} {key}");
        }
        if let Some(offset) = self.as_smpte_offset() {
            return write!(f, "{name} {offset}");
        }
        f.write_str(name)?;
        for byte in &self.payload {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

/// A channel voice message, or a system common/real-time message stored in
/// the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    status: StatusType,
    channel: u8,
    data: [u8; 2],
}

impl ChannelEvent {
    /// Create an event from a status type, a channel and its data bytes.
    ///
    /// Bytes beyond what `status` carries are ignored; missing ones are zero.
    pub fn new(status: StatusType, channel: u8, data: &[u8]) -> Self {
        let mut bytes = [0; 2];
        let len = status.data_len().min(data.len());
        bytes[..len].copy_from_slice(&data[..len]);
        let mut event = Self {
            status,
            channel: channel & 0x0F,
            data: bytes,
        };
        event.normalize_note_off();
        event
    }

    /// A note on. A velocity of zero yields a note off.
    pub fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(StatusType::NoteOn, channel, &[key, velocity])
    }

    /// A note off.
    pub fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(StatusType::NoteOff, channel, &[key, velocity])
    }

    /// A program change.
    pub fn program_change(channel: u8, program: u8) -> Self {
        Self::new(StatusType::ProgramChange, channel, &[program])
    }

    /// The message type
    pub const fn status(&self) -> StatusType {
        self.status
    }

    /// The channel, 0-15. Always 0 for system messages.
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The status byte as written to a file
    pub const fn status_byte(&self) -> u8 {
        self.status.status_byte(self.channel)
    }

    /// The data bytes, as many as the status type carries
    pub fn data(&self) -> &[u8] {
        &self.data[..self.status.data_len()]
    }

    pub(crate) fn set_data(&mut self, index: usize, value: u8) {
        if index < self.status.data_len() {
            self.data[index] = value;
        }
    }

    fn normalize_note_off(&mut self) {
        if self.status == StatusType::NoteOn && self.data[1] == 0 {
            self.status = StatusType::NoteOff;
            self.data[1] = NOTE_OFF_VELOCITY;
        }
    }
}

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status.name())?;
        for byte in self.data() {
            write!(f, " {byte}")?;
        }
        let controller = (self.status == StatusType::ControlChange)
            .then(|| controller_name(self.data[0]))
            .flatten();
        if let Some(name) = controller {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

/// The byte that introduces a system exclusive event in a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysExTag {
    /// `F0`: a complete system exclusive message
    Exclusive,
    /// `F7`: a continuation packet or escaped raw bytes
    Escape,
}

impl SysExTag {
    /// The tag byte
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Exclusive => 0xF0,
            Self::Escape => 0xF7,
        }
    }
}

/// System exclusive data. The tag byte is not part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    tag: SysExTag,
    payload: Vec<u8>,
}

impl SysExEvent {
    /// Create a system exclusive event. The payload is cut at [`vlq::MAX`]
    /// bytes.
    pub fn new(tag: SysExTag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: bounded_payload(payload.into()),
        }
    }

    /// `F0` or `F7`
    pub const fn tag(&self) -> SysExTag {
        self.tag
    }

    /// The bytes after the length
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl fmt::Display for SysExEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.tag {
            SysExTag::Exclusive => "System Exclusive",
            SysExTag::Escape => "Escaped Data",
        };
        write!(f, "{name} {:02X}", self.tag.byte())?;
        for byte in &self.payload {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

fn bounded_payload(mut payload: Vec<u8>) -> Vec<u8> {
    payload.truncate(vlq::MAX as usize);
    payload
}

#[cfg(test)]
fn read_one(bytes: &[u8], running_status: &mut Option<u8>) -> ReadResult<TrackMessage> {
    let mut reader = Reader::from_byte_slice(bytes);
    TrackMessage::read(&mut reader, running_status)
}

#[test]
fn zero_velocity_note_on_becomes_note_off() {
    use pretty_assertions::assert_eq;
    let message = read_one(&[0x90, 60, 0], &mut None).unwrap();
    let TrackMessage::Channel(channel) = message else {
        panic!("expected a channel event");
    };
    assert_eq!(channel.status(), StatusType::NoteOff);
    assert_eq!(channel.data(), [60, 64]);
}

#[test]
fn running_status_reuses_previous_status() {
    use pretty_assertions::assert_eq;
    let bytes = [0x92, 60, 100, 62, 90];
    let mut reader = Reader::from_byte_slice(&bytes);
    let mut running = None;

    let first = TrackMessage::read(&mut reader, &mut running).unwrap();
    let second = TrackMessage::read(&mut reader, &mut running).unwrap();

    assert_eq!(running, Some(0x92));
    assert_eq!(first, ChannelEvent::note_on(2, 60, 100).into());
    assert_eq!(second, ChannelEvent::note_on(2, 62, 90).into());
    assert!(reader.is_at_end());
}

#[test]
fn data_byte_without_status_is_rejected() {
    use pretty_assertions::assert_eq;
    let err = read_one(&[0x3C, 0x40], &mut None).unwrap_err();
    assert_eq!(err.kind(), &FormatError::MissingRunningStatus(0x3C));
}

#[test]
fn reads_meta_and_sysex_payloads() {
    use pretty_assertions::assert_eq;
    let meta = read_one(&[0xFF, 0x03, 0x03, b'A', b'b', b'c'], &mut None).unwrap();
    assert_eq!(meta, MetaEvent::new(MetaKind::Title, *b"Abc").into());

    let sysex = read_one(&[0xF0, 0x03, 0x43, 0x12, 0xF7], &mut None).unwrap();
    assert_eq!(
        sysex,
        SysExEvent::new(SysExTag::Exclusive, [0x43, 0x12, 0xF7]).into()
    );
}

#[test]
fn payload_past_end_is_truncated() {
    let err = read_one(&[0xFF, 0x01, 0x05, b'a'], &mut None).unwrap_err();
    assert!(err.is_truncated());
    let err = read_one(&[0xB0, 0x07], &mut None).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn writes_explicit_status_bytes() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    TrackEvent::new(0x80, ChannelEvent::program_change(5, 40)).write(&mut out);
    TrackEvent::new(0, MetaEvent::end_of_track()).write(&mut out);
    assert_eq!(out, [0x81, 0x00, 0xC5, 40, 0x00, 0xFF, 0x2F, 0x00]);
}

#[test]
fn deltas_saturate_at_four_bytes() {
    use pretty_assertions::assert_eq;
    let event = TrackEvent::new(vlq::MAX + 1, MetaEvent::new(MetaKind::Marker, *b"x"));
    assert_eq!(event.delta(), vlq::MAX);

    let mut out = Vec::new();
    event.write(&mut out);
    assert_eq!(&out[..4], [0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn latin1_fallback_for_invalid_utf8() {
    use pretty_assertions::assert_eq;
    let meta = MetaEvent::new(MetaKind::Title, [b'C', 0xE9, b'l']);
    assert_eq!(meta.text(), "Cél");
}

#[test]
fn removable_events() {
    assert!(TrackEvent::new(0, MetaEvent::new(MetaKind::Title, *b"x")).is_removable());
    assert!(!TrackEvent::new(5, MetaEvent::new(MetaKind::Title, *b"x")).is_removable());
    assert!(!TrackEvent::new(0, MetaEvent::end_of_track()).is_removable());
    assert!(!TrackEvent::new(0, ChannelEvent::note_on(0, 60, 1)).is_removable());
    assert!(TrackEvent::new(0, ChannelEvent::program_change(0, 1)).is_removable());
}

#[test]
fn display_matches_editor_labels() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        ChannelEvent::note_on(0, 60, 100).to_string(),
        "Note On 60 100"
    );
    assert_eq!(
        ChannelEvent::new(StatusType::ControlChange, 3, &[7, 100]).to_string(),
        "Control Change 7 100 (Volume)"
    );
    assert_eq!(
        ChannelEvent::new(StatusType::ControlChange, 3, &[3, 1]).to_string(),
        "Control Change 3 1"
    );
    assert_eq!(
        MetaEvent::new(MetaKind::Title, *b"Lead").to_string(),
        "Title: Lead"
    );
    assert_eq!(
        MetaEvent::new(MetaKind::Tempo, [0x07, 0xA1, 0x20]).to_string(),
        "Tempo 120.0"
    );
    assert_eq!(
        SysExEvent::new(SysExTag::Escape, [0x01]).to_string(),
        "Escaped Data F7 01"
    );
}
