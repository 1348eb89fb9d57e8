use num_enum::FromPrimitive;

#[doc = r#"
The type half of a status byte.

For channel messages (`0x80..=0xEF`) the low nibble is the channel and is
stripped before lookup; system bytes (`0xF1..=0xFE`) are their own type.

```text
|--------|-------------------------|------------|
| Status | Type                    | Data bytes |
|--------|-------------------------|------------|
| 0x8n   | Note Off                | 2          |
| 0x9n   | Note On                 | 2          |
| 0xAn   | Aftertouch              | 2          |
| 0xBn   | Control Change          | 2          |
| 0xCn   | Program Change          | 1          |
| 0xDn   | Channel Aftertouch      | 1          |
| 0xEn   | Pitch Bend              | 2          |
| 0xF1   | Time Code Quarter Frame | 1          |
| 0xF2   | Song Position           | 2          |
| 0xF3   | Song Select             | 1          |
| other  |                         | 0          |
|--------|-------------------------|------------|
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum StatusType {
    /// Release a key
    NoteOff = 0x80,
    /// Press a key
    NoteOn = 0x90,
    /// Polyphonic key pressure
    Aftertouch = 0xA0,
    /// Controller value change
    ControlChange = 0xB0,
    /// Select an instrument
    ProgramChange = 0xC0,
    /// Pressure applied to the whole channel
    ChannelAftertouch = 0xD0,
    /// 14-bit pitch wheel
    PitchBend = 0xE0,
    /// MIDI time code quarter frame
    TimeCodeQuarterFrame = 0xF1,
    /// Song position pointer
    SongPosition = 0xF2,
    /// Song select
    SongSelect = 0xF3,
    /// Tune request
    TuneRequest = 0xF6,
    /// Timing clock
    Clock = 0xF8,
    /// Start the current sequence
    Start = 0xFA,
    /// Continue the current sequence
    Continue = 0xFB,
    /// Stop the current sequence
    Stop = 0xFC,
    /// Active sensing
    ActiveSensing = 0xFE,
    /// A system byte with no defined meaning
    #[num_enum(catch_all)]
    Undefined(u8),
}

impl StatusType {
    /// Split a status byte into its type and channel.
    ///
    /// System bytes report channel 0.
    pub fn from_status_byte(byte: u8) -> (Self, u8) {
        if byte & 0xF0 == 0xF0 {
            (Self::from_primitive(byte), 0)
        } else {
            (Self::from_primitive(byte & 0xF0), byte & 0x0F)
        }
    }

    /// The type byte, without a channel.
    pub const fn byte(&self) -> u8 {
        match self {
            Self::NoteOff => 0x80,
            Self::NoteOn => 0x90,
            Self::Aftertouch => 0xA0,
            Self::ControlChange => 0xB0,
            Self::ProgramChange => 0xC0,
            Self::ChannelAftertouch => 0xD0,
            Self::PitchBend => 0xE0,
            Self::TimeCodeQuarterFrame => 0xF1,
            Self::SongPosition => 0xF2,
            Self::SongSelect => 0xF3,
            Self::TuneRequest => 0xF6,
            Self::Clock => 0xF8,
            Self::Start => 0xFA,
            Self::Continue => 0xFB,
            Self::Stop => 0xFC,
            Self::ActiveSensing => 0xFE,
            Self::Undefined(byte) => *byte,
        }
    }

    /// Rebuild the status byte for `channel`.
    pub const fn status_byte(&self, channel: u8) -> u8 {
        if self.is_channel_message() {
            self.byte() | (channel & 0x0F)
        } else {
            self.byte()
        }
    }

    /// True for the seven channel voice types.
    pub const fn is_channel_message(&self) -> bool {
        self.byte() < 0xF0
    }

    /// The number of data bytes that follow the status byte.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::NoteOff
            | Self::NoteOn
            | Self::Aftertouch
            | Self::ControlChange
            | Self::PitchBend
            | Self::SongPosition => 2,
            Self::ProgramChange
            | Self::ChannelAftertouch
            | Self::TimeCodeQuarterFrame
            | Self::SongSelect => 1,
            _ => 0,
        }
    }

    /// A human readable label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoteOff => "Note Off",
            Self::NoteOn => "Note On",
            Self::Aftertouch => "Aftertouch",
            Self::ControlChange => "Control Change",
            Self::ProgramChange => "Program Change",
            Self::ChannelAftertouch => "Aftertouch Channel",
            Self::PitchBend => "Pitch Bend",
            Self::TimeCodeQuarterFrame => "Time Code Quarter Frame",
            Self::SongPosition => "Song Position",
            Self::SongSelect => "Song Select",
            Self::TuneRequest => "Tune Request",
            Self::Clock => "Clock",
            Self::Start => "Start",
            Self::Continue => "Continue",
            Self::Stop => "Stop",
            Self::ActiveSensing => "Active Sensing",
            Self::Undefined(_) => "Undefined",
        }
    }
}

#[test]
fn splits_channel_from_type() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        StatusType::from_status_byte(0x93),
        (StatusType::NoteOn, 3)
    );
    assert_eq!(
        StatusType::from_status_byte(0xCF),
        (StatusType::ProgramChange, 15)
    );
    assert_eq!(
        StatusType::from_status_byte(0xF2),
        (StatusType::SongPosition, 0)
    );
    assert_eq!(
        StatusType::from_status_byte(0xF5),
        (StatusType::Undefined(0xF5), 0)
    );
}

#[test]
fn rebuilds_status_bytes() {
    use pretty_assertions::assert_eq;
    assert_eq!(StatusType::PitchBend.status_byte(9), 0xE9);
    assert_eq!(StatusType::SongSelect.status_byte(9), 0xF3);
    assert_eq!(StatusType::Undefined(0xFD).status_byte(0), 0xFD);
}

#[test]
fn data_lengths() {
    use pretty_assertions::assert_eq;
    assert_eq!(StatusType::ControlChange.data_len(), 2);
    assert_eq!(StatusType::SongPosition.data_len(), 2);
    assert_eq!(StatusType::ChannelAftertouch.data_len(), 1);
    assert_eq!(StatusType::TimeCodeQuarterFrame.data_len(), 1);
    assert_eq!(StatusType::TuneRequest.data_len(), 0);
    assert_eq!(StatusType::Clock.data_len(), 0);
}
