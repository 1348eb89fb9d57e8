#![warn(missing_docs)]
#![doc = r#"
Standard MIDI Files, parsed into something you can edit.

`smfkit` reads a `.mid` buffer into a [`MidiFile`](crate::file::MidiFile),
lets you change track names, programs and events without breaking the
structure of the file, writes it back to bytes, and replays it through a
[`PlaybackClock`](crate::player::PlaybackClock) that follows the file's tempo
map.

# Example
```rust
use smfkit::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x64,
    0x83, 0x60, 0x3C, 0x00,
    0x00, 0xFF, 0x2F, 0x00,
];

let mut file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.division(), 480);
assert_eq!(file.timeline().unwrap().tick_max(), 480);

file.track_mut(0).unwrap().set_tag(TagKind::Title, "Piano");
let encoded = file.encode();

let reparsed = MidiFile::parse(&encoded).unwrap();
assert_eq!(reparsed.tracks()[0].tag(TagKind::Title).as_deref(), Some("Piano"));
```
"#]

pub mod file;
pub mod message;
pub mod player;
pub mod reader;
pub mod vlq;

mod micros;
pub use micros::*;

#[doc(hidden)]
pub mod prelude {
    pub use crate::{
        file::{
            ChannelEvent, Format, Header, KeySignature, MetaEvent, MidiFile, SmpteError, SmpteFps,
            SmpteOffset, SysExEvent, SysExTag, Tempo, TempoChange, TempoMap, TimeSignature,
            Timeline, Track, TrackEvent, TrackMessage, TrackSummary,
        },
        message::{MetaKind, StatusType, TagKind},
        micros::UMicros,
        player::{
            ClockSettings, ManualTime, Notification, PlaybackClock, PlaybackError, PlaybackState,
            SystemTime, TimeSource,
        },
        reader::{FormatError, ReadResult, ReaderError},
    };
}
