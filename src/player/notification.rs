use core::fmt;

use crate::file::TrackEvent;

/// What a [`PlaybackClock`](super::PlaybackClock) tells its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// An event became due
    Event {
        /// Index of the track the event belongs to
        track: usize,
        /// The event itself
        event: TrackEvent,
    },
    /// Where playback is, in seconds
    Position {
        /// Seconds from the start of the file
        elapsed: f64,
        /// Playing time of the whole file
        total: f64,
    },
    /// Playback stopped and rewound
    Stopped,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event { track, event } => write!(f, "Track {track}: {}", event.message()),
            Self::Position { elapsed, total } => write!(f, "{elapsed:.1}s / {total:.1}s"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

#[test]
fn display() {
    use crate::file::ChannelEvent;
    use pretty_assertions::assert_eq;
    let note = Notification::Event {
        track: 2,
        event: TrackEvent::new(0, ChannelEvent::note_on(0, 60, 100)),
    };
    assert_eq!(note.to_string(), "Track 2: Note On 60 100");
    let position = Notification::Position {
        elapsed: 1.5,
        total: 2.0,
    };
    assert_eq!(position.to_string(), "1.5s / 2.0s");
}
