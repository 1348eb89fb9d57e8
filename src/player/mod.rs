#![doc = r#"
Replaying a [`MidiFile`] in real time.

A [`PlaybackClock`] turns elapsed time into ticks through the file's tempo,
and reports every event that falls due to its subscribers:

```rust
use smfkit::prelude::*;

let mut track = Track::new();
track.push(0, ChannelEvent::note_on(0, 60, 100));
track.push(480, ChannelEvent::note_off(0, 60, 64));
let file = MidiFile::new(Format::SingleMultiChannel, 480, vec![track]).unwrap();

let time = ManualTime::new();
let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
let notifications = clock.subscribe();

clock.play();
time.advance(UMicros::from_ms(10));
clock.run_quantum();

let first = notifications.try_recv().unwrap();
assert!(matches!(first, Notification::Event { track: 0, .. }));
```

The clock borrows the file, so the file cannot be edited while a clock
exists. Build a new clock after editing.
"#]

mod notification;
pub use notification::*;

mod settings;
pub use settings::*;

mod time_source;
pub use time_source::*;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::{
    UMicros,
    file::{MetaEvent, MidiFile, Timeline},
};

/// Reasons a clock cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The file was edited and its timeline not derived again
    #[error("Timeline is stale, refresh it before playing")]
    StaleTimeline,
}

/// Where a [`PlaybackClock`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    /// At tick zero, cursors rewound
    #[default]
    Stopped,
    /// Advancing on every quantum
    Playing,
    /// Halted, keeping the position
    Paused,
}

#[doc = r#"
Advances a fractional tick position from real elapsed time and emits the
events each track reaches.

Per quantum, every track emits all of its events up to the current position
before the next track is visited, so events at equal ticks come out in
track-index order. Tempo events retune the tick length for the following
quanta. Reaching the file's last tick stops playback; the events of that
final quantum are dropped.
"#]
pub struct PlaybackClock<'f, T: TimeSource> {
    file: &'f MidiFile,
    timeline: &'f Timeline,
    time: T,
    settings: ClockSettings,
    state: PlaybackState,
    tick: f64,
    cursors: Vec<usize>,
    micros_per_quarter_note: u32,
    previous: UMicros,
    last_position: Option<UMicros>,
    subscribers: Vec<Sender<Notification>>,
}

impl<'f, T: TimeSource> PlaybackClock<'f, T> {
    /// Create a stopped clock over `file`.
    pub fn new(file: &'f MidiFile, time: T, settings: ClockSettings) -> Result<Self, PlaybackError> {
        let timeline = file.timeline().ok_or(PlaybackError::StaleTimeline)?;
        Ok(Self {
            file,
            timeline,
            time,
            settings,
            state: PlaybackState::Stopped,
            tick: 0.,
            cursors: vec![0; file.track_count()],
            micros_per_quarter_note: settings.default_micros_per_quarter_note,
            previous: UMicros::ZERO,
            last_position: None,
            subscribers: Vec::new(),
        })
    }

    /// Receive every notification sent from now on.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Start, or resume after [`pause`](Self::pause).
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Playing => return,
            PlaybackState::Stopped => {
                self.cursors.fill(0);
                self.micros_per_quarter_note = self.settings.default_micros_per_quarter_note;
            }
            PlaybackState::Paused => {}
        }
        self.previous = self.time.now();
        self.state = PlaybackState::Playing;
        #[cfg(feature = "tracing")]
        tracing::debug!(tick = self.tick, "playback started");
    }

    /// Halt without rewinding.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Paused;
        #[cfg(feature = "tracing")]
        tracing::debug!(tick = self.tick, "playback paused");
    }

    /// Halt and rewind to tick zero.
    ///
    /// Subscribers get [`Notification::Stopped`] and then a position of zero.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.tick = 0.;
        self.cursors.fill(0);
        self.last_position = None;
        #[cfg(feature = "tracing")]
        tracing::debug!("playback stopped");

        self.notify(Notification::Stopped);
        self.notify(Notification::Position {
            elapsed: 0.,
            total: self.timeline.runtime_seconds(),
        });
    }

    /// Advance by the time passed since the previous quantum and emit
    /// whatever became due. Does nothing unless playing.
    pub fn run_quantum(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let now = self.time.now();
        let elapsed = now.saturating_sub(self.previous);
        self.previous = now;

        let tick_micros = self.micros_per_quarter_note as f64 / self.file.division() as f64;
        self.tick += elapsed.us() as f64 / tick_micros;
        #[cfg(feature = "tracing")]
        tracing::trace!(tick = self.tick, elapsed = elapsed.us(), "quantum");

        if self.tick >= self.timeline.tick_max() as f64 {
            self.stop();
            return;
        }

        let file = self.file;
        for (index, track) in file.tracks().iter().enumerate() {
            let events = track.events();
            while let Some(event) = events
                .get(self.cursors[index])
                .filter(|event| event.tick() as f64 <= self.tick)
            {
                self.cursors[index] += 1;
                if let Some(tempo) = event.meta().and_then(MetaEvent::as_tempo) {
                    self.micros_per_quarter_note = tempo.micros_per_quarter_note();
                }
                self.notify(Notification::Event {
                    track: index,
                    event: event.clone(),
                });
            }
        }

        let due = self
            .last_position
            .is_none_or(|at| now.saturating_sub(at) >= self.settings.position_interval);
        if due {
            self.last_position = Some(now);
            self.notify(Notification::Position {
                elapsed: self.position_seconds(),
                total: self.timeline.runtime_seconds(),
            });
        }
    }

    /// Run quanta until playback stops or pauses, waiting
    /// [`ClockSettings::quantum`] between them.
    pub fn run(&mut self) {
        while self.state == PlaybackState::Playing {
            self.time.wait(self.settings.quantum);
            self.run_quantum();
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// The fractional tick position
    pub const fn tick(&self) -> f64 {
        self.tick
    }

    /// The tick position in seconds
    pub fn position_seconds(&self) -> f64 {
        self.timeline.tempo_map().seconds_at(self.tick)
    }

    /// Playing time of the whole file
    pub const fn runtime_seconds(&self) -> f64 {
        self.timeline.runtime_seconds()
    }

    /// The tempo currently driving the tick length
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.micros_per_quarter_note
    }

    /// The time source the clock reads
    pub const fn time_source(&self) -> &T {
        &self.time
    }

    fn notify(&mut self, notification: Notification) {
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
    }
}

#[cfg(test)]
fn two_second_file() -> MidiFile {
    use crate::{
        file::{ChannelEvent, Format, Tempo, Track},
        message::MetaKind,
    };

    let mut conductor = Track::new();
    conductor.push(0, MetaEvent::tempo(Tempo::new(500_000)));
    conductor.push(960, MetaEvent::new(MetaKind::Marker, *b"End"));

    let mut piano = Track::new();
    piano.push(0, ChannelEvent::note_on(0, 60, 100));
    piano.push(240, ChannelEvent::note_off(0, 60, 64));

    // 960 ticks at 240 per quarter note and 120 BPM
    MidiFile::new(Format::Simultaneous, 240, vec![conductor, piano]).unwrap()
}

#[test]
fn plays_and_stops() {
    use crate::file::{ChannelEvent, TrackMessage};
    use pretty_assertions::assert_eq;

    let file = two_second_file();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    let rx = clock.subscribe();
    assert_eq!(clock.runtime_seconds(), 2.0);

    clock.play();
    time.advance(UMicros::from_ms(10));
    clock.run_quantum();

    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(got.len(), 3);
    assert!(matches!(&got[0], Notification::Event { track: 0, event } if event.is_tempo()));
    assert!(matches!(
        &got[1],
        Notification::Event { track: 1, event }
            if *event.message() == TrackMessage::Channel(ChannelEvent::note_on(0, 60, 100))
    ));
    let Notification::Position { elapsed, total } = got[2] else {
        panic!("expected a position, got {:?}", got[2]);
    };
    assert!((elapsed - 0.01).abs() < 1e-6);
    assert_eq!(total, 2.0);

    // the note off and end of track are due, the next position is not
    time.advance(UMicros::from_ms(500));
    clock.run_quantum();
    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(got.len(), 2);
    assert!(matches!(&got[0], Notification::Event { track: 1, event } if event.tick() == 240));
    assert!(matches!(&got[1], Notification::Event { track: 1, event } if event.is_end_of_track()));

    clock.stop();
    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            Notification::Stopped,
            Notification::Position {
                elapsed: 0.0,
                total: 2.0
            }
        ]
    );
    assert_eq!(clock.state(), PlaybackState::Stopped);
    assert_eq!(clock.tick(), 0.);

    clock.stop();
    assert!(rx.try_recv().is_err());
}

#[test]
fn reaching_the_end_stops() {
    use pretty_assertions::assert_eq;

    let file = two_second_file();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    let rx = clock.subscribe();

    clock.play();
    time.advance(UMicros::from_secs(3));
    clock.run_quantum();

    // everything due in the final quantum is dropped
    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            Notification::Stopped,
            Notification::Position {
                elapsed: 0.0,
                total: 2.0
            }
        ]
    );
    assert!(!clock.is_playing());
}

#[test]
fn pause_keeps_position() {
    use pretty_assertions::assert_eq;

    let file = two_second_file();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    let rx = clock.subscribe();

    clock.play();
    time.advance(UMicros::from_ms(10));
    clock.run_quantum();
    clock.pause();
    assert_eq!(clock.state(), PlaybackState::Paused);
    let paused_at = clock.tick();

    time.advance(UMicros::from_secs(5));
    clock.run_quantum();
    assert_eq!(clock.tick(), paused_at);
    assert_eq!(rx.try_iter().count(), 3);

    // time spent paused does not count
    clock.play();
    time.advance(UMicros::from_ms(10));
    clock.run_quantum();
    assert!((clock.position_seconds() - 0.02).abs() < 1e-6);

    // cursors were kept: nothing at tick zero plays twice
    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(got.len(), 1);
    assert!(matches!(got[0], Notification::Position { .. }));
}

#[test]
fn stop_from_pause_rewinds() {
    use pretty_assertions::assert_eq;

    let file = two_second_file();
    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    clock.play();
    time.advance(UMicros::from_ms(700));
    clock.run_quantum();
    clock.pause();

    let rx = clock.subscribe();
    clock.stop();
    assert_eq!(clock.state(), PlaybackState::Stopped);
    assert_eq!(rx.try_iter().count(), 2);

    // a fresh start replays from the top
    clock.play();
    time.advance(UMicros::from_ms(1));
    clock.run_quantum();
    let events = rx
        .try_iter()
        .filter(|n| matches!(n, Notification::Event { .. }))
        .count();
    assert_eq!(events, 2);
}

#[test]
fn tempo_events_retune_the_tick() {
    use crate::file::{Format, Tempo, Track};
    use pretty_assertions::assert_eq;

    let mut track = Track::new();
    track.push(0, MetaEvent::tempo(Tempo::new(1_000_000)));
    track.push(960, MetaEvent::tempo(Tempo::new(250_000)));
    let file = MidiFile::new(Format::SingleMultiChannel, 480, vec![track]).unwrap();

    let time = ManualTime::new();
    let mut clock = PlaybackClock::new(&file, time.clone(), ClockSettings::default()).unwrap();
    clock.play();
    assert_eq!(clock.micros_per_quarter_note(), 500_000);

    time.advance(UMicros::from_ms(1));
    clock.run_quantum();
    assert_eq!(clock.micros_per_quarter_note(), 1_000_000);

    // 480 ticks per second now
    time.advance(UMicros::from_ms(500));
    clock.run_quantum();
    assert!((clock.tick() - 240.96).abs() < 1e-6);
}

#[test]
fn run_plays_to_the_end() {
    use pretty_assertions::assert_eq;

    let file = two_second_file();
    let mut clock = PlaybackClock::new(&file, ManualTime::new(), ClockSettings::default()).unwrap();
    let rx = clock.subscribe();

    clock.play();
    clock.run();

    assert_eq!(clock.state(), PlaybackState::Stopped);
    let got: Vec<_> = rx.try_iter().collect();
    let events = got
        .iter()
        .filter(|n| matches!(n, Notification::Event { .. }))
        .count();
    // the conductor's marker and end of track fall on the final tick
    assert_eq!(events, 4);
    assert_eq!(got.last(), Some(&Notification::Position {
        elapsed: 0.0,
        total: 2.0
    }));
    assert!(clock.time_source().now() >= UMicros::from_secs(2));
}

#[test]
fn stale_timeline_is_rejected() {
    let mut file = two_second_file();
    file.delete_track(1);
    assert!(matches!(
        PlaybackClock::new(&file, ManualTime::new(), ClockSettings::default()),
        Err(PlaybackError::StaleTimeline)
    ));

    file.refresh_timeline();
    assert!(PlaybackClock::new(&file, ManualTime::new(), ClockSettings::default()).is_ok());
}
