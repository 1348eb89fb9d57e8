use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use crate::UMicros;

#[doc = r#"
Where the playback clock reads the current time from.

`now` must be monotonic. `wait` blocks (or pretends to) for roughly
`duration`; the clock measures what actually passed with `now` afterwards,
so a late wakeup never compounds into drift.
"#]
pub trait TimeSource {
    /// Time since some fixed origin
    fn now(&self) -> UMicros;

    /// Let `duration` pass.
    fn wait(&mut self, duration: UMicros);
}

/// Wall-clock time backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTime {
    origin: Instant,
}

impl SystemTime {
    /// Start measuring from now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTime {
    fn now(&self) -> UMicros {
        self.origin.elapsed().into()
    }

    fn wait(&mut self, duration: UMicros) {
        std::thread::sleep(Duration::from_micros(duration.us()));
    }
}

#[doc = r#"
Time that only moves when told to.

Clones share the same counter, so a test can hand one clone to a
[`PlaybackClock`](super::PlaybackClock) and advance the other.
`wait` advances the counter by exactly the requested duration.
"#]
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    micros: Arc<AtomicU64>,
}

impl ManualTime {
    /// Starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `duration`.
    pub fn advance(&self, duration: UMicros) {
        self.micros.fetch_add(duration.us(), Ordering::Relaxed);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> UMicros {
        UMicros::new(self.micros.load(Ordering::Relaxed))
    }

    fn wait(&mut self, duration: UMicros) {
        self.advance(duration);
    }
}

#[test]
fn manual_time_is_shared() {
    use pretty_assertions::assert_eq;
    let time = ManualTime::new();
    let mut handle = time.clone();

    time.advance(UMicros::from_ms(3));
    assert_eq!(handle.now(), UMicros::from_ms(3));

    handle.wait(UMicros::new(250));
    assert_eq!(time.now(), UMicros::new(3_250));
}

#[test]
fn system_time_is_monotonic() {
    let time = SystemTime::new();
    let first = time.now();
    assert!(time.now() >= first);
}
