#![doc = r#"
Converting ticks to wall-clock time.

A tick lasts `micros_per_quarter_note / division` microseconds, and the
tempo can change anywhere in the file. The [`TempoMap`] collects the tempo
events of the first track and integrates over them piece by piece:

```text
tick:    0 ........ 960 ............ 1440 ......
tempo:   500 000 µs  | 1 000 000 µs   | ...
seconds: 0 ........ 1.0 ............ 2.0 .......
```
"#]

use crate::file::{Tempo, Track};

/// A tempo event in the first track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    /// Cumulative tick where the tempo takes effect
    pub tick: u64,
    /// The new tempo
    pub tempo: Tempo,
}

/// Tempo changes in file order, and the division they are measured against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMap {
    division: u16,
    changes: Vec<TempoChange>,
}

impl TempoMap {
    /// Create a tempo map from changes in ascending tick order.
    pub fn new(division: u16, changes: Vec<TempoChange>) -> Self {
        Self { division, changes }
    }

    /// Collect the tempo events of `track`.
    ///
    /// Tempo events with a payload shorter than three bytes are skipped.
    pub fn from_track(track: &Track, division: u16) -> Self {
        let changes = track
            .events()
            .iter()
            .filter(|event| event.is_tempo())
            .filter_map(|event| {
                let meta = event.meta()?;
                let tempo = meta.as_tempo();
                if tempo.is_none() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        tick = event.tick(),
                        len = meta.payload().len(),
                        "skipping malformed tempo event"
                    );
                }
                Some(TempoChange {
                    tick: event.tick(),
                    tempo: tempo?,
                })
            })
            .collect();
        Self { division, changes }
    }

    /// Ticks per quarter note
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// The tempo changes, in file order
    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// Seconds from the start of the file to `tick`.
    pub fn tick_to_seconds(&self, tick: u64) -> f64 {
        self.seconds_at(tick as f64)
    }

    /// Seconds from the start of the file to a fractional tick position.
    ///
    /// Each change at or before `tick` closes the span that ran under the
    /// previous tempo (120 BPM before the first change); the remainder runs
    /// under the last tempo reached.
    pub fn seconds_at(&self, tick: f64) -> f64 {
        let mut seconds = 0.;
        let mut start = 0.;
        let mut tempo = Tempo::DEFAULT;

        for change in &self.changes {
            let change_tick = change.tick as f64;
            if change_tick > tick {
                break;
            }
            seconds += self.span_seconds(change_tick - start, tempo);
            start = change_tick;
            tempo = change.tempo;
        }

        seconds + self.span_seconds(tick - start, tempo)
    }

    fn span_seconds(&self, ticks: f64, tempo: Tempo) -> f64 {
        ticks / self.division as f64 * (tempo.micros_per_quarter_note() as f64 / 1_000_000.)
    }
}

#[doc = r#"
Values derived from a file's tracks: where the longest track ends, the tempo
map, and how long the whole file plays.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    tick_max: u64,
    tempo_map: TempoMap,
    runtime_seconds: f64,
}

impl Timeline {
    /// Derive the timeline of `tracks`. Tempo comes from the first track.
    pub fn new(tracks: &[Track], division: u16) -> Self {
        let tick_max = tracks.iter().map(Track::tick_max).max().unwrap_or(0);
        let tempo_map = match tracks.first() {
            Some(track) => TempoMap::from_track(track, division),
            None => TempoMap::new(division, Vec::new()),
        };
        let runtime_seconds = tempo_map.tick_to_seconds(tick_max);
        Self {
            tick_max,
            tempo_map,
            runtime_seconds,
        }
    }

    /// The largest final tick over all tracks
    pub const fn tick_max(&self) -> u64 {
        self.tick_max
    }

    /// The tempo changes of the first track
    pub const fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    /// Playing time of the whole file
    pub const fn runtime_seconds(&self) -> f64 {
        self.runtime_seconds
    }

    /// See [`TempoMap::tick_to_seconds`].
    pub fn tick_to_seconds(&self, tick: u64) -> f64 {
        self.tempo_map.tick_to_seconds(tick)
    }
}

#[test]
fn one_beat_at_default_tempo() {
    let map = TempoMap::new(480, Vec::new());
    assert!((map.tick_to_seconds(480) - 0.5).abs() < 1e-6);
    assert!((map.tick_to_seconds(960) - 1.0).abs() < 1e-6);
}

#[test]
fn integrates_across_changes() {
    let map = TempoMap::new(
        480,
        vec![
            TempoChange {
                tick: 0,
                tempo: Tempo::new(500_000),
            },
            TempoChange {
                tick: 960,
                tempo: Tempo::new(1_000_000),
            },
        ],
    );
    assert!((map.tick_to_seconds(960) - 1.0).abs() < 1e-6);
    assert!((map.tick_to_seconds(1440) - 2.0).abs() < 1e-6);
    assert!((map.seconds_at(1200.) - 1.5).abs() < 1e-6);
}

#[test]
fn change_after_tick_is_ignored() {
    let map = TempoMap::new(
        96,
        vec![TempoChange {
            tick: 192,
            tempo: Tempo::new(250_000),
        }],
    );
    assert!((map.tick_to_seconds(96) - 0.5).abs() < 1e-6);
    assert!((map.tick_to_seconds(288) - 1.25).abs() < 1e-6);
}
