use crate::{UMicros, file::Tempo};

/// Timing knobs for a [`PlaybackClock`](super::PlaybackClock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockSettings {
    /// How long [`run`](super::PlaybackClock::run) waits between quanta
    pub quantum: UMicros,
    /// Minimum wall time between two position notifications
    pub position_interval: UMicros,
    /// Tempo in effect until the first tempo event plays
    pub default_micros_per_quarter_note: u32,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            quantum: UMicros::from_ms(1),
            position_interval: UMicros::from_secs(1),
            default_micros_per_quarter_note: Tempo::DEFAULT.micros_per_quarter_note(),
        }
    }
}
