use core::ops::{Add, AddAssign, Sub};

/// Unsigned microseconds.
///
/// The unit every [`TimeSource`](crate::player::TimeSource) reports in and
/// the unit the playback clock measures its quanta with.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Returns the microseconds as a u64
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// ms -> us
    #[inline]
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// s -> us
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000_000)
    }

    /// Returns seconds
    #[inline]
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }

    /// Returns no time if I am less than other.
    pub const fn saturating_sub(&self, other: Self) -> UMicros {
        if self.0 < other.0 {
            UMicros(0)
        } else {
            UMicros(self.0 - other.0)
        }
    }
}

impl Add for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Self) -> Self::Output {
        UMicros(self.0 + rhs.0)
    }
}

impl AddAssign for UMicros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for UMicros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        UMicros(self.0 - rhs.0)
    }
}

impl From<core::time::Duration> for UMicros {
    fn from(value: core::time::Duration) -> Self {
        Self(value.as_micros() as u64)
    }
}

#[test]
fn saturating_sub_floors_at_zero() {
    use pretty_assertions::assert_eq;
    let early = UMicros::from_ms(2);
    let late = UMicros::from_ms(5);
    assert_eq!(late.saturating_sub(early), UMicros::new(3_000));
    assert_eq!(early.saturating_sub(late), UMicros::ZERO);
}

#[test]
fn seconds_conversion() {
    assert_eq!(UMicros::from_secs(2).as_secs_f64(), 2.0);
    assert_eq!(UMicros::from(core::time::Duration::from_millis(1)).us(), 1_000);
}
