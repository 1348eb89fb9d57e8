#![doc = r#"
Typed views of meta event payloads.

Meta events are stored as raw bytes. These types decode the ones with a fixed
layout; see [`MetaEvent`](crate::file::MetaEvent) for the accessors.
"#]

mod smpte_offset;
pub use smpte_offset::*;

mod signature;
pub use signature::*;

mod tempo;
pub use tempo::*;

use thiserror::Error;

/// Reasons a SMPTE offset payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// The payload is not five bytes long
    #[error("SMPTE offset must be 5 bytes, found {0}")]
    Length(usize),
    /// The two frame rate bits hold something other than 0-3
    #[error("Invalid SMPTE frame type {0}")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("Invalid SMPTE hour {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("Invalid SMPTE minute {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("Invalid SMPTE second {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("Invalid SMPTE subframe {0}")]
    Subframe(u8),
}
