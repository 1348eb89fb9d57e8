use thiserror::Error;

#[doc = r#"
An error produced while reading bytes into a [`MidiFile`](crate::file::MidiFile),
along with the byte offset where it happened.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: FormatError,
}

/// The ways a buffer can fail to be a Standard MIDI File this crate supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer does not start with `MThd`.
    #[error("Missing file header")]
    MissingHeader,
    /// The header chunk does not declare a length of 6.
    #[error("Wrong file header size: {0}")]
    WrongHeaderLength(u32),
    /// Only formats 0 and 1 are supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(u16),
    /// The header declares no tracks.
    #[error("Missing track information")]
    MissingTrackInfo,
    /// SMPTE (negative) or zero division.
    #[error("Unsupported time format: {0}")]
    UnsupportedTimeFormat(i16),
    /// A chunk after the header is not `MTrk`.
    #[error("Missing track header marker")]
    MissingTrackHeaderMarker,
    /// The number of track chunks differs from the header's count.
    #[error("Inconsistent track count: header declares {declared}, found {found}")]
    InconsistentTrackCount {
        /// Count from the header chunk
        declared: u16,
        /// Track chunks actually present
        found: usize,
    },
    /// The track does not end with exactly one end-of-track meta event.
    #[error("Missing end of track marker")]
    MissingEndOfTrack,
    /// A length, VLQ or payload runs past the end of the buffer.
    #[error("Read out of bounds!")]
    Truncated,
    /// A variable-length quantity longer than four bytes.
    #[error("Variable-length quantity exceeds four bytes")]
    VlqOverflow,
    /// A data byte appeared before any status byte in the track.
    #[error("Data byte {0:#04X} without a running status")]
    MissingRunningStatus(u8),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: FormatError) -> Self {
        Self { position, kind }
    }
    /// True if out of bounds or unexpected end of file
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, FormatError::Truncated)
    }
    /// Returns the error kind of the reader.
    pub fn kind(&self) -> &FormatError {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new out of bounds error
    pub const fn truncated(position: usize) -> Self {
        Self {
            position,
            kind: FormatError::Truncated,
        }
    }

    /// Shift the position by the offset of the slice the error came from.
    pub(crate) const fn offset_by(self, base: usize) -> Self {
        Self {
            position: self.position + base,
            kind: self.kind,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn error_display_carries_position() {
    let err = ReaderError::new(14, FormatError::MissingEndOfTrack);
    assert_eq!(
        err.to_string(),
        "Reading at Position 14, Missing end of track marker"
    );
    assert_eq!(err.offset_by(8).position(), 22);
}
