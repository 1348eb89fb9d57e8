#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is a header followed by one or more tracks:

```text
MThd <6> <format> <track count> <division>
MTrk <length> <delta> <event> <delta> <event> ... <delta> FF 2F 00
MTrk ...
```

Parsing is all or nothing: the first malformed byte anywhere aborts the whole
file with a [`ReaderError`] naming the offending position.
"#]

mod event;
pub use event::*;

mod header;
pub use header::*;

mod meta;
pub use meta::*;

mod summary;
pub use summary::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::reader::{FormatError, ReadResult, Reader, ReaderError};

#[doc = r#"
A parsed Standard MIDI File.

The [`Timeline`] is derived once, when the file is parsed or built. Edits
through [`MidiFile::track_mut`] or [`MidiFile::delete_track`] mark it stale,
and [`MidiFile::timeline`] yields `None` until
[`MidiFile::refresh_timeline`] derives it again.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
    timeline: Option<Timeline>,
}

impl MidiFile {
    /// Build a file from tracks. The timeline is derived immediately.
    ///
    /// `division` must be in `1..=MAX_DIVISION`, the range [`MidiFile::parse`]
    /// accepts.
    pub fn new(format: Format, division: u16, tracks: Vec<Track>) -> Result<Self, FormatError> {
        let header = Header::new(format, division)?;
        let timeline = Some(Timeline::new(&tracks, division));
        Ok(Self {
            header,
            tracks,
            timeline,
        })
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let (header, declared) = Header::read(&mut reader)?;

        let mut tracks = Vec::with_capacity(declared as usize);
        while !reader.is_at_end() {
            if !reader.starts_with(TRACK_TAG) {
                return Err(reader.error(FormatError::MissingTrackHeaderMarker));
            }
            reader.read_slice(TRACK_TAG.len())?;
            let length = reader.read_u32()? as usize;
            let start = reader.buffer_position();
            let body = reader.read_slice(length)?;
            let track = Track::parse(body).map_err(|e| e.offset_by(start))?;
            tracks.push(track);
        }

        if tracks.len() != declared as usize {
            return Err(reader.error(FormatError::InconsistentTrackCount {
                declared,
                found: tracks.len(),
            }));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            format = ?header.format(),
            division = header.division(),
            tracks = tracks.len(),
            "parsed midi file"
        );

        let timeline = Some(Timeline::new(&tracks, header.division()));
        Ok(Self {
            header,
            tracks,
            timeline,
        })
    }

    /// Returns header info
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Format 0 or 1
    pub const fn format(&self) -> Format {
        self.header.format()
    }

    /// Ticks per quarter note
    pub const fn division(&self) -> u16 {
        self.header.division()
    }

    /// Number of tracks. This is the count written by [`MidiFile::encode`].
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// All tracks in file order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The track at `index`
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Mutable access to the track at `index`. Marks the timeline stale.
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        let track = self.tracks.get_mut(index)?;
        self.timeline = None;
        Some(track)
    }

    /// Remove the track at `index`. Marks the timeline stale.
    ///
    /// The track count written by [`MidiFile::encode`] follows.
    pub fn delete_track(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.timeline = None;
        Some(self.tracks.remove(index))
    }

    /// The derived timeline, or `None` if an edit made it stale.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Derive the timeline from the current tracks.
    pub fn refresh_timeline(&mut self) -> &Timeline {
        self.timeline
            .insert(Timeline::new(&self.tracks, self.header.division()))
    }

    /// Serialize the header and every track.
    ///
    /// Channel events are always written with an explicit status byte, so the
    /// output can be longer than the bytes the file was parsed from.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len_estimate());
        self.header.write(self.tracks.len() as u16, &mut out);
        for track in &self.tracks {
            track.write(&mut out);
        }
        out.shrink_to_fit();
        out
    }

    // Upper bound: delta VLQ (4), status and meta kind (2), length VLQ (4)
    // and the fixed two bytes of channel data, plus each payload.
    fn encoded_len_estimate(&self) -> usize {
        let events: usize = self
            .tracks
            .iter()
            .flat_map(Track::events)
            .map(|event| 12 + event.message().payload_len())
            .sum();
        14 + self.tracks.len() * 8 + events
    }
}

impl TryFrom<&[u8]> for MidiFile {
    type Error = ReaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(bytes)
    }
}

#[cfg(test)]
fn two_track_bytes() -> Vec<u8> {
    let mut bytes = b"MThd\0\0\0\x06\0\x01\0\x02\x01\xE0".to_vec();
    // tempo 500 000, end of track at 960
    bytes.extend_from_slice(b"MTrk\0\0\0\x0C");
    bytes.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    bytes.extend_from_slice(&[0x87, 0x40, 0xFF, 0x2F, 0x00]);
    // note on, running status note on with velocity 0, end of track
    bytes.extend_from_slice(b"MTrk\0\0\0\x0C");
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]);
    bytes.extend_from_slice(&[0x83, 0x60, 0x3C, 0x00]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes
}

#[test]
fn parses_header_and_timeline() {
    use pretty_assertions::assert_eq;
    let file = MidiFile::parse(&two_track_bytes()).unwrap();
    assert_eq!(file.format(), Format::Simultaneous);
    assert_eq!(file.division(), 480);
    assert_eq!(file.track_count(), 2);

    let timeline = file.timeline().unwrap();
    assert_eq!(timeline.tick_max(), 960);
    assert!((timeline.runtime_seconds() - 1.0).abs() < 1e-6);
}

#[test]
fn track_offsets_point_into_the_file() {
    use pretty_assertions::assert_eq;
    let mut bytes = two_track_bytes();
    // drop the second track's end of track
    bytes.truncate(bytes.len() - 4);
    bytes[41] = 0x08;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), FormatError::MissingEndOfTrack);
    assert_eq!(err.position(), bytes.len());
}

#[test]
fn stray_chunk_is_rejected() {
    use pretty_assertions::assert_eq;
    let mut bytes = two_track_bytes();
    bytes.extend_from_slice(b"XFIR\0\0\0\0");
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), FormatError::MissingTrackHeaderMarker);
}

#[test]
fn delete_track_marks_timeline_stale() {
    use pretty_assertions::assert_eq;
    let mut file = MidiFile::parse(&two_track_bytes()).unwrap();

    let removed = file.delete_track(0).unwrap();
    assert_eq!(removed.tick_max(), 960);
    assert!(file.timeline().is_none());
    assert_eq!(file.delete_track(5), None);

    let timeline = file.refresh_timeline();
    assert_eq!(timeline.tick_max(), 480);
    assert!(timeline.tempo_map().changes().is_empty());

    let reparsed = MidiFile::parse(&file.encode()).unwrap();
    assert_eq!(reparsed.track_count(), 1);
}

#[test]
fn track_mut_marks_timeline_stale() {
    let mut file = MidiFile::parse(&two_track_bytes()).unwrap();
    assert!(file.track_mut(9).is_none());
    assert!(file.timeline().is_some());

    file.track_mut(1).unwrap().set_program(5);
    assert!(file.timeline().is_none());
    file.refresh_timeline();
    assert!(file.timeline().is_some());
}

#[test]
fn built_files_always_parse_back() {
    use pretty_assertions::assert_eq;
    let mut track = Track::new();
    track.push(10, MetaEvent::new(crate::message::MetaKind::Marker, *b"A"));

    assert_eq!(
        MidiFile::new(Format::SingleMultiChannel, 0, vec![track.clone()]),
        Err(FormatError::UnsupportedTimeFormat(0))
    );
    assert!(MidiFile::new(Format::SingleMultiChannel, 0x8000, vec![track.clone()]).is_err());

    let file = MidiFile::new(Format::SingleMultiChannel, MAX_DIVISION, vec![track]).unwrap();
    let reparsed = MidiFile::parse(&file.encode()).unwrap();
    assert_eq!(reparsed.division(), MAX_DIVISION);
    assert!(reparsed.timeline().unwrap().runtime_seconds().is_finite());
}
