/// Microseconds per quarter note, as carried by the `FF 51 03` meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Tempo {
    /// 120 BPM, the tempo of a file before its first tempo event.
    pub const DEFAULT: Self = Self(500_000);

    /// Create a tempo from microseconds per quarter note.
    ///
    /// Only the low 24 bits fit in a tempo event.
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note & 0x00FF_FFFF)
    }

    /// Create a tempo from beats per minute.
    pub fn from_bpm(bpm: f64) -> Self {
        Self::new((60_000_000. / bpm).round() as u32)
    }

    /// Decode the 24-bit big-endian payload of a tempo event.
    ///
    /// Returns `None` when the payload is shorter than three bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [high, mid, low] = *bytes.first_chunk::<3>()?;
        Some(Self(u32::from_be_bytes([0, high, mid, low])))
    }

    /// The three payload bytes of a tempo event.
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, high, mid, low] = self.0.to_be_bytes();
        [high, mid, low]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }
}

#[test]
fn decodes_all_three_bytes() {
    use pretty_assertions::assert_eq;
    // 0x07A120: the middle and low byte both matter
    let tempo = Tempo::from_bytes(&[0x07, 0xA1, 0x20]).unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_ne!(tempo.micros_per_quarter_note(), 0x07A107);

    let tempo = Tempo::from_bytes(&[0x0F, 0x42, 0x40]).unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 1_000_000);
    assert_eq!(tempo.bpm(), 60.);
}

#[test]
fn short_payload_is_not_a_tempo() {
    assert_eq!(Tempo::from_bytes(&[0x07, 0xA1]), None);
}

#[test]
fn bpm_round_trip() {
    use pretty_assertions::assert_eq;
    let tempo = Tempo::from_bpm(90.);
    assert_eq!(tempo.micros_per_quarter_note(), 666_667);
    assert_eq!(tempo.to_bytes(), [0x0A, 0x2C, 0x2B]);
    assert_eq!(Tempo::from_bytes(&tempo.to_bytes()), Some(tempo));
}
