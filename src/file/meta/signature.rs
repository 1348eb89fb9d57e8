use core::fmt;

/// The `FF 58 04` time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// The beat unit as a power of two: 2 is a quarter note, 3 an eighth
    pub denominator_power: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per quarter note, normally 8
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// Decode the four payload bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [numerator, denominator_power, clocks_per_click, thirty_seconds_per_quarter] =
            *bytes.first_chunk::<4>()?;
        Some(Self {
            numerator,
            denominator_power,
            clocks_per_click,
            thirty_seconds_per_quarter,
        })
    }

    /// The beat unit, e.g. 8 for an eighth note.
    pub fn denominator(&self) -> u32 {
        1u32.checked_shl(self.denominator_power as u32).unwrap_or(0)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.numerator, self.denominator())
    }
}

const MAJOR_KEYS: [&str; 15] = [
    "C♭", "G♭", "D♭", "A♭", "E♭", "B♭", "F", "C", "G", "D", "A", "E", "B", "F♯", "C♯",
];
const MINOR_KEYS: [&str; 15] = [
    "A♭", "E♭", "B♭", "F", "C", "G", "D", "A", "E", "B", "F♯", "C♯", "G♯", "D♯", "A♯",
];

/// The `FF 59 02` key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    accidentals: i8,
    minor: bool,
}

impl KeySignature {
    /// A key with `accidentals` flats (negative) or sharps (positive).
    ///
    /// Returns `None` outside `-7..=7`.
    pub fn new(accidentals: i8, minor: bool) -> Option<Self> {
        (-7..=7)
            .contains(&accidentals)
            .then_some(Self { accidentals, minor })
    }

    /// Decode the two payload bytes.
    ///
    /// Returns `None` for more than seven sharps or flats.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [accidentals, mode] = *bytes.first_chunk::<2>()?;
        Self::new(accidentals as i8, mode != 0)
    }

    /// Negative for flats, positive for sharps
    pub const fn accidentals(&self) -> i8 {
        self.accidentals
    }

    /// Minor rather than major
    pub const fn is_minor(&self) -> bool {
        self.minor
    }

    /// The tonic, e.g. `E♭`.
    pub fn tonic(&self) -> &'static str {
        let keys = if self.minor { &MINOR_KEYS } else { &MAJOR_KEYS };
        usize::try_from(i16::from(self.accidentals) + 7)
            .ok()
            .and_then(|index| keys.get(index))
            .copied()
            .unwrap_or("?")
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.minor { "Minor" } else { "Major" };
        write!(f, "{} {mode}", self.tonic())
    }
}

#[test]
fn time_signature_display() {
    use pretty_assertions::assert_eq;
    let signature = TimeSignature::from_bytes(&[6, 3, 24, 8]).unwrap();
    assert_eq!(signature.denominator(), 8);
    assert_eq!(signature.to_string(), "6 / 8");
    assert_eq!(TimeSignature::from_bytes(&[4, 2, 24]), None);
}

#[test]
fn key_signature_display() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        KeySignature::from_bytes(&[0xFD, 0]).unwrap().to_string(),
        "E♭ Major"
    );
    assert_eq!(
        KeySignature::from_bytes(&[2, 1]).unwrap().to_string(),
        "B Minor"
    );
    assert_eq!(KeySignature::from_bytes(&[8, 0]), None);
}

#[test]
fn key_signature_range() {
    use pretty_assertions::assert_eq;
    assert_eq!(KeySignature::new(20, false), None);
    assert_eq!(KeySignature::new(i8::MIN, true), None);

    let key = KeySignature::new(7, false).unwrap();
    assert_eq!(key.accidentals(), 7);
    assert!(!key.is_minor());
    assert_eq!(key.tonic(), "C♯");
    assert_eq!(KeySignature::new(-7, true).unwrap().tonic(), "A♭");
}
