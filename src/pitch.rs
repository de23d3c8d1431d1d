//! # Pitch Module
//!
//! Note numbers, frequencies and human-readable pitch names.
//!
//! ## Note Numbers
//! - Note number 0 is C0; each step is one semitone
//! - Note 57 is A4, tuned to 440 Hz
//! - `freq = 440 * 2^((n - 57) / 12)`
//!
//! ## Spelling
//! The five black-key pitch classes (1, 3, 6, 8, 10) have two spellings. The
//! music key decides which one is used: `C, D, E, F♯, G♭, G, A, B` spell with
//! sharps, every other key spells with flats.
//!
//! Octave and pitch class use floored division, so note -1 is B-1, not an
//! out-of-range pitch class.
//!
//! ## Example
//! ```rust
//! use transcriber::pitch::{note_to_frequency, note_to_pitch_name, MusicKey};
//!
//! assert_eq!(note_to_frequency(57.0), 440.0);
//! assert_eq!(note_to_pitch_name(61, MusicKey::C).to_string(), "C♯5");
//! assert_eq!(note_to_pitch_name(61, MusicKey::F).to_string(), "D♭5");
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::GridError;

/// Reference pitch for A4.
pub const A4_FREQUENCY: f64 = 440.0;
/// Note number of A4.
pub const A4_NOTE: f64 = 57.0;

/// Convert a (possibly fractional) note number to a frequency in Hz.
pub fn note_to_frequency(note: f64) -> f64 {
    A4_FREQUENCY * 2f64.powf((note - A4_NOTE) / 12.0)
}

/// Convert a frequency in Hz to a fractional note number.
///
/// # Errors
/// Returns [`GridError::InvalidInput`] if `freq` is not a positive finite number.
pub fn frequency_to_note(freq: f64) -> Result<f64, GridError> {
    check_frequency(freq)?;
    Ok(12.0 * (freq / A4_FREQUENCY).log2() + A4_NOTE)
}

pub(crate) fn check_frequency(freq: f64) -> Result<(), GridError> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(GridError::InvalidInput(format!(
            "frequency must be positive, got {}",
            freq
        )));
    }
    Ok(())
}

/// Note letter (A-G)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    pub fn as_char(self) -> char {
        match self {
            NoteLetter::C => 'C',
            NoteLetter::D => 'D',
            NoteLetter::E => 'E',
            NoteLetter::F => 'F',
            NoteLetter::G => 'G',
            NoteLetter::A => 'A',
            NoteLetter::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    pub fn glyph(self) -> char {
        match self {
            Accidental::Sharp => '♯',
            Accidental::Flat => '♭',
        }
    }

    pub fn ascii(self) -> char {
        match self {
            Accidental::Sharp => '#',
            Accidental::Flat => 'b',
        }
    }
}

/// A spelled pitch: letter, optional accidental and octave.
///
/// Displays as e.g. `C♯4` or `B♭-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PitchName {
    pub letter: NoteLetter,
    pub accidental: Option<Accidental>,
    pub octave: i32,
}

impl PitchName {
    /// Pitch name without the octave, using `#`/`b` instead of the Unicode glyphs.
    pub fn ascii_name(&self) -> String {
        let mut name = self.letter.as_char().to_string();
        if let Some(acc) = self.accidental {
            name.push(acc.ascii());
        }
        name
    }

    /// Pitch name without the octave, using the Unicode glyphs.
    pub fn name(&self) -> String {
        let mut name = self.letter.as_char().to_string();
        if let Some(acc) = self.accidental {
            name.push(acc.glyph());
        }
        name
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave)
    }
}

/// The music keys offered for labelling the pitch axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicKey {
    #[default]
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

impl MusicKey {
    pub const ALL: [MusicKey; 17] = [
        MusicKey::C,
        MusicKey::CSharp,
        MusicKey::DFlat,
        MusicKey::D,
        MusicKey::DSharp,
        MusicKey::EFlat,
        MusicKey::E,
        MusicKey::F,
        MusicKey::FSharp,
        MusicKey::GFlat,
        MusicKey::G,
        MusicKey::GSharp,
        MusicKey::AFlat,
        MusicKey::A,
        MusicKey::ASharp,
        MusicKey::BFlat,
        MusicKey::B,
    ];

    /// Parse a key name like "C", "F♯", "F#", "B♭" or "Bb".
    pub fn parse(s: &str) -> Option<Self> {
        let key = match s.trim() {
            "C" => MusicKey::C,
            "C♯" | "C#" => MusicKey::CSharp,
            "D♭" | "Db" => MusicKey::DFlat,
            "D" => MusicKey::D,
            "D♯" | "D#" => MusicKey::DSharp,
            "E♭" | "Eb" => MusicKey::EFlat,
            "E" => MusicKey::E,
            "F" => MusicKey::F,
            "F♯" | "F#" => MusicKey::FSharp,
            "G♭" | "Gb" => MusicKey::GFlat,
            "G" => MusicKey::G,
            "G♯" | "G#" => MusicKey::GSharp,
            "A♭" | "Ab" => MusicKey::AFlat,
            "A" => MusicKey::A,
            "A♯" | "A#" => MusicKey::ASharp,
            "B♭" | "Bb" => MusicKey::BFlat,
            "B" => MusicKey::B,
            _ => return None,
        };
        Some(key)
    }

    /// Canonical name, as stored in the settings payload.
    pub fn as_str(self) -> &'static str {
        match self {
            MusicKey::C => "C",
            MusicKey::CSharp => "C♯",
            MusicKey::DFlat => "D♭",
            MusicKey::D => "D",
            MusicKey::DSharp => "D♯",
            MusicKey::EFlat => "E♭",
            MusicKey::E => "E",
            MusicKey::F => "F",
            MusicKey::FSharp => "F♯",
            MusicKey::GFlat => "G♭",
            MusicKey::G => "G",
            MusicKey::GSharp => "G♯",
            MusicKey::AFlat => "A♭",
            MusicKey::A => "A",
            MusicKey::ASharp => "A♯",
            MusicKey::BFlat => "B♭",
            MusicKey::B => "B",
        }
    }

    /// Whether ambiguous pitches are spelled with sharps in this key.
    pub fn prefers_sharps(self) -> bool {
        matches!(
            self,
            MusicKey::C
                | MusicKey::D
                | MusicKey::E
                | MusicKey::FSharp
                | MusicKey::GFlat
                | MusicKey::G
                | MusicKey::A
                | MusicKey::B
        )
    }
}

impl fmt::Display for MusicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spell a note number in the given key.
pub fn note_to_pitch_name(note: i32, key: MusicKey) -> PitchName {
    let octave = note.div_euclid(12);
    let prefer_sharp = key.prefers_sharps();

    // 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
    let (letter, accidental) = match note.rem_euclid(12) {
        0 => (NoteLetter::C, None),
        1 => black_key(prefer_sharp, NoteLetter::C, NoteLetter::D),
        2 => (NoteLetter::D, None),
        3 => black_key(prefer_sharp, NoteLetter::D, NoteLetter::E),
        4 => (NoteLetter::E, None),
        5 => (NoteLetter::F, None),
        6 => black_key(prefer_sharp, NoteLetter::F, NoteLetter::G),
        7 => (NoteLetter::G, None),
        8 => black_key(prefer_sharp, NoteLetter::G, NoteLetter::A),
        9 => (NoteLetter::A, None),
        10 => black_key(prefer_sharp, NoteLetter::A, NoteLetter::B),
        11 => (NoteLetter::B, None),
        _ => unreachable!(),
    };

    PitchName {
        letter,
        accidental,
        octave,
    }
}

fn black_key(
    prefer_sharp: bool,
    below: NoteLetter,
    above: NoteLetter,
) -> (NoteLetter, Option<Accidental>) {
    if prefer_sharp {
        (below, Some(Accidental::Sharp))
    } else {
        (above, Some(Accidental::Flat))
    }
}
