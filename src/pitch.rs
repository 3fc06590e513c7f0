//! # Pitch Types
//!
//! Pitch names, pitch classes and absolute pitches, plus the one conversion
//! boundary that reads the two pitch shapes produced by the score parser.
//!
//! ## Pitch Shapes
//! ```text
//! { step: "E", alter: -1, octave: 4 }   -> Eb4
//! { step: "Eb", octave: 4 }             -> Eb4  (accidental folded into step)
//! { pitch: "Eb4" }                      -> Eb4
//! ```
//!
//! ## Semitone Reference
//! - All absolute comparisons use semitones relative to **C4** (`C4 = 0`, `B3 = -1`)
//! - Pitch classes reduce that value modulo 12, so `D#` and `Eb` are the same class
//! - Spelling is preserved for display: a tuning written with `Eb` labels its
//!   strings `Eb`, never `D#`

use serde::{Serialize, Serializer};
use std::fmt;

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteName {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    /// Semitones above C for the natural note
    pub fn semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::D => "D",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::G => "G",
            NoteName::A => "A",
            NoteName::B => "B",
        }
    }
}

/// Parse an accidental suffix: `#`, `b`, `x`, `##`, `bb`.
/// Returns the alteration in semitones, or None for anything else.
fn parse_accidentals(s: &str) -> Option<i8> {
    match s {
        "" => Some(0),
        "#" => Some(1),
        "##" | "x" => Some(2),
        "b" => Some(-1),
        "bb" => Some(-2),
        _ => None,
    }
}

/// A spelled pitch name independent of octave (e.g. `C`, `Eb`, `F#`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PitchClass {
    pub name: NoteName,
    pub alter: i8, // -2 to +2
}

impl PitchClass {
    pub fn new(name: NoteName, alter: i8) -> Self {
        Self { name, alter }
    }

    /// Parse a pitch class like "C", "Eb", "F#", "Bbb" or "Cx".
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let name = NoteName::from_char(chars.next()?)?;
        let alter = parse_accidentals(chars.as_str())?;
        Some(Self { name, alter })
    }

    /// Semitones above C before octave reduction (`Cb` = -1, `B#` = 12)
    pub fn raw_semitone(&self) -> i32 {
        self.name.semitone() + self.alter as i32
    }

    /// Octave-equivalent class in 0..12
    pub fn semitone(&self) -> u8 {
        self.raw_semitone().rem_euclid(12) as u8
    }

    /// True when both spellings sound the same class (`D#` and `Eb`)
    pub fn same_class(&self, other: &PitchClass) -> bool {
        self.semitone() == other.semitone()
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())?;
        let accidental = match self.alter {
            -2 => "bb",
            -1 => "b",
            1 => "#",
            2 => "##",
            _ => "",
        };
        f.write_str(accidental)
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An absolute pitch: pitch class plus scientific octave (C4 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: i8,
}

impl Pitch {
    pub fn new(class: PitchClass, octave: i8) -> Self {
        Self { class, octave }
    }

    /// Parse a combined pitch string like "C4", "Eb5" or "F#3".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits_at = s.find(|c: char| c.is_ascii_digit())?;
        let class = PitchClass::parse(&s[..digits_at])?;
        let octave_str = &s[digits_at..];
        if !octave_str.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let octave = octave_str.parse::<i8>().ok()?;
        Some(Self { class, octave })
    }

    /// Build a pitch from a MusicXML-style step, octave and optional alter.
    ///
    /// The step may already carry its accidental ("Eb"); an explicit `alter`
    /// is added on top. Fractional (microtonal) alters round to the nearest
    /// semitone. Non-finite alters, and alters that cannot land within a
    /// double sharp or flat, make the pitch unresolvable.
    pub fn from_step(step: &str, octave: i8, alter: Option<f64>) -> Option<Self> {
        let mut class = PitchClass::parse(step)?;
        if let Some(alter) = alter {
            let shift = alter.round();
            // Step carries at most two accidentals, so |shift| > 4 never resolves
            if !shift.is_finite() || shift.abs() > 4.0 {
                return None;
            }
            let total = class.alter as i32 + shift as i32;
            if total.abs() > 2 {
                return None;
            }
            class.alter = total as i8;
        }
        Some(Self { class, octave })
    }

    /// Spell the pitch `offset` semitones from C4 using the given class.
    ///
    /// The caller guarantees `offset` belongs to `class` (same value mod 12);
    /// the octave is chosen so the spelling is correct (`Cb` at -1 is `Cb4`).
    pub fn with_class_at(class: PitchClass, offset: i32) -> Self {
        let octave = 4 + (offset - class.raw_semitone()).div_euclid(12);
        Self {
            class,
            octave: octave as i8,
        }
    }

    /// Semitones relative to C4
    pub fn semitone_offset(&self) -> i32 {
        self.class.raw_semitone() + (self.octave as i32 - 4) * 12
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pitch_class() {
        assert_eq!(PitchClass::parse("C"), Some(PitchClass::new(NoteName::C, 0)));
        assert_eq!(PitchClass::parse("Eb"), Some(PitchClass::new(NoteName::E, -1)));
        assert_eq!(PitchClass::parse("F#"), Some(PitchClass::new(NoteName::F, 1)));
        assert_eq!(PitchClass::parse("Cx"), Some(PitchClass::new(NoteName::C, 2)));
        assert_eq!(PitchClass::parse("Bbb"), Some(PitchClass::new(NoteName::B, -2)));
        assert_eq!(PitchClass::parse("H"), None);
        assert_eq!(PitchClass::parse(""), None);
        assert_eq!(PitchClass::parse("C#b#b#"), None);
    }

    #[test]
    fn test_enharmonic_classes_match() {
        let d_sharp = PitchClass::parse("D#").unwrap();
        let e_flat = PitchClass::parse("Eb").unwrap();
        assert!(d_sharp.same_class(&e_flat));
        assert_eq!(PitchClass::parse("Cb").unwrap().semitone(), 11);
        assert_eq!(PitchClass::parse("B#").unwrap().semitone(), 0);
    }

    #[test]
    fn test_parse_pitch_string() {
        let p = Pitch::parse("Eb5").unwrap();
        assert_eq!(p.class, PitchClass::new(NoteName::E, -1));
        assert_eq!(p.octave, 5);
        assert_eq!(Pitch::parse("F#3").unwrap().to_string(), "F#3");
        assert!(Pitch::parse("C").is_none());
        assert!(Pitch::parse("4").is_none());
        assert!(Pitch::parse("C4x").is_none());
        assert!(Pitch::parse("rest").is_none());
    }

    #[test]
    fn test_semitone_offset_relative_to_c4() {
        assert_eq!(Pitch::parse("C4").unwrap().semitone_offset(), 0);
        assert_eq!(Pitch::parse("A4").unwrap().semitone_offset(), 9);
        assert_eq!(Pitch::parse("E3").unwrap().semitone_offset(), -8);
        assert_eq!(Pitch::parse("C5").unwrap().semitone_offset(), 12);
        assert_eq!(Pitch::parse("Cb4").unwrap().semitone_offset(), -1);
    }

    #[test]
    fn test_from_step_with_alter() {
        let p = Pitch::from_step("E", 4, Some(-1.0)).unwrap();
        assert_eq!(p.to_string(), "Eb4");
        let folded = Pitch::from_step("Eb", 4, None).unwrap();
        assert_eq!(folded, p);
        assert!(Pitch::from_step("E", 4, Some(f64::NAN)).is_none());
        assert!(Pitch::from_step("", 4, None).is_none());
    }

    #[test]
    fn test_from_step_rejects_huge_alter() {
        assert!(Pitch::from_step("F#", 4, Some(1e20)).is_none());
        assert!(Pitch::from_step("Bb", 4, Some(-1e20)).is_none());
        assert!(Pitch::from_step("C", 4, Some(f64::MAX)).is_none());
        assert!(Pitch::from_step("C", 4, Some(3.0)).is_none());
        // Opposite accidentals cancel within range
        assert_eq!(Pitch::from_step("F##", 4, Some(-4.0)).unwrap().to_string(), "Fbb4");
    }

    #[test]
    fn test_with_class_at_spells_octave() {
        let cb = PitchClass::parse("Cb").unwrap();
        let p = Pitch::with_class_at(cb, -1);
        assert_eq!(p.to_string(), "Cb4");
        assert_eq!(p.semitone_offset(), -1);

        let e = PitchClass::parse("E").unwrap();
        assert_eq!(Pitch::with_class_at(e, -8).to_string(), "E3");
    }
}
