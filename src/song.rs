//! # Song Input
//!
//! Note sequences as produced by the external MusicXML parser, and their
//! conversion into [`Note`] values for the optimizer and layout engine.
//!
//! ## Input Shape
//! ```yaml
//! metadata:
//!   title: Lý Cây Đa
//! notes:
//!   - { step: D, octave: 4, duration: 1 }
//!   - { step: E, alter: -1, octave: 4, duration: 0.5, lyric: "cây" }
//!   - { pitch: G4, duration: 0.25, isGrace: true }
//! ```
//!
//! Optional `phrases` and `sections` lists feed the phrase overlay.
//!
//! A note whose pitch cannot be read is kept with `pitch: None`; the optimizer
//! and the layout engine skip such notes instead of failing the whole song.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::error::TranhError;
use crate::overlay::{PhraseSpan, Section};
use crate::pitch::Pitch;

/// Raw note as handed over by the score parser (either pitch shape)
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub step: Option<String>,
    #[serde(default, deserialize_with = "lenient_octave")]
    pub octave: Option<i8>,
    #[serde(default, alias = "alteration", deserialize_with = "lenient_number")]
    pub alter: Option<f64>,
    pub pitch: Option<String>, // Combined form: "C4", "Eb5", "F#3"
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default, alias = "grace")]
    pub is_grace: bool,
    #[serde(alias = "lyricSyllable")]
    pub lyric: Option<String>,
}

/// Read a number written as a number or as a numeric string.
/// Anything else reads as missing.
fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Numeric note fields never fail the song: unusable values become `None`
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value).filter(|n| n.is_finite()))
}

/// Octaves accept `4`, `4.0` and `"4"`; fractional or out-of-range octaves become `None`
fn lenient_octave<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i8>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value)
        .filter(|n| n.fract() == 0.0 && *n >= i8::MIN as f64 && *n <= i8::MAX as f64)
        .map(|n| n as i8))
}

impl RawNote {
    /// Resolve the pitch: `{step, octave}` wins when both are present,
    /// otherwise the combined `pitch` string is parsed.
    pub fn resolve_pitch(&self) -> Option<Pitch> {
        if let (Some(step), Some(octave)) = (&self.step, self.octave) {
            return Pitch::from_step(step, octave, self.alter);
        }
        self.pitch.as_deref().and_then(Pitch::parse)
    }

    pub fn to_note(&self) -> Note {
        Note {
            pitch: self.resolve_pitch(),
            duration: self.duration.unwrap_or(1.0),
            is_grace: self.is_grace,
            lyric: self.lyric.clone(),
        }
    }
}

/// A single musical event, read-only after creation
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub pitch: Option<Pitch>, // None = unresolvable, skipped downstream
    pub duration: f64,        // Beats (1.0 = quarter note)
    pub is_grace: bool,
    pub lyric: Option<String>,
}

impl Note {
    pub fn new(pitch: Pitch, duration: f64) -> Self {
        Self {
            pitch: Some(pitch),
            duration,
            is_grace: false,
            lyric: None,
        }
    }

    pub fn grace(pitch: Pitch, duration: f64) -> Self {
        Self {
            is_grace: true,
            ..Self::new(pitch, duration)
        }
    }

    /// Build a main note from a pitch string; an unreadable string gives a
    /// note with no pitch rather than an error.
    pub fn parse(pitch: &str, duration: f64) -> Self {
        Self {
            pitch: Pitch::parse(pitch),
            duration,
            is_grace: false,
            lyric: None,
        }
    }

    pub fn with_lyric(mut self, lyric: &str) -> Self {
        self.lyric = Some(lyric.to_string());
        self
    }

    /// Duration used for spacing: missing, NaN or non-positive durations count as one beat
    pub fn effective_duration(&self) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            1.0
        }
    }
}

impl From<&RawNote> for Note {
    fn from(raw: &RawNote) -> Self {
        raw.to_note()
    }
}

/// Song-level metadata carried alongside the notes
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    pub title: Option<String>,
    pub tuning: Option<String>, // Stored tuning from earlier renders, if any
}

/// A parsed song: metadata plus raw notes
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SongData {
    #[serde(default)]
    pub metadata: SongMetadata,
    #[serde(default)]
    pub notes: Vec<RawNote>,
    #[serde(default)]
    pub phrases: Vec<PhraseSpan>, // Optional overlay annotations
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl SongData {
    /// Read a song from YAML (JSON is accepted as well)
    pub fn from_yaml(source: &str) -> Result<Self, TranhError> {
        serde_yaml::from_str(source).map_err(|e| TranhError::SongError(e.to_string()))
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.iter().map(Note::from).collect()
    }
}
