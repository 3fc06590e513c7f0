//! Layout type definitions
//!
//! Output of one layout pass. These are plain values: a dependent renderer
//! (phrase boxes, glissando marks) takes a [`TablatureLayout`] by reference
//! and reads the exact coordinates the tablature used.

use serde::Serialize;

use crate::pitch::Pitch;

/// One physical string under the active tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenString {
    pub string_number: usize, // 1 = lowest pitch
    pub pitch: Pitch,
    pub y: f64,
}

/// Grace note kind, derived from its nominal duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraceType {
    #[serde(rename = "g16th")]
    Sixteenth,
    #[serde(rename = "g8th")]
    Eighth,
    #[serde(rename = "g-other")]
    Other,
}

impl GraceType {
    pub fn classify(duration: f64) -> Self {
        if duration <= 0.25 {
            GraceType::Sixteenth
        } else if duration <= 0.5 {
            GraceType::Eighth
        } else {
            GraceType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GraceType::Sixteenth => "g16th",
            GraceType::Eighth => "g8th",
            GraceType::Other => "g-other",
        }
    }
}

/// A note placed on the tablature
///
/// # Fields
/// - `index`: Position among rendered notes (SVG id `note_{index}`)
/// - `source_index`: Position in the input sequence, before unreadable notes were dropped
/// - `duration`: Effective duration in beats (missing or invalid durations read as 1)
/// - `advance`: X distance from this note to the next one
/// - `string_number`: Open string for this note; for bent notes, the string it is bent from
/// - `is_bent`: Pitch class is not in the tuning
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNote {
    pub index: usize,
    pub source_index: usize,
    pub pitch: Pitch,
    pub duration: f64,
    pub is_grace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_type: Option<GraceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
    pub string_number: usize,
    pub x: f64,
    pub y: f64,
    pub advance: f64,
    pub is_bent: bool,
}

impl PositionedNote {
    /// X where the next note starts
    pub fn end_x(&self) -> f64 {
        self.x + self.advance
    }
}

/// Result of one layout pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablatureLayout {
    pub tuning: String,
    pub strings: Vec<OpenString>,
    pub notes: Vec<PositionedNote>,
    pub source_note_count: usize, // Input length, dropped notes included
    pub width: u32,
    pub height: u32,
}

impl TablatureLayout {
    pub fn string(&self, string_number: usize) -> Option<&OpenString> {
        string_number
            .checked_sub(1)
            .and_then(|i| self.strings.get(i))
    }

    /// Nearest string sounding below the given Y (the string a bent note is pushed from)
    pub fn string_below(&self, y: f64) -> Option<&OpenString> {
        self.strings
            .iter()
            .filter(|s| s.y < y)
            .min_by(|a, b| (y - a.y).total_cmp(&(y - b.y)))
    }

    /// Positioned notes whose input positions fall within `first..=last`.
    ///
    /// Input positions count dropped notes, so spans written against the
    /// original sequence stay aligned. Returns None when the range is
    /// reversed, runs past the input, or holds only dropped notes.
    pub fn notes_in_source_range(&self, first: usize, last: usize) -> Option<&[PositionedNote]> {
        if first > last || last >= self.source_note_count {
            return None;
        }
        let start = self.notes.partition_point(|n| n.source_index < first);
        let end = self.notes.partition_point(|n| n.source_index <= last);
        (start < end).then(|| &self.notes[start..end])
    }

    /// Camel-case JSON for the template layer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
