//! # Glissando Candidates
//!
//! Long main notes are where a player slides into the next note. This module
//! measures note lengths across a laid-out song and picks the notes that are
//! clearly longer than the song's usual note.
//!
//! ## Threshold
//! ```text
//! threshold = max(1.5, 1.5 × mode)     mode = most common main-note duration
//! ```
//! A candidate also needs a following main note to slide to. Candidates come
//! back longest first; equal durations keep song order.
//!
//! Grace notes take no part in the statistics or the candidate list.

use log::debug;
use serde::Serialize;

use crate::layout::{PositionedNote, TablatureLayout};
use crate::pitch::Pitch;

/// Minimum duration in beats for any glissando
pub const MIN_GLISSANDO_BEATS: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationCount {
    pub duration: f64,
    pub count: usize,
}

/// Duration statistics over the main notes of a song
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationStats {
    pub mode: f64, // Most common duration; ties go to the one heard first
    pub mean: f64,
    pub percentile_80: f64,
    pub distribution: Vec<DurationCount>, // In order of first appearance
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlissandoCandidate {
    pub note_index: usize,
    pub pitch: Pitch,
    pub string_number: usize,
    pub duration: f64,
    pub lyric: String,
}

fn main_notes(layout: &TablatureLayout) -> Vec<&PositionedNote> {
    layout.notes.iter().filter(|n| !n.is_grace).collect()
}

/// Statistics for the main notes, or None when the song has none
pub fn duration_stats(layout: &TablatureLayout) -> Option<DurationStats> {
    let durations: Vec<f64> = main_notes(layout).iter().map(|n| n.duration).collect();
    if durations.is_empty() {
        return None;
    }

    let mut distribution: Vec<DurationCount> = Vec::new();
    for &duration in &durations {
        match distribution.iter_mut().find(|d| d.duration == duration) {
            Some(entry) => entry.count += 1,
            None => distribution.push(DurationCount { duration, count: 1 }),
        }
    }

    // First maximum wins
    let mode = distribution
        .iter()
        .fold(None::<&DurationCount>, |best, d| match best {
            Some(b) if b.count >= d.count => Some(b),
            _ => Some(d),
        })
        .map(|d| d.duration)
        .unwrap_or(1.0);

    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    let mut sorted = durations.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = ((sorted.len() as f64 * 0.8).floor() as usize).min(sorted.len() - 1);

    Some(DurationStats {
        mode,
        mean,
        percentile_80: sorted[rank],
        distribution,
    })
}

/// Duration a note must reach to be a candidate
pub fn glissando_threshold(stats: &DurationStats) -> f64 {
    MIN_GLISSANDO_BEATS.max(stats.mode * 1.5)
}

/// Long main notes followed by another main note, longest first.
///
/// # Example
/// ```rust
/// use tranh::{find_glissando_candidates, Note, TablatureLayoutEngine};
///
/// let notes = vec![
///     Note::parse("C4", 1.0),
///     Note::parse("D4", 2.0),
///     Note::parse("E4", 1.0),
///     Note::parse("G4", 3.0),
/// ];
/// let layout = TablatureLayoutEngine::default().layout(&notes, "C-D-E-G-A")?;
/// let candidates = find_glissando_candidates(&layout);
///
/// // G4 is the longest, but nothing follows it
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(candidates[0].pitch.to_string(), "D4");
/// # Ok::<(), tranh::TranhError>(())
/// ```
pub fn find_glissando_candidates(layout: &TablatureLayout) -> Vec<GlissandoCandidate> {
    let Some(stats) = duration_stats(layout) else {
        return Vec::new();
    };
    let threshold = glissando_threshold(&stats);
    let mains = main_notes(layout);

    let mut candidates: Vec<GlissandoCandidate> = mains
        .iter()
        .enumerate()
        .filter(|(i, n)| n.duration >= threshold && i + 1 < mains.len())
        .map(|(_, n)| GlissandoCandidate {
            note_index: n.index,
            pitch: n.pitch,
            string_number: n.string_number,
            duration: n.duration,
            lyric: n.lyric.clone().unwrap_or_default(),
        })
        .collect();

    // Stable: equal durations stay in song order
    candidates.sort_by(|a, b| b.duration.total_cmp(&a.duration));

    debug!(
        "[Glissando] {} candidates (threshold: {} beats)",
        candidates.len(),
        threshold
    );
    candidates
}
