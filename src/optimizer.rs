//! # Tuning Optimizer
//!
//! Decides which open-string pitch set a song should be played in.
//!
//! ## Strategies
//! Two strategies exist side by side and can disagree on the same song:
//!
//! ### Candidate matching
//! [`find_optimal_tuning()`] scores a list of known scales by how many notes
//! would have to be bent, and keeps the lowest. Ties go to the scale listed
//! first, so the candidate order is part of the contract.
//!
//! ### Frequency
//! [`calculate_frequency_based_tuning()`] takes the five most used pitch classes
//! of the song and sorts them alphabetically. [`analyze_all_tunings()`] prefers
//! this result and reports the candidate scales next to it for comparison.
//!
//! ## Counting Rules
//! - Grace notes are ornaments and never count
//! - Notes without a readable pitch are skipped, never an error
//! - Pitch classes compare modulo 12: `C3` and `C5` are both covered by a `C` string
//! - A bent pitch class counts once per occurrence, not once per class
//!
//! ## Example
//! ```rust
//! use tranh::{find_optimal_tuning, Note};
//!
//! let notes: Vec<Note> = ["C4", "D4", "E4", "G4", "A4"]
//!     .iter()
//!     .map(|p| Note::parse(p, 1.0))
//!     .collect();
//!
//! let analysis = find_optimal_tuning(&notes, None)?;
//! assert_eq!(analysis.optimal, "C-D-E-G-A");
//! assert_eq!(analysis.bent_notes, 0);
//! # Ok::<(), tranh::TranhError>(())
//! ```

use log::{debug, info};
use serde::Serialize;

use crate::error::TranhError;
use crate::pitch::{Pitch, PitchClass};
use crate::song::Note;
use crate::tuning::{Tuning, TuningCatalog, DEFAULT_CANDIDATES};

/// Bent-note count for one candidate tuning
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningResult {
    pub tuning: String,
    pub bent_count: usize,
}

/// Outcome of a tuning search
///
/// `all_results` is sorted ascending by bent count; equal counts keep the
/// order in which the tunings were evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningAnalysis {
    pub optimal: String,
    pub bent_notes: usize,
    pub all_results: Vec<TuningResult>,
    pub description: String,
}

impl TuningAnalysis {
    /// Best result whose tuning differs from the optimal one
    pub fn next_best_alternative(&self) -> Option<&TuningResult> {
        self.all_results.iter().find(|r| r.tuning != self.optimal)
    }
}

/// Main notes with a readable pitch
fn counted_pitches(notes: &[Note]) -> impl Iterator<Item = &Pitch> {
    notes
        .iter()
        .filter(|n| !n.is_grace)
        .filter_map(|n| n.pitch.as_ref())
}

/// Occurrences per pitch class (index = semitone above C)
fn class_histogram(notes: &[Note]) -> [usize; 12] {
    let mut histogram = [0; 12];
    for pitch in counted_pitches(notes) {
        histogram[pitch.class.semitone() as usize] += 1;
    }
    histogram
}

/// Count bent notes against an already parsed tuning.
pub fn count_bent_notes_in(notes: &[Note], tuning: &Tuning) -> usize {
    class_histogram(notes)
        .iter()
        .enumerate()
        .filter(|(semitone, _)| !tuning.contains_semitone(*semitone as u8))
        .map(|(_, count)| count)
        .sum()
}

/// Count how many notes of the song fall outside the tuning.
///
/// # Errors
/// Returns [`TranhError::InvalidTuning`] when `tuning` cannot be parsed.
pub fn count_bent_notes(notes: &[Note], tuning: &str) -> Result<usize, TranhError> {
    let tuning = Tuning::parse(tuning)?;
    Ok(count_bent_notes_in(notes, &tuning))
}

/// Find the candidate tuning with the fewest bent notes.
///
/// Uses [`DEFAULT_CANDIDATES`] when `candidates` is `None`. An empty song
/// yields the first candidate with zero bent notes.
///
/// # Errors
/// Returns [`TranhError::InvalidTuning`] if any candidate is malformed and
/// [`TranhError::EmptyCandidates`] if the list is empty.
pub fn find_optimal_tuning(
    notes: &[Note],
    candidates: Option<&[&str]>,
) -> Result<TuningAnalysis, TranhError> {
    find_optimal_tuning_with_catalog(notes, candidates, &TuningCatalog::default())
}

/// [`find_optimal_tuning()`] with descriptions taken from a custom catalog.
pub fn find_optimal_tuning_with_catalog(
    notes: &[Note],
    candidates: Option<&[&str]>,
    catalog: &TuningCatalog,
) -> Result<TuningAnalysis, TranhError> {
    let candidates = candidates.unwrap_or(&DEFAULT_CANDIDATES[..]);
    if candidates.is_empty() {
        return Err(TranhError::EmptyCandidates);
    }

    let mut best: Option<(&str, usize)> = None;
    let mut results = Vec::with_capacity(candidates.len());

    for &candidate in candidates {
        let bent_count = count_bent_notes(notes, candidate)?;
        results.push(TuningResult {
            tuning: candidate.to_string(),
            bent_count,
        });

        // Strictly lower only: earlier candidates win ties
        if best.map_or(true, |(_, lowest)| bent_count < lowest) {
            best = Some((candidate, bent_count));
        }
    }

    results.sort_by_key(|r| r.bent_count);

    let (optimal, bent_notes) = best.ok_or(TranhError::EmptyCandidates)?;
    debug!(
        "[Tuning] Best of {} candidates: {} ({} bent)",
        candidates.len(),
        optimal,
        bent_notes
    );

    Ok(TuningAnalysis {
        optimal: optimal.to_string(),
        bent_notes,
        all_results: results,
        description: catalog
            .describe(optimal)
            .unwrap_or(optimal)
            .to_string(),
    })
}

/// Pitch class with its occurrence count, spelled as first seen in the song
#[derive(Debug, Clone, Copy)]
struct ClassCount {
    class: PitchClass,
    count: usize,
}

/// Pitch class counts in order of first appearance.
/// Enharmonic spellings (`D#`, `Eb`) merge under the first spelling seen.
fn class_counts(notes: &[Note]) -> Vec<ClassCount> {
    let mut counts: Vec<ClassCount> = Vec::new();
    for pitch in counted_pitches(notes) {
        match counts.iter_mut().find(|c| c.class.same_class(&pitch.class)) {
            Some(entry) => entry.count += 1,
            None => counts.push(ClassCount {
                class: pitch.class,
                count: 1,
            }),
        }
    }
    counts
}

/// Class counts sorted by frequency, most used first (ties keep first appearance)
fn ranked_class_counts(notes: &[Note]) -> Vec<ClassCount> {
    let mut counts = class_counts(notes);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Derive a tuning from the `size` most frequent pitch classes.
///
/// The chosen classes are sorted alphabetically by spelled name (not by
/// pitch height). Songs with fewer distinct classes return all of them; a
/// song with no countable notes returns an empty string.
pub fn calculate_frequency_based_tuning_of_size(notes: &[Note], size: usize) -> String {
    let mut top: Vec<String> = ranked_class_counts(notes)
        .iter()
        .take(size)
        .map(|c| c.class.to_string())
        .collect();
    top.sort();
    top.join("-")
}

/// Derive a five-note tuning from the most frequent pitch classes.
///
/// # Example
/// ```rust
/// use tranh::{calculate_frequency_based_tuning, Note};
///
/// let mut notes = Vec::new();
/// for (pitch, times) in [("C4", 10), ("A4", 8), ("D4", 5), ("G4", 3), ("F4", 2)] {
///     notes.extend(std::iter::repeat(Note::parse(pitch, 1.0)).take(times));
/// }
/// assert_eq!(calculate_frequency_based_tuning(&notes), "A-C-D-F-G");
/// ```
pub fn calculate_frequency_based_tuning(notes: &[Note]) -> String {
    calculate_frequency_based_tuning_of_size(notes, 5)
}

/// Frequency tuning compared against every five-note catalog tuning.
///
/// The frequency tuning is always preferred; `all_results` lists it together
/// with the catalog results. A song with no countable notes gets the
/// catalog comparison result unchanged, or the default candidates' result
/// when the catalog has no five-note tunings.
pub fn analyze_all_tunings(
    notes: &[Note],
    catalog: &TuningCatalog,
) -> Result<TuningAnalysis, TranhError> {
    let pentatonic = catalog.pentatonic();
    let comparison = if pentatonic.is_empty() {
        debug!("[Tuning] Catalog has no five-note tunings to compare");
        None
    } else {
        Some(find_optimal_tuning_with_catalog(notes, Some(pentatonic.as_slice()), catalog)?)
    };

    let frequency_tuning = calculate_frequency_based_tuning(notes);
    if frequency_tuning.is_empty() {
        return match comparison {
            Some(comparison) => Ok(comparison),
            None => find_optimal_tuning_with_catalog(notes, None, catalog),
        };
    }
    let frequency_bent = count_bent_notes(notes, &frequency_tuning)?;

    info!(
        "[Tuning] Frequency-based (top 5): {} ({} bent)",
        frequency_tuning, frequency_bent
    );

    let mut all_results = vec![TuningResult {
        tuning: frequency_tuning.clone(),
        bent_count: frequency_bent,
    }];
    if let Some(comparison) = comparison {
        info!(
            "[Tuning] Best pre-defined: {} ({} bent)",
            comparison.optimal, comparison.bent_notes
        );
        all_results.extend(comparison.all_results);
    }
    all_results.sort_by_key(|r| r.bent_count);

    Ok(TuningAnalysis {
        description: format!("Frequency-based ({})", frequency_tuning),
        optimal: frequency_tuning,
        bent_notes: frequency_bent,
        all_results,
    })
}

/// Share of one pitch class among the song's main notes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchClassFrequency {
    pub pitch_class: String,
    pub count: usize,
    pub percentage: f64,
}

/// Pitch class distribution of a song with pentatonic and hexatonic suggestions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDistribution {
    pub total_notes: usize,
    pub classes: Vec<PitchClassFrequency>,
    pub pentatonic: String,
    pub hexatonic: String,
}

/// Count pitch classes of the main notes, most frequent first.
pub fn pitch_distribution(notes: &[Note]) -> PitchDistribution {
    let total_notes = counted_pitches(notes).count();
    let classes = ranked_class_counts(notes)
        .iter()
        .map(|c| PitchClassFrequency {
            pitch_class: c.class.to_string(),
            count: c.count,
            percentage: if total_notes == 0 {
                0.0
            } else {
                c.count as f64 * 100.0 / total_notes as f64
            },
        })
        .collect();

    PitchDistribution {
        total_notes,
        classes,
        pentatonic: calculate_frequency_based_tuning_of_size(notes, 5),
        hexatonic: calculate_frequency_based_tuning_of_size(notes, 6),
    }
}
