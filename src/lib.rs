//! # tranh
//!
//! Tuning selection and tablature layout for the đàn tranh (Vietnamese
//! 17-string zither).
//!
//! ## Pipeline
//! ```text
//! notes ─┬─> optimizer ──> tuning "C-D-E-G-A"
//!        │                     │
//!        └──────────────> layout engine ──> TablatureLayout ─┬─> SVG tablature
//!                                                            ├─> phrase overlay
//!                                                            └─> glissando candidates
//! ```
//!
//! ## Modules
//! - `pitch` - Pitch names, classes and absolute pitches
//! - `song` - Note input in either pitch shape, plus song files
//! - `tuning` - Tuning parsing and the catalog of named scales
//! - `optimizer` - Bent-note counting and tuning selection
//! - `layout` - Open strings, note placement and fingering
//! - `svg` - Tablature rendering
//! - `glissando` - Long-note statistics and glissando candidates
//! - `overlay` - Phrase and section boxes aligned to a layout
//! - `config` - Layout geometry and YAML overrides

pub mod config;
pub mod error;
pub mod glissando;
pub mod layout;
pub mod optimizer;
pub mod overlay;
pub mod pitch;
pub mod song;
pub mod svg;
pub mod tuning;

use log::info;
use serde::Serialize;

pub use config::LayoutConfig;
pub use error::TranhError;
pub use glissando::{duration_stats, find_glissando_candidates, DurationStats, GlissandoCandidate};
pub use layout::{
    calculate_fingering, open_strings, Finger, GraceType, OpenString, PositionedNote,
    TablatureLayout, TablatureLayoutEngine,
};
pub use optimizer::{
    analyze_all_tunings, calculate_frequency_based_tuning, calculate_frequency_based_tuning_of_size,
    count_bent_notes, count_bent_notes_in, find_optimal_tuning, find_optimal_tuning_with_catalog,
    pitch_distribution, PitchDistribution, TuningAnalysis, TuningResult,
};
pub use overlay::{render_overlay, PhraseSpan, Section};
pub use pitch::{Pitch, PitchClass};
pub use song::{Note, RawNote, SongData, SongMetadata};
pub use tuning::{Tuning, TuningCatalog, DEFAULT_CANDIDATES};

/// Everything produced for one song
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSong {
    pub tuning: String,
    pub analysis: TuningAnalysis,
    pub layout: TablatureLayout,
    #[serde(skip)]
    pub svg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>, // Present when the song has phrases
    pub glissando_candidates: Vec<GlissandoCandidate>,
}

impl RenderedSong {
    /// Pretty JSON of everything but the SVG markup
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Analyze and render a song.
///
/// The tuning is chosen in this order:
/// 1. `tuning` when given
/// 2. the tuning stored in the song's metadata
/// 3. the frequency-based result of [`analyze_all_tunings()`]
///
/// The analysis is always run so callers can compare it with the tuning used.
///
/// # Example
/// ```rust
/// use tranh::{render_song, LayoutConfig, SongData};
///
/// let song = SongData::from_yaml(r#"
/// notes:
///   - { pitch: C4, duration: 1 }
///   - { pitch: D4, duration: 1 }
///   - { pitch: F4, duration: 2 }
/// "#)?;
///
/// let rendered = render_song(&song, Some("C-D-E-G-A"), true, &LayoutConfig::default())?;
/// assert_eq!(rendered.tuning, "C-D-E-G-A");
/// assert!(rendered.layout.notes[2].is_bent);
/// assert!(rendered.svg.contains("note_2"));
/// # Ok::<(), tranh::TranhError>(())
/// ```
pub fn render_song(
    song: &SongData,
    tuning: Option<&str>,
    show_bent_notes: bool,
    config: &LayoutConfig,
) -> Result<RenderedSong, TranhError> {
    let notes = song.notes();
    let analysis = analyze_all_tunings(&notes, &TuningCatalog::default())?;

    let tuning = tuning
        .or(song.metadata.tuning.as_deref())
        .unwrap_or(analysis.optimal.as_str())
        .to_string();
    info!("[Tuning] Rendering with {}", tuning);

    let engine = TablatureLayoutEngine::new(config.clone());
    let layout = engine.layout(&notes, &tuning)?;
    let svg = svg::render_tablature(&layout, engine.config(), show_bent_notes);

    let overlay = if song.phrases.is_empty() {
        None
    } else {
        Some(render_overlay(&layout, &song.phrases, &song.sections))
    };
    let glissando_candidates = find_glissando_candidates(&layout);

    Ok(RenderedSong {
        tuning,
        analysis,
        layout,
        svg,
        overlay,
        glissando_candidates,
    })
}
