//! Tablature layout engine
//!
//! Turns a note sequence and a tuning into strings, coordinates and SVG.

use log::debug;

use super::types::{GraceType, OpenString, PositionedNote, TablatureLayout};
use crate::config::LayoutConfig;
use crate::error::TranhError;
use crate::pitch::Pitch;
use crate::song::Note;
use crate::svg;
use crate::tuning::Tuning;

/// Expand a tuning into the instrument's open strings.
///
/// Walks upward one semitone at a time from `config.base_pitch`, keeping every
/// pitch whose class is in the tuning, until `config.string_count` strings
/// exist. Strings are spelled the way the tuning spells them.
///
/// # Example
/// ```rust
/// use tranh::{open_strings, LayoutConfig, Tuning};
///
/// let tuning = Tuning::parse("C-D-E-G-A")?;
/// let strings = open_strings(&tuning, &LayoutConfig::default());
///
/// assert_eq!(strings.len(), 17);
/// assert_eq!(strings[0].pitch.to_string(), "E3");
/// assert_eq!(strings[3].pitch.to_string(), "C4");
/// assert_eq!(strings[16].pitch.to_string(), "G6");
/// # Ok::<(), tranh::TranhError>(())
/// ```
pub fn open_strings(tuning: &Tuning, config: &LayoutConfig) -> Vec<OpenString> {
    let mut strings = Vec::with_capacity(config.string_count);
    let mut offset = config.base_pitch.semitone_offset();

    // Terminates: a tuning always has at least one class
    while strings.len() < config.string_count {
        if let Some(class) = tuning.spelling_for(offset.rem_euclid(12) as u8) {
            let pitch = Pitch::with_class_at(class, offset);
            strings.push(OpenString {
                string_number: strings.len() + 1,
                pitch,
                y: config.y_for(&pitch),
            });
        }
        offset += 1;
    }

    strings
}

/// String closest in absolute pitch; ties go to the lower string
fn closest_string<'a>(
    strings: impl Iterator<Item = &'a OpenString>,
    target: i32,
) -> Option<&'a OpenString> {
    strings.min_by_key(|s| (s.pitch.semitone_offset() - target).abs())
}

/// Pick the string a note is played on.
///
/// Open-string notes take the same-class string nearest in octave. Bent notes
/// take the nearest string below them (the one pushed to reach the pitch),
/// or the nearest string overall when nothing lies below.
fn assign_string(strings: &[OpenString], pitch: &Pitch, is_bent: bool) -> usize {
    let target = pitch.semitone_offset();

    let chosen = if is_bent {
        strings
            .iter()
            .filter(|s| s.pitch.semitone_offset() < target)
            .max_by_key(|s| s.pitch.semitone_offset())
    } else {
        closest_string(
            strings.iter().filter(|s| s.pitch.class.same_class(&pitch.class)),
            target,
        )
    };

    chosen
        .or_else(|| closest_string(strings.iter(), target))
        .map(|s| s.string_number)
        .unwrap_or(1)
}

/// Generates tablature for one song at a time
///
/// The engine keeps the most recent layout so an overlay renderer working
/// from the same engine can align to it. Use one engine per song or request;
/// [`TablatureLayoutEngine::layout()`] returns the layout directly when no
/// cached state is wanted.
#[derive(Debug, Clone, Default)]
pub struct TablatureLayoutEngine {
    config: LayoutConfig,
    last: Option<TablatureLayout>,
}

impl TablatureLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out notes under a tuning string.
    ///
    /// # Errors
    /// Returns [`TranhError::InvalidTuning`] when the tuning cannot be parsed.
    /// Notes are never an error: a note without a readable pitch is dropped.
    pub fn layout(&self, notes: &[Note], tuning: &str) -> Result<TablatureLayout, TranhError> {
        let tuning = Tuning::parse(tuning)?;
        Ok(self.layout_with(notes, &tuning))
    }

    /// Lay out notes under an already parsed tuning.
    pub fn layout_with(&self, notes: &[Note], tuning: &Tuning) -> TablatureLayout {
        let config = &self.config;
        let strings = open_strings(tuning, config);

        let mut positioned = Vec::with_capacity(notes.len());
        let mut cursor = config.start_x;
        let mut dropped = 0;

        for (source_index, note) in notes.iter().enumerate() {
            let Some(pitch) = note.pitch else {
                dropped += 1;
                continue;
            };

            let duration = note.effective_duration();
            let advance = if note.is_grace {
                config.grace_spacing()
            } else {
                duration * config.pixels_per_beat
            };
            let is_bent = !tuning.contains(&pitch.class);

            positioned.push(PositionedNote {
                index: positioned.len(),
                source_index,
                pitch,
                duration,
                is_grace: note.is_grace,
                grace_type: note.is_grace.then(|| GraceType::classify(duration)),
                lyric: note.lyric.clone(),
                string_number: assign_string(&strings, &pitch, is_bent),
                x: cursor,
                y: config.y_for(&pitch),
                advance,
                is_bent,
            });

            cursor += advance;
        }

        if dropped > 0 {
            debug!("[Tablature] Skipped {} notes without a readable pitch", dropped);
        }

        let width = if positioned.is_empty() {
            config.default_width
        } else {
            (cursor + config.right_padding).max(0.0).ceil() as u32
        };

        debug!(
            "[Tablature] {} notes on {} strings ({}), width {}",
            positioned.len(),
            strings.len(),
            tuning,
            width
        );

        TablatureLayout {
            tuning: tuning.to_string(),
            strings,
            notes: positioned,
            source_note_count: notes.len(),
            width,
            height: config.height,
        }
    }

    /// Lay out and render a song, remembering the layout for later overlays.
    ///
    /// `show_bent_notes` controls whether bent-note indicators start visible.
    pub fn generate_svg(
        &mut self,
        notes: &[Note],
        tuning: &str,
        show_bent_notes: bool,
    ) -> Result<String, TranhError> {
        let layout = self.layout(notes, tuning)?;
        let markup = svg::render_tablature(&layout, &self.config, show_bent_notes);
        self.last = Some(layout);
        Ok(markup)
    }

    /// Positioned notes from the last [`generate_svg()`](Self::generate_svg) call
    pub fn last_generated_notes(&self) -> &[PositionedNote] {
        self.last.as_ref().map(|l| l.notes.as_slice()).unwrap_or(&[])
    }

    /// Width of the last render, or the configured default before any render
    pub fn last_generated_width(&self) -> u32 {
        self.last
            .as_ref()
            .map(|l| l.width)
            .unwrap_or(self.config.default_width)
    }

    pub fn last_layout(&self) -> Option<&TablatureLayout> {
        self.last.as_ref()
    }
}
