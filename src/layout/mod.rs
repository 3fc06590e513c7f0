//! # Layout Module
//!
//! Place a note sequence on the đàn tranh's open strings and render it as SVG
//! tablature.
//!
//! ## Purpose
//! The layout pass turns notes plus a tuning into:
//! 1. **Open strings** - the tuning's pitch classes repeated upward from the base pitch
//! 2. **Positioned notes** - X from cumulative duration, Y from pitch, string and bend status
//! 3. **Tablature SVG** - strings, notes, bend markers, fingering and lyrics
//!
//! ## Sub-modules
//! - `types` - OpenString, PositionedNote, TablatureLayout type definitions
//! - `engine` - String construction, note placement and the engine wrapper
//! - `fingering` - Right-hand finger suggestions per note
//!
//! ## Key Types
//! - [`TablatureLayout`] - Complete result of one layout pass (strings + notes + size)
//! - [`PositionedNote`] - Single note with coordinates, string and bend status
//! - [`TablatureLayoutEngine`] - Runs layouts and remembers the last one for overlays
//!
//! ## Example
//! ```rust
//! use tranh::{Note, TablatureLayoutEngine};
//!
//! let notes = vec![Note::parse("C4", 1.0), Note::parse("D4", 0.5), Note::parse("F4", 1.0)];
//! let engine = TablatureLayoutEngine::default();
//! let layout = engine.layout(&notes, "C-D-E-G-A")?;
//!
//! assert_eq!(layout.notes[0].x, 150.0);
//! assert_eq!(layout.notes[1].x, 235.0);
//! assert_eq!(layout.notes[2].x, 277.5);
//! assert!(layout.notes[2].is_bent); // F is not an open string
//! # Ok::<(), tranh::TranhError>(())
//! ```
//!
//! ## Coordinate System
//!
//! ### X (time)
//! - First note at `start_x` (150)
//! - Main notes advance `pixels_per_beat × duration` (85 px per beat)
//! - Grace notes advance `pixels_per_beat / 4` (21.25 px) whatever their duration
//! - Notes without a readable pitch take no space
//!
//! ### Y (pitch)
//! - `base_y` (100) at C3, 12.5 px per semitone upward
//! - A note on an open string shares that string's Y exactly
//! - A bent note sits between strings, at its own pitch
//!
//! ## String Assignment
//! ```text
//! string  1   2   3   4   5   6   7 ...  17
//! pitch   E3  G3  A3  C4  D4  E4  G4 ... G6     (C-D-E-G-A)
//! ```
//! Open-string notes use the same-class string nearest in octave. Bent notes
//! use the nearest string below, the one pressed to raise the pitch.

pub mod engine;
pub mod fingering;
pub mod types;


pub use engine::{open_strings, TablatureLayoutEngine};
pub use fingering::{calculate_fingering, Finger};
pub use types::{GraceType, OpenString, PositionedNote, TablatureLayout};
