//! # Layout Configuration
//!
//! Geometry constants for the tablature, with defaults matching the published
//! renders and optional overrides from a YAML file.
//!
//! ## YAML Keys
//! ```yaml
//! pixels-per-beat: 85      # X advance for a one-beat main note
//! grace-divisor: 4         # grace notes advance pixels-per-beat / grace-divisor
//! start-x: 150             # first note, right of the string labels
//! base-y: 100              # Y of C3
//! pixels-per-cent: 0.125   # 12.5 px per semitone
//! string-count: 17        # 1 to 60
//! base-pitch: E3           # lowest pitch considered for string 1 (octave 0 to 9)
//! height: 800
//! right-padding: 400
//! default-width: 2000      # width reported when nothing was laid out
//! resonance-length: 160
//! ```
//! Every key is optional; missing keys keep their default.

use serde::Deserialize;

use crate::error::TranhError;
use crate::pitch::{NoteName, Pitch, PitchClass};

/// Octaves accepted for `base-pitch`
pub const BASE_OCTAVES: std::ops::RangeInclusive<i8> = 0..=9;

/// Upper bound for `string-count`
pub const MAX_STRING_COUNT: usize = 60;

/// Geometry of one tablature render
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub pixels_per_beat: f64,
    pub grace_divisor: f64,
    pub start_x: f64,
    pub base_y: f64,
    pub pixels_per_cent: f64,
    pub string_count: usize,
    pub base_pitch: Pitch,
    pub height: u32,
    pub right_padding: f64,
    pub default_width: u32,
    pub resonance_length: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_beat: 85.0,
            grace_divisor: 4.0,
            start_x: 150.0,
            base_y: 100.0,
            pixels_per_cent: 0.125,
            string_count: 17,
            base_pitch: Pitch::new(PitchClass::new(NoteName::E, 0), 3),
            height: 800,
            right_padding: 400.0,
            default_width: 2000,
            resonance_length: 160.0,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawLayoutConfig {
    pub pixels_per_beat: Option<f64>,
    pub grace_divisor: Option<f64>,
    pub start_x: Option<f64>,
    pub base_y: Option<f64>,
    pub pixels_per_cent: Option<f64>,
    pub string_count: Option<usize>,
    pub base_pitch: Option<String>,
    pub height: Option<u32>,
    pub right_padding: Option<f64>,
    pub default_width: Option<u32>,
    pub resonance_length: Option<f64>,
}

fn positive(name: &str, value: f64) -> Result<f64, TranhError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TranhError::ConfigError(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

fn finite(name: &str, value: f64) -> Result<f64, TranhError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TranhError::ConfigError(format!("{} must be finite", name)))
    }
}

impl LayoutConfig {
    /// X advance after a grace note
    pub fn grace_spacing(&self) -> f64 {
        self.pixels_per_beat / self.grace_divisor
    }

    /// Y for a pitch: `base_y` at C3, `pixels_per_cent` per cent above it
    pub fn y_for(&self, pitch: &Pitch) -> f64 {
        let semitones_above_c3 = pitch.semitone_offset() + 12;
        self.base_y + semitones_above_c3 as f64 * 100.0 * self.pixels_per_cent
    }

    /// Apply overrides from a raw config on top of the defaults.
    pub fn from_raw(raw: RawLayoutConfig) -> Result<Self, TranhError> {
        let defaults = Self::default();

        let base_pitch = match raw.base_pitch {
            Some(s) => Pitch::parse(&s)
                .filter(|p| BASE_OCTAVES.contains(&p.octave))
                .ok_or_else(|| {
                    TranhError::ConfigError(format!(
                        "base-pitch '{}' is not a pitch like E3 (octave {} to {})",
                        s,
                        BASE_OCTAVES.start(),
                        BASE_OCTAVES.end()
                    ))
                })?,
            None => defaults.base_pitch,
        };

        let string_count = raw.string_count.unwrap_or(defaults.string_count);
        if !(1..=MAX_STRING_COUNT).contains(&string_count) {
            return Err(TranhError::ConfigError(format!(
                "string-count must be between 1 and {}, got {}",
                MAX_STRING_COUNT, string_count
            )));
        }

        Ok(Self {
            pixels_per_beat: positive(
                "pixels-per-beat",
                raw.pixels_per_beat.unwrap_or(defaults.pixels_per_beat),
            )?,
            grace_divisor: positive(
                "grace-divisor",
                raw.grace_divisor.unwrap_or(defaults.grace_divisor),
            )?,
            start_x: finite("start-x", raw.start_x.unwrap_or(defaults.start_x))?,
            base_y: finite("base-y", raw.base_y.unwrap_or(defaults.base_y))?,
            pixels_per_cent: positive(
                "pixels-per-cent",
                raw.pixels_per_cent.unwrap_or(defaults.pixels_per_cent),
            )?,
            string_count,
            base_pitch,
            height: raw.height.unwrap_or(defaults.height),
            right_padding: finite(
                "right-padding",
                raw.right_padding.unwrap_or(defaults.right_padding),
            )?,
            default_width: raw.default_width.unwrap_or(defaults.default_width),
            resonance_length: finite(
                "resonance-length",
                raw.resonance_length.unwrap_or(defaults.resonance_length),
            )?,
        })
    }

    /// Parse a YAML configuration. An empty document gives the defaults.
    pub fn from_yaml(source: &str) -> Result<Self, TranhError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawLayoutConfig = serde_yaml::from_str(source)
            .map_err(|e| TranhError::ConfigError(format!("layout config: {}", e)))?;
        Self::from_raw(raw)
    }
}
