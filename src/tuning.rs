//! # Tunings
//!
//! A tuning is the ordered set of pitch classes the open strings repeat across
//! the instrument's range. On the wire it is a hyphen-joined string
//! (`"C-D-E-G-A"`, `"C-Eb-F-G-Bb"`); internally it is parsed once into a
//! [`Tuning`] and never split again.
//!
//! ## Invariants
//! - At least one pitch class
//! - No two pitch classes sound the same (`D#` and `Eb` together is rejected)
//! - Order and spelling are preserved, so `to_string()` gives back the wire form
//!
//! ## Catalog
//! [`TuningCatalog`] names the known scales (Vietnamese modes first, then other
//! pentatonic, hexatonic and heptatonic scales). It supplies descriptions for
//! analysis results and the pentatonic set used for comparison views. A catalog
//! can also be loaded from YAML.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::TranhError;
use crate::pitch::PitchClass;

/// Candidates tried by [`crate::find_optimal_tuning`] when the caller gives none
pub const DEFAULT_CANDIDATES: [&str; 6] = [
    "C-D-E-G-A",
    "C-D-F-G-A",
    "C-D-E-G-B",
    "C-Eb-F-G-Bb",
    "D-F-G-A-C",
    "A-C-D-E-G",
];

/// Ordered, duplicate-free set of open-string pitch classes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuning {
    classes: Vec<PitchClass>,
}

impl Tuning {
    /// Parse a tuning string like "C-D-E-G-A".
    ///
    /// Octave digits on a token ("C4") are ignored, matching tunings stored
    /// with octave hints in older metadata.
    pub fn parse(s: &str) -> Result<Self, TranhError> {
        let invalid = |message: String| TranhError::InvalidTuning {
            tuning: s.to_string(),
            message,
        };

        if s.trim().is_empty() {
            return Err(invalid("tuning is empty".to_string()));
        }

        let mut classes = Vec::new();
        for (i, token) in s.split('-').enumerate() {
            let name = token.trim().trim_end_matches(|c: char| c.is_ascii_digit());
            if name.is_empty() {
                return Err(invalid(format!("empty pitch class at position {}", i + 1)));
            }
            let class = PitchClass::parse(name)
                .ok_or_else(|| invalid(format!("unknown pitch class '{}'", name)))?;
            classes.push(class);
        }

        Self::from_classes(classes).map_err(|e| match e {
            TranhError::InvalidTuning { message, .. } => invalid(message),
            other => other,
        })
    }

    /// Build a tuning from pitch classes, rejecting duplicates.
    pub fn from_classes(classes: Vec<PitchClass>) -> Result<Self, TranhError> {
        if classes.is_empty() {
            return Err(TranhError::InvalidTuning {
                tuning: String::new(),
                message: "tuning is empty".to_string(),
            });
        }
        for (i, class) in classes.iter().enumerate() {
            if let Some(prev) = classes[..i].iter().find(|c| c.same_class(class)) {
                let tuning = join_classes(&classes);
                return Err(TranhError::InvalidTuning {
                    tuning,
                    message: format!("duplicate pitch class '{}' (same as '{}')", class, prev),
                });
            }
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[PitchClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Octave-equivalent membership test
    pub fn contains(&self, class: &PitchClass) -> bool {
        self.contains_semitone(class.semitone())
    }

    pub fn contains_semitone(&self, semitone: u8) -> bool {
        self.classes.iter().any(|c| c.semitone() == semitone)
    }

    /// The tuning's own spelling of a pitch class, if it has one
    pub fn spelling_for(&self, semitone: u8) -> Option<PitchClass> {
        self.classes.iter().copied().find(|c| c.semitone() == semitone)
    }
}

fn join_classes(classes: &[PitchClass]) -> String {
    classes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_classes(&self.classes))
    }
}

impl FromStr for Tuning {
    type Err = TranhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tuning::parse(s)
    }
}

/// A named tuning in the catalog
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub tuning: String,
    pub description: String,
}

/// Known tunings with their display names, in preference order
#[derive(Debug, Clone, PartialEq)]
pub struct TuningCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for TuningCatalog {
    fn default() -> Self {
        let entries = [
            // Vietnamese
            ("C-D-E-G-A", "Dan Tranh Standard (C-D-E-G-A)"),
            ("C-D-F-G-A", "Dan Tranh Southern (C-D-F-G-A)"),
            ("C-D-E-G-B", "Dan Tranh Central (C-D-E-G-B)"),
            ("C-Eb-F-G-Bb", "Ru Con (C-Eb-F-G-Bb)"),
            ("D-F-G-A-C", "Nam Ai (D-F-G-A-C)"),
            ("D-E-F#-A-B", "Nam Xuan (D-E-F#-A-B)"),
            ("C-Eb-F-G-Ab", "Oan (C-Eb-F-G-Ab)"),
            // Common pentatonic
            ("A-C-D-E-G", "Minor Pentatonic (A-C-D-E-G)"),
            ("C-D-F-G-Bb", "Egyptian (C-D-F-G-Bb)"),
            ("D-E-G-A-C", "Chinese Shang (D-E-G-A-C)"),
            ("E-G-A-C-D", "Chinese Jue (E-G-A-C-D)"),
            ("G-A-C-D-E", "Chinese Zhi (G-A-C-D-E)"),
            ("C-D-Eb-G-Ab", "Japanese Hirajoshi (C-D-Eb-G-Ab)"),
            ("C-Db-F-Gb-Bb", "Japanese Iwato (C-Db-F-Gb-Bb)"),
            ("C-Db-F-G-Bb", "Japanese In-sen (C-Db-F-G-Bb)"),
            ("C-D-Eb-G-A", "Japanese Kumoi (C-D-Eb-G-A)"),
            // Hexatonic
            ("C-D-Eb-E-G-A", "Blues Major (C-D-Eb-E-G-A)"),
            ("C-Eb-F-Gb-G-Bb", "Blues Minor (C-Eb-F-Gb-G-Bb)"),
            ("C-D-E-F#-G#-A#", "Whole Tone (C-D-E-F#-G#-A#)"),
            ("C-D#-E-G-Ab-B", "Augmented (C-D#-E-G-Ab-B)"),
            // Heptatonic
            ("C-D-E-F-G-A-B", "Major (C-D-E-F-G-A-B)"),
            ("A-B-C-D-E-F-G", "Natural Minor (A-B-C-D-E-F-G)"),
            ("D-E-F-G-A-B-C", "Dorian (D-E-F-G-A-B-C)"),
            ("A-B-C-D-E-F-G#", "Harmonic Minor (A-B-C-D-E-F-G#)"),
        ];
        Self {
            entries: entries
                .iter()
                .map(|(tuning, description)| CatalogEntry {
                    tuning: tuning.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }
}

impl TuningCatalog {
    /// Build a catalog, validating every tuning string.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, TranhError> {
        for entry in &entries {
            Tuning::parse(&entry.tuning)?;
        }
        Ok(Self { entries })
    }

    /// Load a catalog from a YAML list of `{ tuning, description }` entries.
    pub fn from_yaml(source: &str) -> Result<Self, TranhError> {
        let entries: Vec<CatalogEntry> = serde_yaml::from_str(source)
            .map_err(|e| TranhError::ConfigError(format!("tuning catalog: {}", e)))?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn describe(&self, tuning: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.tuning == tuning)
            .map(|e| e.description.as_str())
    }

    /// Tuning strings with exactly `size` pitch classes, in catalog order
    pub fn tunings_of_size(&self, size: usize) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.tuning.split('-').count() == size)
            .map(|e| e.tuning.as_str())
            .collect()
    }

    pub fn pentatonic(&self) -> Vec<&str> {
        self.tunings_of_size(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_wire_form() {
        for s in ["C-D-E-G-A", "C-Eb-F-G-Bb", "D-E-F#-A-B", "C-D-Eb-E-G-A"] {
            assert_eq!(Tuning::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_parse_ignores_octave_digits() {
        let t = Tuning::parse("C4-D4-E4-G4-A4").unwrap();
        assert_eq!(t.to_string(), "C-D-E-G-A");
    }

    #[test]
    fn test_invalid_tunings() {
        assert!(Tuning::parse("").is_err());
        assert!(Tuning::parse("C--D").is_err());
        assert!(Tuning::parse("C-D-H").is_err());
        assert!(Tuning::parse("C D E G A").is_err());

        let err = Tuning::parse("C-D#-Eb-G").unwrap_err();
        match err {
            TranhError::InvalidTuning { tuning, message } => {
                assert_eq!(tuning, "C-D#-Eb-G");
                assert!(message.contains("duplicate"));
            }
            other => panic!("Expected InvalidTuning but got: {:?}", other),
        }
    }

    #[test]
    fn test_membership_is_enharmonic() {
        let t = Tuning::parse("C-Eb-F-G-Bb").unwrap();
        assert!(t.contains(&PitchClass::parse("D#").unwrap()));
        assert!(t.contains(&PitchClass::parse("A#").unwrap()));
        assert!(!t.contains(&PitchClass::parse("E").unwrap()));
        assert_eq!(t.spelling_for(3).unwrap().to_string(), "Eb");
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn test_catalog_descriptions() {
        let catalog = TuningCatalog::default();
        assert_eq!(catalog.describe("D-F-G-A-C"), Some("Nam Ai (D-F-G-A-C)"));
        assert_eq!(catalog.describe("C-D-E"), None);
        assert!(catalog.pentatonic().contains(&"C-D-E-G-A"));
        assert!(!catalog.pentatonic().contains(&"C-D-Eb-E-G-A"));
        for entry in catalog.entries() {
            assert!(Tuning::parse(&entry.tuning).is_ok(), "bad catalog entry {}", entry.tuning);
        }
    }

    #[test]
    fn test_catalog_from_yaml() {
        let source = r#"
- tuning: C-D-E-G-A
  description: Standard
- tuning: C-D-Eb-E-G-A
  description: Blues Major
"#;
        let catalog = TuningCatalog::from_yaml(source).unwrap();
        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.pentatonic(), vec!["C-D-E-G-A"]);

        let bad = "- tuning: C-X\n  description: Broken\n";
        assert!(matches!(
            TuningCatalog::from_yaml(bad),
            Err(TranhError::InvalidTuning { .. })
        ));
        assert!(matches!(
            TuningCatalog::from_yaml("not: [a list"),
            Err(TranhError::ConfigError(_))
        ));
    }
}
