//! # Phrase Overlay
//!
//! Phrase and section boxes drawn over the tablature. Spans are given as
//! positions in the input note sequence (dropped notes included) and aligned
//! to a [`TablatureLayout`], so the boxes land on exactly the coordinates the
//! tablature used.
//!
//! ```text
//!  start_x                         end_x = last note x + its advance
//!     |<------------- width ------------->|
//!     [ note  note  note ...        note  ]
//!                  center_x
//! ```
//!
//! Sections group consecutive phrases and span from their first phrase's
//! start to their last phrase's end.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::layout::TablatureLayout;
use crate::svg::escape_xml;

/// Phrase text longer than this is cut and marked with "..."
const PHRASE_TEXT_LIMIT: usize = 30;

/// A phrase given by the input positions of its first and last note (inclusive)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhraseSpan {
    pub id: u32,
    pub start_note: usize,
    pub end_note: usize,
    #[serde(default)]
    pub text: String,
}

/// A group of phrases (verse, refrain, ...)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    pub phrase_ids: Vec<u32>,
}

/// Horizontal extent of a phrase or section on the tablature
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpanPosition {
    pub start_x: f64,
    pub end_x: f64,
    pub width: f64,
    pub center_x: f64,
}

impl SpanPosition {
    fn between(start_x: f64, end_x: f64) -> Self {
        Self {
            start_x,
            end_x,
            width: end_x - start_x,
            center_x: (start_x + end_x) / 2.0,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhrasePosition {
    pub id: u32,
    pub text: String,
    pub position: SpanPosition,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionPosition {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub phrase_count: usize,
    pub position: SpanPosition,
}

/// Place phrases on the layout.
///
/// Span endpoints are input note positions, so a dropped note inside or
/// before a phrase does not shift it. A span is skipped when it is reversed,
/// runs past the input, or covers only dropped notes.
pub fn align_phrases(layout: &TablatureLayout, phrases: &[PhraseSpan]) -> Vec<PhrasePosition> {
    phrases
        .iter()
        .filter_map(|phrase| {
            let covered = layout.notes_in_source_range(phrase.start_note, phrase.end_note);
            match covered.and_then(|notes| Some((notes.first()?, notes.last()?))) {
                Some((first, last)) => Some(PhrasePosition {
                    id: phrase.id,
                    text: phrase.text.clone(),
                    position: SpanPosition::between(first.x, last.end_x()),
                }),
                None => {
                    debug!(
                        "[Overlay] Skipping phrase {} (notes {}..={} of {})",
                        phrase.id, phrase.start_note, phrase.end_note, layout.source_note_count
                    );
                    None
                }
            }
        })
        .collect()
}

/// Place sections using already aligned phrases. A section whose first or
/// last phrase is missing is skipped.
pub fn align_sections(phrases: &[PhrasePosition], sections: &[Section]) -> Vec<SectionPosition> {
    let find = |id: Option<&u32>| id.and_then(|id| phrases.iter().find(|p| p.id == *id));

    sections
        .iter()
        .filter_map(|section| {
            let first = find(section.phrase_ids.first())?;
            let last = find(section.phrase_ids.last())?;
            Some(SectionPosition {
                id: section.id.clone(),
                kind: section.kind.clone(),
                label: section.label.clone(),
                phrase_count: section.phrase_ids.len(),
                position: SpanPosition::between(first.position.start_x, last.position.end_x),
            })
        })
        .collect()
}

fn shorten(text: &str) -> String {
    if text.chars().count() > PHRASE_TEXT_LIMIT {
        let cut: String = text.chars().take(PHRASE_TEXT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Render section and phrase boxes as an SVG fragment for layering over the
/// tablature. Sections are drawn first so phrases sit on top.
pub fn render_overlay(layout: &TablatureLayout, phrases: &[PhraseSpan], sections: &[Section]) -> String {
    let phrase_positions = align_phrases(layout, phrases);
    let section_positions = align_sections(&phrase_positions, sections);

    let mut svg = String::new();
    svg.push_str("<g class=\"phrase-overlay\">\n");

    for section in &section_positions {
        let p = &section.position;
        svg.push_str(&format!(
            "    <g class=\"section-group\" data-section-id=\"{}\">\n",
            escape_xml(&section.id)
        ));
        svg.push_str(&format!(
            "        <rect x=\"{}\" y=\"35\" width=\"{}\" height=\"380\" class=\"section-box section-{}\" rx=\"8\" ry=\"8\"/>\n",
            p.start_x - 10.0,
            p.width + 20.0,
            escape_xml(&section.kind)
        ));
        svg.push_str(&format!(
            "        <text x=\"{}\" y=\"30\" class=\"section-label\">{}</text>\n",
            p.center_x,
            escape_xml(&section.label)
        ));
        svg.push_str(&format!(
            "        <text x=\"{}\" y=\"450\" class=\"section-info\">{} phrases</text>\n",
            p.center_x, section.phrase_count
        ));
        svg.push_str("    </g>\n");
    }

    for phrase in &phrase_positions {
        let p = &phrase.position;
        svg.push_str(&format!(
            "    <g class=\"phrase-annotation\" data-phrase-id=\"{}\">\n",
            phrase.id
        ));
        svg.push_str(&format!(
            "        <rect x=\"{}\" y=\"50\" width=\"{}\" height=\"280\" class=\"phrase-box\"/>\n",
            p.start_x, p.width
        ));
        svg.push_str(&format!(
            "        <text x=\"{}\" y=\"355\" class=\"phrase-label\">Phrase {}</text>\n",
            p.center_x, phrase.id
        ));
        svg.push_str(&format!(
            "        <text x=\"{}\" y=\"375\" class=\"phrase-text\">{}</text>\n",
            p.center_x,
            escape_xml(&shorten(&phrase.text))
        ));
        svg.push_str(&format!("        <title>{}</title>\n", escape_xml(&phrase.text)));
        svg.push_str("    </g>\n");
    }

    svg.push_str("</g>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TablatureLayoutEngine;
    use crate::song::Note;

    fn layout() -> TablatureLayout {
        let notes: Vec<Note> = ["C4", "D4", "E4", "G4", "A4", "C5"]
            .iter()
            .map(|p| Note::parse(p, 1.0))
            .collect();
        TablatureLayoutEngine::default()
            .layout(&notes, "C-D-E-G-A")
            .unwrap()
    }

    fn phrase(id: u32, start_note: usize, end_note: usize) -> PhraseSpan {
        PhraseSpan {
            id,
            start_note,
            end_note,
            text: format!("phrase {}", id),
        }
    }

    #[test]
    fn test_phrase_alignment() {
        let positions = align_phrases(&layout(), &[phrase(1, 0, 2), phrase(2, 3, 5)]);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].position, SpanPosition::between(150.0, 405.0));
        assert_eq!(positions[0].position.width, 255.0);
        assert_eq!(positions[1].position.start_x, 405.0);
        assert_eq!(positions[1].position.end_x, 660.0);
        assert_eq!(positions[1].position.center_x, 532.5);
    }

    #[test]
    fn test_invalid_spans_skipped() {
        let positions = align_phrases(&layout(), &[phrase(1, 4, 2), phrase(2, 3, 9), phrase(3, 5, 5)]);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].id, 3);
    }

    #[test]
    fn test_dropped_note_keeps_phrases_aligned() {
        let song = vec![
            Note::parse("C4", 1.0),
            Note::parse("rest", 1.0),
            Note::parse("D4", 1.0),
            Note::parse("E4", 1.0),
        ];
        let layout = TablatureLayoutEngine::default()
            .layout(&song, "C-D-E-G-A")
            .unwrap();

        let positions = align_phrases(&layout, &[phrase(1, 0, 1), phrase(2, 2, 3)]);
        assert_eq!(positions.len(), 2);
        // Phrase 1 ends on the dropped note, so it covers C4 only
        assert_eq!(positions[0].position, SpanPosition::between(150.0, 235.0));
        // Phrase 2 is D4..E4
        assert_eq!(positions[1].position, SpanPosition::between(235.0, 405.0));

        let svg = render_overlay(&layout, &[phrase(2, 2, 3)], &[]);
        assert!(svg.contains("data-phrase-id=\"2\""));

        // Only the dropped note
        assert!(align_phrases(&layout, &[phrase(3, 1, 1)]).is_empty());
    }

    #[test]
    fn test_section_alignment() {
        let phrases = align_phrases(&layout(), &[phrase(1, 0, 2), phrase(2, 3, 5)]);
        let sections = vec![
            Section {
                id: "A".to_string(),
                kind: "verse".to_string(),
                label: "Verse".to_string(),
                phrase_ids: vec![1, 2],
            },
            Section {
                id: "B".to_string(),
                kind: "refrain".to_string(),
                label: "Refrain".to_string(),
                phrase_ids: vec![7],
            },
        ];
        let positions = align_sections(&phrases, &sections);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].position.start_x, 150.0);
        assert_eq!(positions[0].position.end_x, 660.0);
        assert_eq!(positions[0].phrase_count, 2);
    }

    #[test]
    fn test_render_overlay() {
        let mut long = phrase(1, 0, 5);
        long.text = "Ai đi đâu đấy hỡi mình, mình đi đâu đấy?".to_string();
        let sections = vec![Section {
            id: "A".to_string(),
            kind: "verse".to_string(),
            label: "Verse & Co".to_string(),
            phrase_ids: vec![1],
        }];
        let svg = render_overlay(&layout(), &[long], &sections);

        assert!(svg.starts_with("<g class=\"phrase-overlay\">"));
        assert!(svg.contains("<rect x=\"150\" y=\"50\" width=\"510\" height=\"280\" class=\"phrase-box\"/>"));
        assert!(svg.contains("<rect x=\"140\" y=\"35\" width=\"530\""));
        assert!(svg.contains("Verse &amp; Co"));
        assert!(svg.contains("...</text>"));
        assert!(svg.find("section-group").unwrap() < svg.find("phrase-annotation").unwrap());
    }

    #[test]
    fn test_phrase_span_from_yaml() {
        let spans: Vec<PhraseSpan> =
            serde_yaml::from_str("- { id: 1, startNote: 0, endNote: 3, text: Lý cây đa }").unwrap();
        assert_eq!(spans[0].end_note, 3);
        assert_eq!(spans[0].text, "Lý cây đa");
    }
}
