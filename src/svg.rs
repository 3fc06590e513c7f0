//! SVG tablature rendering
//!
//! Renders a [`TablatureLayout`] to a standalone SVG document. Markup is built
//! with plain string formatting; all user text (lyrics) is escaped. Element
//! order is fixed (strings, labels, notes, lyrics) so output is byte-stable.

use crate::config::LayoutConfig;
use crate::layout::{calculate_fingering, OpenString, PositionedNote, TablatureLayout};

const STRING_LINE_START_X: f64 = 100.0;
const STRING_LINE_END_MARGIN: f64 = 20.0;
const USED_STRING_TOLERANCE: f64 = 5.0;
const MAIN_NOTE_RADIUS: f64 = 12.0;
const GRACE_NOTE_RADIUS: f64 = 6.0;
const RESONANCE_BAND_HEIGHT: f64 = 12.0;
const BENT_MARKER_OFFSET: f64 = 15.0;
const GRACE_SLASH_LENGTH: f64 = 20.0;
const LYRIC_OFFSET_Y: f64 = 40.0;

const STYLE: &str = r#"            .string-line { stroke: #000000; stroke-width: 3; }
            .string-label { font-family: Arial; font-size: 14px; font-weight: bold; fill: #2c3e50; }
            .note-circle { fill: #333333; stroke: #000; stroke-width: 2; }
            .note-text { font-family: 'Arial Narrow', Arial, sans-serif; font-weight: bold; fill: white; text-anchor: middle; dominant-baseline: middle; stroke: #000000; stroke-width: 0.5px; paint-order: stroke fill; }
            .grace-note { fill: #999999; stroke: #000000; }
            .bent-note { fill: #FF0000; stroke: #CC0000; }
            .lyric-text { font-family: Arial; font-size: 12px; fill: #2c3e50; text-anchor: start; }
            .resonance-triangle { fill: #666666; opacity: 0.35; }
            .resonance-triangle-bent { fill: #FF0000; opacity: 0.35; }
            .bent-indicator { fill: #FF0000; font-size: 12px; font-weight: bold; }
            .bent-line { stroke: #FF0000; stroke-width: 4; stroke-linecap: round; }
            .fingering-label { font-family: Georgia, serif; font-size: 20px; font-style: italic; font-weight: bold; text-anchor: middle; dominant-baseline: middle; }
            .fingering-i { fill: #1565C0; }
            .fingering-t { fill: #C62828; }
            .fingering-m { fill: #7B1FA2; }
"#;

/// Render a laid-out song as an SVG document.
///
/// `show_bent_notes` sets the initial visibility of bend markers
/// (`.bent-elements`); the markers are always present in the markup.
pub fn render_tablature(layout: &TablatureLayout, config: &LayoutConfig, show_bent_notes: bool) -> String {
    let mut svg = String::new();

    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        layout.width, layout.height
    ));

    svg.push_str("    <defs>\n        <style>\n");
    svg.push_str(STYLE);
    svg.push_str(&format!(
        "            .bent-elements {{ display: {}; }}\n",
        if show_bent_notes { "block" } else { "none" }
    ));
    svg.push_str("        </style>\n    </defs>\n");

    svg.push_str("\n    <!-- String Lines -->\n");
    svg.push_str(&string_lines(layout));

    svg.push_str("\n    <!-- String Labels -->\n");
    for string in &layout.strings {
        svg.push_str(&format!(
            "    <text x=\"10\" y=\"{}\" class=\"string-label\">{}: {}</text>\n",
            string.y + 5.0,
            string.string_number,
            string.pitch
        ));
    }

    svg.push_str("\n    <!-- Notes -->\n");
    let fingerings = calculate_fingering(&layout.notes);
    for (note, finger) in layout.notes.iter().zip(&fingerings) {
        svg.push_str(&note_markup(layout, config, note, finger.map(|f| f.as_str())));
    }

    svg.push_str("\n    <!-- Lyrics -->\n");
    for note in &layout.notes {
        if let Some(lyric) = note.lyric.as_deref().filter(|l| !l.trim().is_empty()) {
            svg.push_str(&format!(
                "    <text x=\"{}\" y=\"{}\" class=\"lyric-text\">{}</text>\n",
                note.x - note_radius(note),
                note.y + LYRIC_OFFSET_Y,
                escape_xml(lyric)
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn note_radius(note: &PositionedNote) -> f64 {
    if note.is_grace {
        GRACE_NOTE_RADIUS
    } else {
        MAIN_NOTE_RADIUS
    }
}

/// A string is used when a note sits on it or a bent note is pushed from it
fn is_used(string: &OpenString, notes: &[PositionedNote]) -> bool {
    notes.iter().any(|n| {
        (n.y - string.y).abs() < USED_STRING_TOLERANCE
            || (n.is_bent && n.string_number == string.string_number)
    })
}

fn string_lines(layout: &TablatureLayout) -> String {
    let mut svg = String::new();
    let end_x = layout.width as f64 - STRING_LINE_END_MARGIN;

    for string in &layout.strings {
        let opacity = if is_used(string, &layout.notes) { "1" } else { "0.3" };
        svg.push_str(&format!(
            "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" class=\"string-line\" data-string-number=\"{}\" stroke=\"#000000\" stroke-width=\"3\" opacity=\"{}\"/>\n",
            STRING_LINE_START_X, string.y, end_x, string.y, string.string_number, opacity
        ));
    }

    svg
}

fn note_markup(
    layout: &TablatureLayout,
    config: &LayoutConfig,
    note: &PositionedNote,
    finger: Option<&str>,
) -> String {
    let mut svg = String::new();
    let (x, y) = (note.x, note.y);
    let radius = note_radius(note);
    let bent_attr = if note.is_bent { " data-bent=\"true\"" } else { "" };

    // Resonance band
    let triangle_class = if note.is_bent {
        "resonance-triangle-bent"
    } else {
        "resonance-triangle"
    };
    svg.push_str(&format!(
        "    <polygon points=\"{},{} {},{} {},{}\" class=\"{}\"{} data-note-radius=\"{}\"/>\n",
        x,
        y - RESONANCE_BAND_HEIGHT / 2.0,
        x,
        y + RESONANCE_BAND_HEIGHT / 2.0,
        x + config.resonance_length,
        y,
        triangle_class,
        bent_attr,
        radius
    ));

    // Bend marker from the string being pressed
    if note.is_bent {
        if let Some(from) = layout.string(note.string_number) {
            let dot_x = x - BENT_MARKER_OFFSET;
            svg.push_str(&format!(
                "    <text x=\"{}\" y=\"{}\" class=\"bent-indicator bent-elements\" data-bent=\"true\" text-anchor=\"middle\">●</text>\n",
                dot_x,
                from.y + 4.0
            ));
            svg.push_str(&format!(
                "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" class=\"bent-line bent-elements\" data-bent=\"true\"/>\n",
                dot_x, from.y, x, y
            ));
        }
    }

    let mut classes = vec!["note"];
    if note.is_grace {
        classes.push("grace-note");
    }
    classes.push(if note.is_bent {
        "bent-note"
    } else {
        "open-string-note"
    });
    if !note.is_grace && !note.is_bent {
        classes.push("note-circle");
    }
    let grace_attr = note
        .grace_type
        .map(|g| format!(" data-grace-type=\"{}\"", g.as_str()))
        .unwrap_or_default();

    svg.push_str(&format!(
        "    <circle id=\"note_{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" class=\"{}\"{}{} data-pitch=\"{}\" data-duration=\"{}\" data-note-index=\"{}\" data-string=\"{}\"/>\n",
        note.index,
        x,
        y,
        radius,
        classes.join(" "),
        bent_attr,
        grace_attr,
        note.pitch,
        note.duration,
        note.index,
        note.string_number
    ));

    svg.push_str(&format!(
        "    <text x=\"{}\" y=\"{}\" class=\"note-index-label\" font-size=\"10\" fill=\"#666\" opacity=\"0.5\" text-anchor=\"middle\">#{}</text>\n",
        x,
        y - radius - 5.0,
        note.index
    ));

    if let Some(finger) = finger {
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" class=\"fingering-label fingering-{}\">{}</text>\n",
            x,
            y - radius - 25.0,
            finger,
            finger
        ));
    }

    if note.is_grace {
        // Slash at -45 degrees starting on the circle edge
        let angle = (-45.0_f64).to_radians();
        let x1 = x + radius * angle.cos();
        let y1 = y - radius * angle.sin();
        let x2 = x1 + GRACE_SLASH_LENGTH * angle.cos();
        let y2 = y1 - GRACE_SLASH_LENGTH * angle.sin();
        svg.push_str(&format!(
            "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#000000\" stroke-width=\"2\" class=\"grace-slash\"/>\n",
            x1, y1, x2, y2
        ));
    }

    let font_size = if note.is_grace { 11 } else { 22 };
    svg.push_str(&format!(
        "    <text x=\"{}\" y=\"{}\" class=\"note-text\" font-size=\"{}\" data-string=\"{}\" data-pitch-class=\"{}\" data-octave=\"{}\">{}{}</text>\n",
        x,
        y,
        font_size,
        note.string_number,
        note.pitch.class,
        note.pitch.octave,
        escape_xml(&note.pitch.class.to_string()),
        superscript(note.pitch.octave as i32)
    ));

    svg
}

/// Octave digits as Unicode superscripts ("4" -> "⁴")
pub fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '-' => '⁻',
            other => other,
        })
        .collect()
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TablatureLayoutEngine;
    use crate::pitch::Pitch;
    use crate::song::Note;

    fn render(notes: &[Note], tuning: &str, show_bent: bool) -> String {
        let mut engine = TablatureLayoutEngine::default();
        engine.generate_svg(notes, tuning, show_bent).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let svg = render(&[Note::parse("C4", 1.0)], "C-D-E-G-A", true);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"635\" height=\"800\""));
        assert!(svg.contains(".bent-elements { display: block; }"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"string-line\"").count(), 17);
        assert_eq!(svg.matches("class=\"string-label\"").count(), 17);
    }

    #[test]
    fn test_hidden_bent_markers() {
        let svg = render(&[Note::parse("F4", 1.0)], "C-D-E-G-A", false);
        assert!(svg.contains(".bent-elements { display: none; }"));
        assert!(svg.contains("class=\"bent-indicator bent-elements\""));
        assert!(svg.contains("class=\"bent-line bent-elements\""));
        assert!(svg.contains("resonance-triangle-bent"));
        assert!(svg.contains("class=\"note bent-note\" data-bent=\"true\""));
    }

    #[test]
    fn test_note_circle_attributes() {
        let svg = render(&[Note::parse("C4", 2.0)], "C-D-E-G-A", true);
        assert!(svg.contains(
            "<circle id=\"note_0\" cx=\"150\" cy=\"250\" r=\"12\" class=\"note open-string-note note-circle\" data-pitch=\"C4\" data-duration=\"2\" data-note-index=\"0\" data-string=\"4\"/>"
        ));
        assert!(svg.contains("C⁴</text>"));
        assert!(svg.contains("class=\"fingering-label fingering-i\""));
        assert!(svg.contains("<polygon points=\"150,244 150,256 310,250\" class=\"resonance-triangle\" data-note-radius=\"12\"/>"));
    }

    #[test]
    fn test_grace_note_markup() {
        let notes = vec![Note::grace(Pitch::parse("D4").unwrap(), 0.25), Note::parse("E4", 1.0)];
        let svg = render(&notes, "C-D-E-G-A", true);
        assert!(svg.contains("r=\"6\" class=\"note grace-note open-string-note\" data-grace-type=\"g16th\""));
        assert!(svg.contains("class=\"grace-slash\""));
        assert!(svg.contains("cx=\"171.25\""));
    }

    #[test]
    fn test_used_and_unused_strings() {
        let svg = render(&[Note::parse("F4", 1.0)], "C-D-E-G-A", true);
        // E4 (string 6) is bent from, E3 (string 1) is empty
        assert!(svg.contains("data-string-number=\"6\" stroke=\"#000000\" stroke-width=\"3\" opacity=\"1\""));
        assert!(svg.contains("data-string-number=\"1\" stroke=\"#000000\" stroke-width=\"3\" opacity=\"0.3\""));
    }

    #[test]
    fn test_lyrics_are_escaped() {
        let notes = vec![Note::parse("C4", 1.0).with_lyric("<a & b>"), Note::parse("D4", 1.0).with_lyric("  ")];
        let svg = render(&notes, "C-D-E-G-A", true);
        assert!(svg.contains("<text x=\"138\" y=\"290\" class=\"lyric-text\">&lt;a &amp; b&gt;</text>"));
        assert_eq!(svg.matches("class=\"lyric-text\"").count(), 1);
    }

    #[test]
    fn test_superscript() {
        assert_eq!(superscript(4), "⁴");
        assert_eq!(superscript(10), "¹⁰");
        assert_eq!(superscript(-1), "⁻¹");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a\"b'c"), "a&quot;b&apos;c");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
