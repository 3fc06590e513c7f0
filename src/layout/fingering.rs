//! Right-hand finger suggestions
//!
//! Each positioned note gets one of three fingers, picked from the vertical
//! motion around it. Y grows with pitch, so a positive Y delta is a move to a
//! higher string.
//!
//! ```text
//! i  index   plucks away from the body (moving up the strings)
//! t  thumb   plucks toward the body (moving down, or small steps back)
//! m  middle  large upward leaps the index cannot reach
//! ```
//!
//! Repeated notes are looked through: the finger for a repeat is chosen from
//! the next note that actually moves.

use serde::Serialize;

use super::types::PositionedNote;

/// Y deltas smaller than this count as the same string
pub const SAME_STRING_TOLERANCE: f64 = 5.0;

/// Y distance beyond which a move is a leap for the middle finger
pub const LEAP_DISTANCE: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Finger {
    #[serde(rename = "i")]
    Index,
    #[serde(rename = "t")]
    Thumb,
    #[serde(rename = "m")]
    Middle,
}

impl Finger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Index => "i",
            Finger::Thumb => "t",
            Finger::Middle => "m",
        }
    }
}

/// Y of the first later note that leaves the current string
fn next_different_y(notes: &[PositionedNote], i: usize) -> Option<f64> {
    let y = notes[i].y;
    notes[i + 1..]
        .iter()
        .map(|n| n.y)
        .find(|ny| (ny - y).abs() >= SAME_STRING_TOLERANCE)
}

fn finger_for(notes: &[PositionedNote], i: usize) -> Option<Finger> {
    let y = notes[i].y;
    let next = next_different_y(notes, i);

    if i == 0 {
        return match next {
            Some(ny) if ny <= y => Some(Finger::Thumb),
            _ => Some(Finger::Index),
        };
    }

    let dy = y - notes[i - 1].y;

    if dy.abs() < SAME_STRING_TOLERANCE {
        // Repeat: finger follows where the melody goes next
        let ny = next? - y;
        return Some(if ny > 0.0 {
            Finger::Index
        } else if ny.abs() > LEAP_DISTANCE {
            Finger::Middle
        } else {
            Finger::Thumb
        });
    }

    let moving_up = dy > 0.0;
    let next_up = next.map(|ny| ny > y).unwrap_or(moving_up);

    let finger = if moving_up != next_up {
        if next_up {
            Finger::Index
        } else if next.is_some_and(|ny| (ny - y).abs() > LEAP_DISTANCE) {
            Finger::Middle
        } else {
            Finger::Thumb
        }
    } else if moving_up {
        if dy > LEAP_DISTANCE {
            Finger::Middle
        } else {
            Finger::Index
        }
    } else {
        Finger::Thumb
    };

    Some(finger)
}

/// Suggest a finger for every positioned note, in order.
///
/// A repeated note with nothing after it gets `None`.
pub fn calculate_fingering(notes: &[PositionedNote]) -> Vec<Option<Finger>> {
    (0..notes.len()).map(|i| finger_for(notes, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;

    fn at_y(ys: &[f64]) -> Vec<PositionedNote> {
        ys.iter()
            .enumerate()
            .map(|(i, &y)| PositionedNote {
                index: i,
                source_index: i,
                pitch: Pitch::parse("C4").unwrap(),
                duration: 1.0,
                is_grace: false,
                grace_type: None,
                lyric: None,
                string_number: 1,
                x: 150.0 + i as f64 * 85.0,
                y,
                advance: 85.0,
                is_bent: false,
            })
            .collect()
    }

    #[test]
    fn test_first_note_direction() {
        let up = calculate_fingering(&at_y(&[200.0, 250.0]));
        assert_eq!(up[0], Some(Finger::Index));

        let down = calculate_fingering(&at_y(&[200.0, 150.0]));
        assert_eq!(down[0], Some(Finger::Thumb));

        let alone = calculate_fingering(&at_y(&[200.0]));
        assert_eq!(alone, vec![Some(Finger::Index)]);
    }

    #[test]
    fn test_scale_up_then_down() {
        let fingers = calculate_fingering(&at_y(&[200.0, 225.0, 250.0, 225.0, 200.0]));
        assert_eq!(
            fingers,
            vec![
                Some(Finger::Index),
                Some(Finger::Index),
                Some(Finger::Thumb), // turns downward here
                Some(Finger::Thumb),
                Some(Finger::Thumb),
            ]
        );
    }

    #[test]
    fn test_repeated_notes_look_ahead() {
        let fingers = calculate_fingering(&at_y(&[200.0, 225.0, 225.0, 250.0]));
        assert_eq!(fingers[2], Some(Finger::Index));

        let fingers = calculate_fingering(&at_y(&[200.0, 225.0, 225.0, 200.0]));
        assert_eq!(fingers[2], Some(Finger::Thumb));

        let fingers = calculate_fingering(&at_y(&[200.0, 400.0, 400.0, 200.0]));
        assert_eq!(fingers[2], Some(Finger::Middle));

        let fingers = calculate_fingering(&at_y(&[200.0, 225.0, 225.0]));
        assert_eq!(fingers[2], None);
    }

    #[test]
    fn test_large_leap_uses_middle() {
        let fingers = calculate_fingering(&at_y(&[150.0, 350.0, 400.0]));
        assert_eq!(fingers[1], Some(Finger::Middle));

        let fingers = calculate_fingering(&at_y(&[150.0, 200.0, 400.0]));
        assert_eq!(fingers[1], Some(Finger::Index));
    }

    #[test]
    fn test_turn_down_after_leap() {
        // Up to 400, then a long drop
        let fingers = calculate_fingering(&at_y(&[300.0, 400.0, 200.0]));
        assert_eq!(fingers[1], Some(Finger::Middle));
        assert_eq!(fingers[2], Some(Finger::Thumb));
    }
}
