//! Pitch names — scientific pitch notation to MIDI numbers and back.
//!
//! Chords travel through the pad as pitch names (`"C3"`, `"F#4"`) because the
//! tone engine and the chord detector both speak names. Arithmetic happens on
//! MIDI note numbers and is formatted back with sharp spellings.

use crate::error::PitchError;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Parse a note name (e.g. "C4", "F#3", "Bb5", "C-1") into a MIDI note number.
pub fn note_to_midi(note: &str) -> Result<i32, PitchError> {
    let bytes = note.as_bytes();
    if bytes.is_empty() {
        return Err(PitchError::Empty);
    }

    let name = bytes[0] as char;
    let base_semitone = match name {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => {
            return Err(PitchError::InvalidLetter {
                ch: name,
                text: note.to_string(),
            });
        }
    };

    let mut idx = 1;
    let mut semitone = base_semitone;

    if idx < bytes.len() {
        match bytes[idx] as char {
            '#' => {
                semitone += 1;
                idx += 1;
            }
            'b' => {
                semitone -= 1;
                idx += 1;
            }
            _ => {}
        }
    }

    // MIDI note number: C4 = 60
    let octave: i32 = note[idx..].parse().map_err(|_| PitchError::InvalidOctave {
        text: note.to_string(),
    })?;
    Ok((octave + 1) * 12 + semitone)
}

/// Format a MIDI note number as a sharp-spelled pitch name.
pub fn midi_to_note(midi: i32) -> String {
    let octave = midi.div_euclid(12) - 1;
    let class = midi.rem_euclid(12) as usize;
    format!("{}{}", SHARP_NAMES[class], octave)
}

/// Shift a pitch name by `semitones`.
pub fn transpose_note(note: &str, semitones: i32) -> Result<String, PitchError> {
    Ok(midi_to_note(note_to_midi(note)? + semitones))
}

/// Convert a MIDI note number to frequency using the given tuning pitch.
///
/// `tuning_pitch` is the frequency of A4 (MIDI 69).
pub fn midi_to_frequency(midi: i32, tuning_pitch: f64) -> f64 {
    tuning_pitch * (2.0_f64).powf((midi as f64 - 69.0) / 12.0)
}

/// Note-to-frequency conversion with configurable tuning pitch.
pub fn note_to_frequency(note: &str, tuning_pitch: f64) -> Result<f64, PitchError> {
    Ok(midi_to_frequency(note_to_midi(note)?, tuning_pitch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naturals_and_accidentals() {
        assert_eq!(note_to_midi("C4").unwrap(), 60);
        assert_eq!(note_to_midi("A4").unwrap(), 69);
        assert_eq!(note_to_midi("F#3").unwrap(), 54);
        assert_eq!(note_to_midi("Bb2").unwrap(), 46);
        assert_eq!(note_to_midi("C-1").unwrap(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(note_to_midi(""), Err(PitchError::Empty)));
        assert!(matches!(
            note_to_midi("H2"),
            Err(PitchError::InvalidLetter { ch: 'H', .. })
        ));
        assert!(matches!(
            note_to_midi("C#"),
            Err(PitchError::InvalidOctave { .. })
        ));
    }

    #[test]
    fn formats_with_sharps() {
        assert_eq!(midi_to_note(60), "C4");
        assert_eq!(midi_to_note(61), "C#4");
        assert_eq!(midi_to_note(46), "A#2");
        assert_eq!(midi_to_note(0), "C-1");
        assert_eq!(midi_to_note(-1), "B-2");
    }

    #[test]
    fn transpose_crosses_octaves() {
        assert_eq!(transpose_note("B3", 1).unwrap(), "C4");
        assert_eq!(transpose_note("C3", -1).unwrap(), "B2");
        assert_eq!(transpose_note("E3", 4).unwrap(), "G#3");
        assert_eq!(transpose_note("G3", 24).unwrap(), "G5");
    }

    #[test]
    fn a4_is_tuning_pitch() {
        assert!((note_to_frequency("A4", 440.0).unwrap() - 440.0).abs() < 1e-9);
        assert!((note_to_frequency("A5", 432.0).unwrap() - 864.0).abs() < 1e-9);
    }
}
