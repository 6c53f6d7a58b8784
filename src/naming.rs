//! Chord naming — display names with a fallback around an external detector.

use crate::transpose::Offset;

pub const UNKNOWN_CHORD: &str = "Unknown";

/// Chord detection from a set of pitch names.
///
/// Candidates come back most likely first; an empty list means nothing was
/// recognised.
pub trait ChordDetector {
    fn detect(&self, pitches: &[String]) -> Vec<String>;
}

/// Detector used when the host supplies none. Every name falls through to
/// [`UNKNOWN_CHORD`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDetector;

impl ChordDetector for NoDetector {
    fn detect(&self, _pitches: &[String]) -> Vec<String> {
        Vec::new()
    }
}

impl<D: ChordDetector + ?Sized> ChordDetector for Box<D> {
    fn detect(&self, pitches: &[String]) -> Vec<String> {
        (**self).detect(pitches)
    }
}

/// Name the chord sounding at `pitches`.
///
/// If the detector does not recognise the transposed pitches, the untransposed
/// `base` is named instead and the offset appended (`"Cmaj +4"`,
/// `"Cmaj -3"`, or the bare name at offset zero).
pub fn name_of<D: ChordDetector + ?Sized>(
    detector: &D,
    pitches: &[String],
    base: &[String],
    offset: Offset,
) -> String {
    if let Some(name) = detector.detect(pitches).into_iter().next() {
        return name;
    }

    let Some(base_name) = detector.detect(base).into_iter().next() else {
        log::debug!("no chord name for {pitches:?}");
        return UNKNOWN_CHORD.to_string();
    };

    match offset.semitones() {
        0 => base_name,
        n if n > 0 => format!("{base_name} +{n}"),
        n => format!("{base_name} {n}"),
    }
}
