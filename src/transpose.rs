//! Transposition — bounded semitone offsets from compass angles and
//! modifier-key combinations, and transposed chord pitches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::chord::ChordDefinition;
use crate::error::ChordPadError;
use crate::pitch::transpose_note;

pub const MAX_OFFSET: i32 = 24;
pub const MIN_OFFSET: i32 = -24;

/// Semitone transposition, always within `[MIN_OFFSET, MAX_OFFSET]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Offset(i32);

impl Offset {
    pub const ZERO: Offset = Offset(0);

    pub fn new(candidate: i32) -> Self {
        set_offset(candidate)
    }

    pub fn semitones(self) -> i32 {
        self.0
    }
}

impl From<i32> for Offset {
    fn from(candidate: i32) -> Self {
        set_offset(candidate)
    }
}

impl From<Offset> for i32 {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clamp a requested offset into range.
pub fn set_offset(candidate: i32) -> Offset {
    Offset(candidate.clamp(MIN_OFFSET, MAX_OFFSET))
}

// ── Directional bindings ────────────────────────────────────

/// One compass direction and the transposition it selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalBinding {
    /// Compass angle in degrees; 0° = east, 90° = north.
    pub angle: f64,
    pub semitones: i32,
}

/// Declared in ascending angle order; ties resolve to the earlier entry.
/// Opposite directions carry opposite offsets.
pub static DIRECTIONAL_BINDINGS: [DirectionalBinding; 8] = [
    DirectionalBinding { angle: 0.0, semitones: 1 },
    DirectionalBinding { angle: 45.0, semitones: 2 },
    DirectionalBinding { angle: 90.0, semitones: 12 },
    DirectionalBinding { angle: 135.0, semitones: 7 },
    DirectionalBinding { angle: 180.0, semitones: -1 },
    DirectionalBinding { angle: 225.0, semitones: -2 },
    DirectionalBinding { angle: 270.0, semitones: -12 },
    DirectionalBinding { angle: 315.0, semitones: -7 },
];

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = a - b;
    d.abs().min((d + 360.0).abs()).min((d - 360.0).abs())
}

/// Semitones bound to the compass direction nearest `angle_degrees`.
pub fn offset_from_angle(angle_degrees: f64) -> i32 {
    offset_from_angle_in(&DIRECTIONAL_BINDINGS, angle_degrees)
}

pub fn offset_from_angle_in(bindings: &[DirectionalBinding], angle_degrees: f64) -> i32 {
    if !angle_degrees.is_finite() {
        return 0;
    }
    let angle = angle_degrees.rem_euclid(360.0);

    let mut best: Option<(f64, i32)> = None;
    for binding in bindings {
        let dist = circular_distance(angle, binding.angle);
        // strict `<` keeps the earliest entry on exact midpoints
        if best.is_none_or(|(best_dist, _)| dist < best_dist) {
            best = Some((dist, binding.semitones));
        }
    }
    best.map_or(0, |(_, semitones)| semitones)
}

// ── Modifier keys ───────────────────────────────────────────

/// Keys that emulate the joystick discretely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierKey {
    #[serde(rename = "w")]
    Up,
    #[serde(rename = "a")]
    Left,
    #[serde(rename = "s")]
    Down,
    #[serde(rename = "d")]
    Right,
}

impl ModifierKey {
    pub const ALL: [ModifierKey; 4] = [
        ModifierKey::Up,
        ModifierKey::Left,
        ModifierKey::Down,
        ModifierKey::Right,
    ];

    pub fn as_char(self) -> char {
        match self {
            ModifierKey::Up => 'w',
            ModifierKey::Left => 'a',
            ModifierKey::Down => 's',
            ModifierKey::Right => 'd',
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ModifierKey {
    type Err = ChordPadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModifierKey::ALL
            .into_iter()
            .find(|k| s.len() == 1 && s.eq_ignore_ascii_case(&k.as_char().to_string()))
            .ok_or_else(|| ChordPadError::UnknownKey { key: s.to_string() })
    }
}

/// Compass angle selected by a combination of held modifier keys.
///
/// Only the four single keys and the four adjacent pairs are mapped.
/// Nothing held, opposing pairs (up + down, left + right) and any three or
/// four key chord return `None`, which callers treat as no transposition.
pub fn modifier_angle(held: &BTreeSet<ModifierKey>) -> Option<f64> {
    use ModifierKey::*;

    let has = |k: ModifierKey| held.contains(&k);
    match (has(Up), has(Left), has(Down), has(Right)) {
        (false, false, false, true) => Some(0.0),
        (true, false, false, true) => Some(45.0),
        (true, false, false, false) => Some(90.0),
        (true, true, false, false) => Some(135.0),
        (false, true, false, false) => Some(180.0),
        (false, true, true, false) => Some(225.0),
        (false, false, true, false) => Some(270.0),
        (false, false, true, true) => Some(315.0),
        _ => None,
    }
}

/// Semitones for a set of held modifier keys; unmapped combinations give 0.
pub fn offset_from_modifiers(held: &BTreeSet<ModifierKey>) -> i32 {
    modifier_angle(held).map_or(0, offset_from_angle)
}

// ── Transposed pitches ──────────────────────────────────────

/// The chord's pitches shifted by `offset`.
///
/// A zero offset returns the base names untouched, so repeated no-op
/// transpositions are stable byte for byte.
pub fn transposed_frequencies(chord: &ChordDefinition, offset: Offset) -> Vec<String> {
    if offset == Offset::ZERO {
        return chord.base_pitches();
    }
    chord
        .base_frequencies
        .iter()
        .map(|p| transpose_pitch(p, offset.semitones()))
        .collect()
}

/// Shift one pitch name. Unparseable names pass through unchanged.
pub fn transpose_pitch(pitch: &str, semitones: i32) -> String {
    if semitones == 0 {
        return pitch.to_string();
    }
    match transpose_note(pitch, semitones) {
        Ok(shifted) => shifted,
        Err(e) => {
            log::warn!("leaving '{pitch}' untransposed: {e}");
            pitch.to_string()
        }
    }
}
