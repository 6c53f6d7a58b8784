//! Chord table — the seven chord keys and the triads they play.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChordPadError;

/// One of the seven chord keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChordKey {
    #[serde(rename = "h")]
    H,
    #[serde(rename = "j")]
    J,
    #[serde(rename = "k")]
    K,
    #[serde(rename = "l")]
    L,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "n")]
    N,
    #[serde(rename = "m")]
    M,
}

impl ChordKey {
    pub const ALL: [ChordKey; 7] = [
        ChordKey::H,
        ChordKey::J,
        ChordKey::K,
        ChordKey::L,
        ChordKey::B,
        ChordKey::N,
        ChordKey::M,
    ];

    pub fn as_char(self) -> char {
        match self {
            ChordKey::H => 'h',
            ChordKey::J => 'j',
            ChordKey::K => 'k',
            ChordKey::L => 'l',
            ChordKey::B => 'b',
            ChordKey::N => 'n',
            ChordKey::M => 'm',
        }
    }
}

impl fmt::Display for ChordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ChordKey {
    type Err = ChordPadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordKey::ALL
            .into_iter()
            .find(|k| s.len() == 1 && s.eq_ignore_ascii_case(&k.as_char().to_string()))
            .ok_or_else(|| ChordPadError::UnknownKey { key: s.to_string() })
    }
}

/// A chord key bound to its base triad.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDefinition {
    pub key: ChordKey,
    /// Scale degree shown on the key cap (e.g. "IV").
    pub degree: &'static str,
    /// Root-position triad, lowest note first.
    pub base_frequencies: [&'static str; 3],
}

impl ChordDefinition {
    pub fn base_pitches(&self) -> Vec<String> {
        self.base_frequencies.iter().map(|p| p.to_string()).collect()
    }
}

/// Diatonic triads of C major. Spelled without accidentals so that a
/// transposition and its inverse land back on the same names.
pub static CHORD_TABLE: [ChordDefinition; 7] = [
    ChordDefinition {
        key: ChordKey::H,
        degree: "I",
        base_frequencies: ["C3", "E3", "G3"],
    },
    ChordDefinition {
        key: ChordKey::J,
        degree: "ii",
        base_frequencies: ["D3", "F3", "A3"],
    },
    ChordDefinition {
        key: ChordKey::K,
        degree: "iii",
        base_frequencies: ["E3", "G3", "B3"],
    },
    ChordDefinition {
        key: ChordKey::L,
        degree: "IV",
        base_frequencies: ["F3", "A3", "C4"],
    },
    ChordDefinition {
        key: ChordKey::B,
        degree: "V",
        base_frequencies: ["G3", "B3", "D4"],
    },
    ChordDefinition {
        key: ChordKey::N,
        degree: "vi",
        base_frequencies: ["A3", "C4", "E4"],
    },
    ChordDefinition {
        key: ChordKey::M,
        degree: "vii°",
        base_frequencies: ["B3", "D4", "F4"],
    },
];

/// Read-only view over a chord table, injected into the pad.
#[derive(Debug, Clone, Copy)]
pub struct ChordTable {
    entries: &'static [ChordDefinition],
}

impl ChordTable {
    pub const fn new(entries: &'static [ChordDefinition]) -> Self {
        ChordTable { entries }
    }

    /// Look up the definition bound to `key`.
    pub fn get(&self, key: ChordKey) -> Option<&'static ChordDefinition> {
        self.entries.iter().find(|c| c.key == key)
    }

    pub fn entries(&self) -> &'static [ChordDefinition] {
        self.entries
    }
}

impl Default for ChordTable {
    fn default() -> Self {
        ChordTable::new(&CHORD_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::note_to_midi;

    #[test]
    fn every_key_has_one_chord() {
        let table = ChordTable::default();
        for key in ChordKey::ALL {
            let def = table.get(key).unwrap();
            assert_eq!(def.key, key);
        }
        assert_eq!(table.entries().len(), 7);
    }

    #[test]
    fn h_is_c_major() {
        let def = ChordTable::default().get(ChordKey::H).unwrap();
        assert_eq!(def.base_frequencies, ["C3", "E3", "G3"]);
        assert_eq!(def.degree, "I");
    }

    #[test]
    fn triads_are_ascending_and_parse() {
        for def in CHORD_TABLE.iter() {
            let midi: Vec<i32> = def
                .base_frequencies
                .iter()
                .map(|p| note_to_midi(p).unwrap())
                .collect();
            assert!(midi[0] < midi[1] && midi[1] < midi[2], "{} not ascending", def.key);
        }
    }

    #[test]
    fn key_parsing_is_case_insensitive() {
        assert_eq!("h".parse::<ChordKey>().unwrap(), ChordKey::H);
        assert_eq!("M".parse::<ChordKey>().unwrap(), ChordKey::M);
        assert!("w".parse::<ChordKey>().is_err());
        assert!("hj".parse::<ChordKey>().is_err());
    }
}
