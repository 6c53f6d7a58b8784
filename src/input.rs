//! Key and input state: which chord and modifier keys are held, which chord
//! is active, and the current transposition.
//!
//! Methods here only mutate state. Turning state into tone-engine commands
//! is the pad's settle step, which runs once per logical update.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::chord::ChordKey;
use crate::transpose::{ModifierKey, Offset, offset_from_modifiers, set_offset};

/// One raw input event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    ChordKeyDown { key: ChordKey },
    ChordKeyUp { key: ChordKey },
    ModifierKeyDown { key: ModifierKey },
    ModifierKeyUp { key: ModifierKey },
    JoystickMove { angle: f64, distance: f64 },
    JoystickEnd,
    /// A finger slid off one chord button onto another.
    PointerSlide { from: ChordKey, to: ChordKey },
    SetOffset { semitones: i32 },
}

impl InputEvent {
    /// Map a host key identifier to a key event. Returns `None` for keys
    /// the pad does not use.
    pub fn from_key(key: &str, down: bool) -> Option<InputEvent> {
        if let Ok(key) = key.parse::<ChordKey>() {
            return Some(if down {
                InputEvent::ChordKeyDown { key }
            } else {
                InputEvent::ChordKeyUp { key }
            });
        }
        if let Ok(key) = key.parse::<ModifierKey>() {
            return Some(if down {
                InputEvent::ModifierKeyDown { key }
            } else {
                InputEvent::ModifierKeyUp { key }
            });
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub(crate) pressed_chord_keys: BTreeSet<ChordKey>,
    pub(crate) pressed_modifier_keys: BTreeSet<ModifierKey>,
    /// The one chord allowed to sound. Always a member of
    /// `pressed_chord_keys` when set.
    pub(crate) active_chord_key: Option<ChordKey>,
    pub(crate) offset: Offset,
    /// Offset as of the last settle.
    pub(crate) previous_offset: Offset,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed_chord_keys(&self) -> &BTreeSet<ChordKey> {
        &self.pressed_chord_keys
    }

    pub fn pressed_modifier_keys(&self) -> &BTreeSet<ModifierKey> {
        &self.pressed_modifier_keys
    }

    pub fn active_chord_key(&self) -> Option<ChordKey> {
        self.active_chord_key
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn previous_offset(&self) -> Offset {
        self.previous_offset
    }

    /// Press a chord key. The newest press becomes the active chord.
    /// A key that is already down (auto-repeat) is ignored.
    pub fn chord_key_down(&mut self, key: ChordKey) -> bool {
        if !self.pressed_chord_keys.insert(key) {
            return false;
        }
        self.active_chord_key = Some(key);
        true
    }

    /// Release a chord key. Only the active key silences the chord; other
    /// held keys do not take over.
    pub fn chord_key_up(&mut self, key: ChordKey) -> bool {
        if !self.pressed_chord_keys.remove(&key) {
            return false;
        }
        if self.active_chord_key == Some(key) {
            self.active_chord_key = None;
        }
        true
    }

    /// Press a modifier key and recompute the offset from the held set.
    /// Auto-repeat of a key already down changes nothing, so an offset
    /// written by the joystick survives it.
    pub fn modifier_key_down(&mut self, key: ModifierKey) -> bool {
        if !self.pressed_modifier_keys.insert(key) {
            return false;
        }
        self.offset = set_offset(offset_from_modifiers(&self.pressed_modifier_keys));
        true
    }

    /// Release a modifier key. A key that was not held is ignored.
    pub fn modifier_key_up(&mut self, key: ModifierKey) -> bool {
        if !self.pressed_modifier_keys.remove(&key) {
            return false;
        }
        self.offset = set_offset(offset_from_modifiers(&self.pressed_modifier_keys));
        true
    }

    pub fn set_offset(&mut self, candidate: i32) {
        self.offset = set_offset(candidate);
    }

    /// Forget every held key. The offset is left alone.
    pub fn clear_keys(&mut self) {
        self.pressed_chord_keys.clear();
        self.pressed_modifier_keys.clear();
        self.active_chord_key = None;
    }

    pub(crate) fn mark_settled(&mut self) {
        self.previous_offset = self.offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_press_is_ignored() {
        let mut s = InputState::new();
        assert!(s.chord_key_down(ChordKey::H));
        assert!(!s.chord_key_down(ChordKey::H));
        assert_eq!(s.active_chord_key(), Some(ChordKey::H));
    }

    #[test]
    fn newest_press_becomes_active() {
        let mut s = InputState::new();
        s.chord_key_down(ChordKey::H);
        s.chord_key_down(ChordKey::J);
        assert_eq!(s.active_chord_key(), Some(ChordKey::J));
        assert_eq!(s.pressed_chord_keys().len(), 2);

        // releasing the silent key keeps the active one
        s.chord_key_up(ChordKey::H);
        assert_eq!(s.active_chord_key(), Some(ChordKey::J));

        s.chord_key_up(ChordKey::J);
        assert_eq!(s.active_chord_key(), None);
    }

    #[test]
    fn releasing_active_does_not_promote_others() {
        let mut s = InputState::new();
        s.chord_key_down(ChordKey::H);
        s.chord_key_down(ChordKey::J);
        s.chord_key_up(ChordKey::J);
        assert_eq!(s.active_chord_key(), None);
        assert!(s.pressed_chord_keys().contains(&ChordKey::H));
    }

    #[test]
    fn up_without_down_is_ignored() {
        let mut s = InputState::new();
        assert!(!s.chord_key_up(ChordKey::K));
    }

    #[test]
    fn modifiers_drive_offset() {
        let mut s = InputState::new();
        s.modifier_key_down(ModifierKey::Up);
        assert_eq!(s.offset().semitones(), 12);
        s.modifier_key_down(ModifierKey::Right);
        assert_eq!(s.offset().semitones(), 2);
        s.modifier_key_down(ModifierKey::Down);
        assert_eq!(s.offset().semitones(), 0);
        s.modifier_key_up(ModifierKey::Down);
        s.modifier_key_up(ModifierKey::Up);
        assert_eq!(s.offset().semitones(), 1);
        s.modifier_key_up(ModifierKey::Right);
        assert_eq!(s.offset(), Offset::ZERO);
    }

    #[test]
    fn modifier_repeat_and_stray_up_leave_offset_alone() {
        let mut s = InputState::new();
        assert!(s.modifier_key_down(ModifierKey::Right));
        s.set_offset(12);
        assert!(!s.modifier_key_down(ModifierKey::Right));
        assert_eq!(s.offset().semitones(), 12);
        assert!(!s.modifier_key_up(ModifierKey::Up));
        assert_eq!(s.offset().semitones(), 12);
        assert!(s.modifier_key_up(ModifierKey::Right));
        assert_eq!(s.offset(), Offset::ZERO);
    }

    #[test]
    fn key_identifiers_map_to_events() {
        assert_eq!(
            InputEvent::from_key("h", true),
            Some(InputEvent::ChordKeyDown { key: ChordKey::H })
        );
        assert_eq!(
            InputEvent::from_key("W", false),
            Some(InputEvent::ModifierKeyUp { key: ModifierKey::Up })
        );
        assert_eq!(InputEvent::from_key("q", true), None);
        assert_eq!(InputEvent::from_key("Enter", true), None);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                { "type": "chordKeyDown", "key": "h" },
                { "type": "modifierKeyDown", "key": "w" },
                { "type": "joystickMove", "angle": 45.0, "distance": 10.0 },
                { "type": "joystickEnd" },
                { "type": "pointerSlide", "from": "h", "to": "j" }
            ]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[1], InputEvent::ModifierKeyDown { key: ModifierKey::Up });
        assert_eq!(events[3], InputEvent::JoystickEnd);
    }
}
