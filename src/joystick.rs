//! Joystick adapter — turns continuous pointer gestures into semitone offsets.

use crate::config::JoystickConfig;
use crate::transpose::offset_from_angle;

/// What a joystick event asks the pad to do with the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickOutput {
    /// Leave the offset alone.
    Unchanged,
    /// Write this many semitones.
    Offset(i32),
}

#[derive(Debug, Clone)]
pub struct Joystick {
    config: JoystickConfig,
    active: bool,
}

impl Joystick {
    pub fn new(config: JoystickConfig) -> Self {
        Joystick {
            config,
            active: false,
        }
    }

    /// Is a gesture in progress?
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a move event. `angle` uses the compass convention
    /// (0° = east, 90° = north); `distance` is from the widget centre.
    pub fn on_move(&mut self, angle: f64, distance: f64) -> JoystickOutput {
        let max = self.config.max_distance;
        if !distance.is_finite() || distance < self.config.dead_zone * max {
            return JoystickOutput::Unchanged;
        }
        self.active = true;

        let full = offset_from_angle(angle) as f64;
        let scale = (distance / max).min(1.0);
        JoystickOutput::Offset((full * scale).round() as i32)
    }

    /// Handle the end of a gesture.
    pub fn on_end(&mut self) -> JoystickOutput {
        self.active = false;
        if self.config.reset_on_end {
            JoystickOutput::Offset(0)
        } else {
            JoystickOutput::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick(reset_on_end: bool) -> Joystick {
        Joystick::new(JoystickConfig {
            max_distance: 100.0,
            dead_zone: 0.05,
            reset_on_end,
        })
    }

    #[test]
    fn full_deflection_uses_table_value() {
        let mut js = stick(true);
        assert_eq!(js.on_move(45.0, 100.0), JoystickOutput::Offset(2));
        assert_eq!(js.on_move(45.0, 250.0), JoystickOutput::Offset(2));
        assert_eq!(js.on_move(90.0, 100.0), JoystickOutput::Offset(12));
    }

    #[test]
    fn partial_deflection_scales_and_rounds() {
        let mut js = stick(true);
        assert_eq!(js.on_move(45.0, 50.0), JoystickOutput::Offset(1));
        assert_eq!(js.on_move(90.0, 50.0), JoystickOutput::Offset(6));
        assert_eq!(js.on_move(270.0, 25.0), JoystickOutput::Offset(-3));
        assert_eq!(js.on_move(0.0, 10.0), JoystickOutput::Offset(0));
    }

    #[test]
    fn dead_zone_is_ignored() {
        let mut js = stick(true);
        assert_eq!(js.on_move(90.0, 4.9), JoystickOutput::Unchanged);
        assert!(!js.is_active());
        assert_eq!(js.on_move(90.0, 5.0), JoystickOutput::Offset(1));
        assert!(js.is_active());
    }

    #[test]
    fn end_resets_when_configured() {
        let mut js = stick(true);
        js.on_move(90.0, 100.0);
        assert_eq!(js.on_end(), JoystickOutput::Offset(0));
        assert!(!js.is_active());
    }

    #[test]
    fn end_holds_when_configured() {
        let mut js = stick(false);
        js.on_move(90.0, 100.0);
        assert_eq!(js.on_end(), JoystickOutput::Unchanged);
        assert!(!js.is_active());
    }
}
