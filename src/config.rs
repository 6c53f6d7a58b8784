//! Pad configuration, loadable from JSON or a JS object.
//!
//! Every field has a default so hosts only spell out what they change.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::voice::{EnvelopeSettings, Waveform};

/// Joystick geometry and gesture-end policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoystickConfig {
    /// Distance from the centre at which the full offset applies.
    pub max_distance: f64,
    /// Moves closer than `dead_zone * max_distance` are ignored.
    pub dead_zone: f64,
    /// Snap the offset back to zero when a gesture ends. When false the
    /// last offset is held until the next gesture or modifier change.
    pub reset_on_end: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        JoystickConfig {
            max_distance: 50.0,
            dead_zone: 0.05,
            reset_on_end: true,
        }
    }
}

/// Scaling from normalized knob positions [0, 1] to engine units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnobConfig {
    /// Attack time in seconds at full knob.
    pub max_attack: f64,
    /// Decay time in seconds at full knob.
    pub max_decay: f64,
    /// Release time in seconds at full knob.
    pub max_release: f64,
    /// Floor applied to every scaled value so times stay positive.
    pub min_value: f64,
}

impl Default for KnobConfig {
    fn default() -> Self {
        KnobConfig {
            max_attack: 2.0,
            max_decay: 2.0,
            max_release: 5.0,
            min_value: 0.001,
        }
    }
}

/// How a waveform change reaches the tone engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WaveformChange {
    /// Reconfigure the running engine; a sounding chord keeps playing.
    #[default]
    LivePatch,
    /// Dispose the engine and build a new one. Sounding notes are released
    /// and all held keys are forgotten.
    Rebuild,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChordPadConfig {
    pub joystick: JoystickConfig,
    pub knobs: KnobConfig,
    pub waveform_change: WaveformChange,
    pub envelope: EnvelopeSettings,
    pub waveform: Waveform,
    /// Frequency of A4 used for the Hz readout.
    pub tuning_pitch: f64,
}

impl Default for ChordPadConfig {
    fn default() -> Self {
        ChordPadConfig {
            joystick: JoystickConfig::default(),
            knobs: KnobConfig::default(),
            waveform_change: WaveformChange::default(),
            envelope: EnvelopeSettings::default(),
            waveform: Waveform::default(),
            tuning_pitch: 440.0,
        }
    }
}

impl ChordPadConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ChordPadConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the joystick or knobs divide by zero
    /// or produce non-positive times.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("joystick.maxDistance", self.joystick.max_distance),
            ("knobs.maxAttack", self.knobs.max_attack),
            ("knobs.maxDecay", self.knobs.max_decay),
            ("knobs.maxRelease", self.knobs.max_release),
            ("knobs.minValue", self.knobs.min_value),
            ("tuningPitch", self.tuning_pitch),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if !(0.0..1.0).contains(&self.joystick.dead_zone) {
            return Err(ConfigError::OutOfRange {
                field: "joystick.deadZone",
                value: self.joystick.dead_zone,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = ChordPadConfig::from_json("{}").unwrap();
        assert_eq!(config, ChordPadConfig::default());
        assert!(config.joystick.reset_on_end);
        assert_eq!(config.waveform_change, WaveformChange::LivePatch);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = ChordPadConfig::from_json(
            r#"{
                "joystick": { "resetOnEnd": false, "maxDistance": 80 },
                "waveformChange": "rebuild",
                "waveform": "sawtooth"
            }"#,
        )
        .unwrap();
        assert!(!config.joystick.reset_on_end);
        assert_eq!(config.joystick.max_distance, 80.0);
        assert_eq!(config.joystick.dead_zone, 0.05);
        assert_eq!(config.waveform_change, WaveformChange::Rebuild);
        assert_eq!(config.waveform, Waveform::Sawtooth);
    }

    #[test]
    fn rejects_zero_max_distance() {
        let err = ChordPadConfig::from_json(r#"{ "joystick": { "maxDistance": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "joystick.maxDistance", .. }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ChordPadConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }
}
