//! Voice controller — sole owner of the tone engine.
//!
//! The tone engine itself (oscillators, envelopes, voice allocation) lives
//! outside this crate and is driven through [`ToneEngine`]. The controller
//! makes sure every trigger is paired with a release of the exact same
//! pitches, drops commands while no engine exists, and applies envelope and
//! waveform changes.

use serde::{Deserialize, Serialize};

use crate::config::{KnobConfig, WaveformChange};

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    #[default]
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Parse a waveform name as sent by the selector widget.
    pub fn from_name(s: &str) -> Option<Waveform> {
        match s {
            "sine" => Some(Waveform::Sine),
            "square" => Some(Waveform::Square),
            "sawtooth" | "saw" => Some(Waveform::Sawtooth),
            "triangle" => Some(Waveform::Triangle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

/// ADSR settings handed to the tone engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeSettings {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0, 1].
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        EnvelopeSettings {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

/// The four envelope knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Knob {
    Attack,
    Decay,
    Sustain,
    Release,
}

impl EnvelopeSettings {
    /// Copy of these settings with one knob moved to `normalized` (clamped
    /// to [0, 1]) and scaled into engine units.
    pub fn with_knob(mut self, knob: Knob, normalized: f64, scale: &KnobConfig) -> Self {
        let v = if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let floor = scale.min_value;
        match knob {
            Knob::Attack => self.attack = (v * scale.max_attack).max(floor),
            Knob::Decay => self.decay = (v * scale.max_decay).max(floor),
            Knob::Sustain => self.sustain = v.max(floor),
            Knob::Release => self.release = (v * scale.max_release).max(floor),
        }
        self
    }

    /// Knob position [0, 1] that produces the current value.
    pub fn knob_position(&self, knob: Knob, scale: &KnobConfig) -> f64 {
        let pos = match knob {
            Knob::Attack => self.attack / scale.max_attack,
            Knob::Decay => self.decay / scale.max_decay,
            Knob::Sustain => self.sustain,
            Knob::Release => self.release / scale.max_release,
        };
        pos.clamp(0.0, 1.0)
    }
}

// ── Tone engine boundary ────────────────────────────────────

/// A polyphonic synth voice pool.
pub trait ToneEngine {
    fn trigger(&mut self, pitches: &[String]);
    fn release(&mut self, pitches: &[String]);
    fn configure(&mut self, envelope: &EnvelopeSettings, waveform: Waveform);
    fn release_all(&mut self);
    fn dispose(&mut self);
}

/// Builds tone engines; used at start-up and when a waveform change
/// rebuilds the pool.
pub trait ToneEngineFactory {
    type Engine: ToneEngine;

    fn create(&mut self, envelope: &EnvelopeSettings, waveform: Waveform) -> Self::Engine;
}

/// Result of a [`VoiceController::reconfigure`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconfigured {
    /// Nothing changed.
    Unchanged,
    /// The running engine was patched in place.
    Patched,
    /// The engine was disposed and rebuilt; nothing is sounding.
    Rebuilt,
}

pub struct VoiceController<F: ToneEngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
    envelope: EnvelopeSettings,
    waveform: Waveform,
    /// Exactly the pitches last triggered and not yet released.
    sounding: Option<Vec<String>>,
}

impl<F: ToneEngineFactory> VoiceController<F> {
    pub fn new(factory: F, envelope: EnvelopeSettings, waveform: Waveform) -> Self {
        VoiceController {
            factory,
            engine: None,
            envelope,
            waveform,
            sounding: None,
        }
    }

    /// Build the engine. Later calls do nothing.
    pub fn initialize(&mut self) {
        if self.engine.is_some() {
            log::debug!("tone engine already initialized");
            return;
        }
        self.engine = Some(self.factory.create(&self.envelope, self.waveform));
        log::info!(
            "tone engine initialized ({}, {:?})",
            self.waveform.name(),
            self.envelope
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn envelope(&self) -> &EnvelopeSettings {
        &self.envelope
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Pitches currently held down in the engine.
    pub fn sounding(&self) -> Option<&[String]> {
        self.sounding.as_deref()
    }

    /// Attack `pitches`. Anything still sounding is released first so the
    /// engine never holds two chords.
    pub fn trigger(&mut self, pitches: Vec<String>) {
        self.release();
        let Some(engine) = self.engine.as_mut() else {
            log::trace!("dropped trigger {pitches:?}: no tone engine");
            return;
        };
        engine.trigger(&pitches);
        self.sounding = Some(pitches);
    }

    /// Release whatever was last triggered, using the same pitch set.
    pub fn release(&mut self) {
        let Some(pitches) = self.sounding.take() else {
            return;
        };
        match self.engine.as_mut() {
            Some(engine) => engine.release(&pitches),
            None => log::trace!("dropped release {pitches:?}: no tone engine"),
        }
    }

    /// Apply new envelope and waveform settings.
    ///
    /// Envelope changes are always patched live. A waveform change under
    /// [`WaveformChange::Rebuild`] tears the engine down and builds a new
    /// one, releasing anything sounding first.
    pub fn reconfigure(
        &mut self,
        envelope: EnvelopeSettings,
        waveform: Waveform,
        strategy: WaveformChange,
    ) -> Reconfigured {
        if envelope == self.envelope && waveform == self.waveform {
            return Reconfigured::Unchanged;
        }
        let waveform_changed = waveform != self.waveform;
        self.envelope = envelope;
        self.waveform = waveform;

        if self.engine.is_none() {
            // picked up by initialize()
            return Reconfigured::Patched;
        }

        if waveform_changed && strategy == WaveformChange::Rebuild {
            self.teardown();
            self.engine = Some(self.factory.create(&self.envelope, self.waveform));
            log::debug!("tone engine rebuilt for {}", self.waveform.name());
            return Reconfigured::Rebuilt;
        }

        if let Some(engine) = self.engine.as_mut() {
            engine.configure(&self.envelope, self.waveform);
        }
        Reconfigured::Patched
    }

    /// Silence and dispose the engine. Commands issued afterwards are
    /// dropped until [`initialize`](Self::initialize) runs again.
    pub fn shutdown(&mut self) {
        if self.engine.is_some() {
            self.teardown();
            log::info!("tone engine disposed");
        }
    }

    fn teardown(&mut self) {
        self.release();
        if let Some(mut engine) = self.engine.take() {
            engine.release_all();
            engine.dispose();
        }
    }
}

impl<F: ToneEngineFactory> Drop for VoiceController<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
