//! Chord pad — ties input state, the joystick, naming and the voice
//! controller together.
//!
//! Every update runs in two phases. First all state mutations of the update
//! are applied (keys, modifiers, joystick, offset). Then [`ChordPad::settle`]
//! compares the chord that should sound with what the tone engine holds and
//! issues at most one release followed by at most one trigger. Intermediate
//! states inside an update never reach the engine.

use serde::Serialize;

use crate::chord::{ChordKey, ChordTable};
use crate::config::ChordPadConfig;
use crate::input::{InputEvent, InputState};
use crate::joystick::{Joystick, JoystickOutput};
use crate::naming::{ChordDetector, name_of};
use crate::pitch::note_to_frequency;
use crate::transpose::{ModifierKey, Offset, transposed_frequencies};
use crate::voice::{
    EnvelopeSettings, Knob, Reconfigured, ToneEngineFactory, VoiceController, Waveform,
};

/// Everything the UI shows, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PadSnapshot {
    pub initialized: bool,
    pub active_key: Option<ChordKey>,
    pub pressed_keys: Vec<ChordKey>,
    pub held_modifiers: Vec<ModifierKey>,
    pub joystick_active: bool,
    pub offset: i32,
    pub chord_name: Option<String>,
    pub pitches: Option<Vec<String>>,
    pub frequencies_hz: Vec<f64>,
    pub envelope: EnvelopeSettings,
    pub waveform: Waveform,
}

pub struct ChordPad<F: ToneEngineFactory, D: ChordDetector> {
    table: ChordTable,
    config: ChordPadConfig,
    state: InputState,
    joystick: Joystick,
    voices: VoiceController<F>,
    /// Key whose chord the voice controller holds. Only meaningful while
    /// `voices.sounding()` is `Some`.
    sounding_key: Option<ChordKey>,
    detector: D,
}

impl<F: ToneEngineFactory, D: ChordDetector> ChordPad<F, D> {
    pub fn new(config: ChordPadConfig, factory: F, detector: D) -> Self {
        Self::with_table(ChordTable::default(), config, factory, detector)
    }

    pub fn with_table(table: ChordTable, config: ChordPadConfig, factory: F, detector: D) -> Self {
        ChordPad {
            table,
            joystick: Joystick::new(config.joystick),
            voices: VoiceController::new(factory, config.envelope, config.waveform),
            state: InputState::new(),
            sounding_key: None,
            config,
            detector,
        }
    }

    /// Build the tone engine. Input handled before this only updates state;
    /// a chord key still held at this point starts sounding here.
    pub fn initialize(&mut self) {
        self.voices.initialize();
        self.settle();
    }

    /// Silence everything and dispose the tone engine.
    pub fn shutdown(&mut self) {
        self.voices.shutdown();
    }

    pub fn config(&self) -> &ChordPadConfig {
        &self.config
    }

    pub fn table(&self) -> &ChordTable {
        &self.table
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn offset(&self) -> Offset {
        self.state.offset()
    }

    pub fn envelope(&self) -> &EnvelopeSettings {
        self.voices.envelope()
    }

    pub fn waveform(&self) -> Waveform {
        self.voices.waveform()
    }

    // ── Input ───────────────────────────────────────────────

    pub fn on_chord_key_down(&mut self, key: ChordKey) {
        self.apply(&[InputEvent::ChordKeyDown { key }]);
    }

    pub fn on_chord_key_up(&mut self, key: ChordKey) {
        self.apply(&[InputEvent::ChordKeyUp { key }]);
    }

    pub fn on_modifier_key_down(&mut self, key: ModifierKey) {
        self.apply(&[InputEvent::ModifierKeyDown { key }]);
    }

    pub fn on_modifier_key_up(&mut self, key: ModifierKey) {
        self.apply(&[InputEvent::ModifierKeyUp { key }]);
    }

    pub fn on_joystick_move(&mut self, angle: f64, distance: f64) {
        self.apply(&[InputEvent::JoystickMove { angle, distance }]);
    }

    pub fn on_joystick_end(&mut self) {
        self.apply(&[InputEvent::JoystickEnd]);
    }

    pub fn set_offset(&mut self, semitones: i32) {
        self.apply(&[InputEvent::SetOffset { semitones }]);
    }

    /// Apply a batch of events as one logical update and settle once.
    pub fn apply(&mut self, events: &[InputEvent]) {
        for event in events {
            self.mutate(event);
        }
        self.settle();
    }

    fn mutate(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::ChordKeyDown { key } => {
                if self.state.chord_key_down(key) {
                    log::debug!("chord key {key} down");
                }
            }
            InputEvent::ChordKeyUp { key } => {
                if self.state.chord_key_up(key) {
                    log::debug!("chord key {key} up");
                }
            }
            InputEvent::ModifierKeyDown { key } => {
                if self.state.modifier_key_down(key) {
                    log::debug!("modifier {key:?} down");
                }
            }
            InputEvent::ModifierKeyUp { key } => {
                if self.state.modifier_key_up(key) {
                    log::debug!("modifier {key:?} up");
                }
            }
            InputEvent::JoystickMove { angle, distance } => {
                if let JoystickOutput::Offset(semitones) = self.joystick.on_move(angle, distance) {
                    self.state.set_offset(semitones);
                }
            }
            InputEvent::JoystickEnd => {
                if let JoystickOutput::Offset(semitones) = self.joystick.on_end() {
                    self.state.set_offset(semitones);
                }
            }
            InputEvent::PointerSlide { from, to } => {
                self.state.chord_key_up(from);
                self.state.chord_key_down(to);
            }
            InputEvent::SetOffset { semitones } => self.state.set_offset(semitones),
        }
    }

    /// Pitches the active chord should sound at right now.
    fn target_pitches(&self) -> Option<Vec<String>> {
        let key = self.state.active_chord_key()?;
        let chord = self.table.get(key)?;
        Some(transposed_frequencies(chord, self.state.offset()))
    }

    /// Bring the tone engine in line with the input state: release the old
    /// pitch set, then attack the new one. A new active key re-attacks even
    /// when its transposed pitches equal the ones already sounding.
    fn settle(&mut self) {
        let active = self.state.active_chord_key();
        let target = self.target_pitches();
        let sounding_key = self.voices.sounding().and(self.sounding_key);
        let key_changed = target.is_some() && active != sounding_key;
        if key_changed || target.as_deref() != self.voices.sounding() {
            if self.state.offset() != self.state.previous_offset() {
                log::debug!(
                    "offset {} -> {}",
                    self.state.previous_offset(),
                    self.state.offset()
                );
            }
            match target {
                // trigger releases the previous set before attacking
                Some(pitches) => self.voices.trigger(pitches),
                None => self.voices.release(),
            }
            self.sounding_key = self.voices.sounding().and(active);
        }
        self.state.mark_settled();
    }

    // ── Parameters ──────────────────────────────────────────

    /// Move one envelope knob to a normalized position in [0, 1].
    pub fn set_knob(&mut self, knob: Knob, normalized: f64) {
        let envelope = self
            .voices
            .envelope()
            .with_knob(knob, normalized, &self.config.knobs);
        self.reconfigure(envelope, self.voices.waveform());
    }

    pub fn set_envelope(&mut self, envelope: EnvelopeSettings) {
        self.reconfigure(envelope, self.voices.waveform());
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.reconfigure(*self.voices.envelope(), waveform);
    }

    pub fn knob_position(&self, knob: Knob) -> f64 {
        self.voices
            .envelope()
            .knob_position(knob, &self.config.knobs)
    }

    fn reconfigure(&mut self, envelope: EnvelopeSettings, waveform: Waveform) {
        let result = self
            .voices
            .reconfigure(envelope, waveform, self.config.waveform_change);
        if result == Reconfigured::Rebuilt {
            log::debug!("tone engine rebuilt; clearing held keys");
            self.state.clear_keys();
        }
        self.settle();
    }

    // ── Display ─────────────────────────────────────────────

    /// Name of the active chord at the current offset.
    pub fn chord_name(&self) -> Option<String> {
        let key = self.state.active_chord_key()?;
        let chord = self.table.get(key)?;
        let pitches = transposed_frequencies(chord, self.state.offset());
        Some(name_of(
            &self.detector,
            &pitches,
            &chord.base_pitches(),
            self.state.offset(),
        ))
    }

    pub fn snapshot(&self) -> PadSnapshot {
        let pitches = self.target_pitches();
        let tuning = self.config.tuning_pitch;
        let frequencies_hz = pitches
            .iter()
            .flatten()
            .filter_map(|p| note_to_frequency(p, tuning).ok())
            .collect();

        PadSnapshot {
            initialized: self.voices.is_initialized(),
            active_key: self.state.active_chord_key(),
            pressed_keys: self.state.pressed_chord_keys().iter().copied().collect(),
            held_modifiers: self.state.pressed_modifier_keys().iter().copied().collect(),
            joystick_active: self.joystick.is_active(),
            offset: self.state.offset().semitones(),
            chord_name: self.chord_name(),
            pitches,
            frequencies_hz,
            envelope: *self.voices.envelope(),
            waveform: self.voices.waveform(),
        }
    }
}
