//! Browser bindings: JS tone engine and detector imports, and the
//! `ChordPad` class exported to the page.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::chord::ChordKey;
use crate::config::ChordPadConfig;
use crate::input::InputEvent;
use crate::naming::{ChordDetector, NoDetector};
use crate::pad::ChordPad;
use crate::voice::{EnvelopeSettings, Knob, ToneEngine, ToneEngineFactory, Waveform};

#[wasm_bindgen]
extern "C" {
    /// JS object exposing `create(options)`, returning a tone engine.
    pub type JsToneEngineFactory;

    #[wasm_bindgen(method, js_name = create)]
    fn js_create(this: &JsToneEngineFactory, options: JsValue) -> JsToneEngine;

    /// A polyphonic synth living on the JS side.
    pub type JsToneEngine;

    #[wasm_bindgen(method, js_name = trigger)]
    fn js_trigger(this: &JsToneEngine, pitches: JsValue);

    #[wasm_bindgen(method, js_name = release)]
    fn js_release(this: &JsToneEngine, pitches: JsValue);

    #[wasm_bindgen(method, js_name = configure)]
    fn js_configure(this: &JsToneEngine, options: JsValue);

    #[wasm_bindgen(method, js_name = releaseAll)]
    fn js_release_all(this: &JsToneEngine);

    #[wasm_bindgen(method, js_name = dispose)]
    fn js_dispose(this: &JsToneEngine);

    /// JS object exposing `detect(pitches) -> string[]`.
    pub type JsChordDetector;

    #[wasm_bindgen(method, js_name = detect)]
    fn js_detect(this: &JsChordDetector, pitches: JsValue) -> JsValue;
}

/// Options object handed to `create` and `configure`.
#[derive(Serialize)]
struct EngineOptions<'a> {
    envelope: &'a EnvelopeSettings,
    waveform: Waveform,
}

fn engine_options(envelope: &EnvelopeSettings, waveform: Waveform) -> JsValue {
    serde_wasm_bindgen::to_value(&EngineOptions { envelope, waveform }).unwrap_or_else(|e| {
        log::error!("could not encode engine options: {e}");
        JsValue::UNDEFINED
    })
}

fn pitch_array(pitches: &[String]) -> Option<JsValue> {
    match serde_wasm_bindgen::to_value(pitches) {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("could not encode pitches {pitches:?}: {e}");
            None
        }
    }
}

impl ToneEngine for JsToneEngine {
    fn trigger(&mut self, pitches: &[String]) {
        if let Some(arr) = pitch_array(pitches) {
            self.js_trigger(arr);
        }
    }

    fn release(&mut self, pitches: &[String]) {
        if let Some(arr) = pitch_array(pitches) {
            self.js_release(arr);
        }
    }

    fn configure(&mut self, envelope: &EnvelopeSettings, waveform: Waveform) {
        self.js_configure(engine_options(envelope, waveform));
    }

    fn release_all(&mut self) {
        self.js_release_all();
    }

    fn dispose(&mut self) {
        self.js_dispose();
    }
}

impl ToneEngineFactory for JsToneEngineFactory {
    type Engine = JsToneEngine;

    fn create(&mut self, envelope: &EnvelopeSettings, waveform: Waveform) -> JsToneEngine {
        self.js_create(engine_options(envelope, waveform))
    }
}

impl ChordDetector for JsChordDetector {
    fn detect(&self, pitches: &[String]) -> Vec<String> {
        let Some(arr) = pitch_array(pitches) else {
            return Vec::new();
        };
        serde_wasm_bindgen::from_value(self.js_detect(arr)).unwrap_or_else(|e| {
            log::warn!("detector returned a non-string-array: {e}");
            Vec::new()
        })
    }
}

fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

fn knob_from_name(name: &str) -> Option<Knob> {
    match name {
        "attack" => Some(Knob::Attack),
        "decay" => Some(Knob::Decay),
        "sustain" => Some(Knob::Sustain),
        "release" => Some(Knob::Release),
        _ => None,
    }
}

/// The chord pad as seen from JS.
#[wasm_bindgen(js_name = ChordPad)]
pub struct WebChordPad {
    inner: ChordPad<JsToneEngineFactory, Box<dyn ChordDetector>>,
}

impl WebChordPad {
    fn key_event(&mut self, key: &str, down: bool) -> bool {
        match InputEvent::from_key(key, down) {
            Some(event) => {
                self.inner.apply(&[event]);
                true
            }
            None => false,
        }
    }
}

#[wasm_bindgen(js_class = ChordPad)]
impl WebChordPad {
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        factory: JsToneEngineFactory,
        detector: Option<JsChordDetector>,
        config: JsValue,
    ) -> Result<WebChordPad, JsValue> {
        let config: ChordPadConfig = if config.is_undefined() || config.is_null() {
            ChordPadConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_err)?
        };
        config.validate().map_err(to_js_err)?;

        let detector: Box<dyn ChordDetector> = match detector {
            Some(d) => Box::new(d),
            None => Box::new(NoDetector),
        };
        Ok(WebChordPad {
            inner: ChordPad::new(config, factory, detector),
        })
    }

    /// Build the tone engine; call after the audio context is running.
    pub fn initialize(&mut self) {
        self.inner.initialize();
    }

    pub fn shutdown(&mut self) {
        self.inner.shutdown();
    }

    /// Keyboard key pressed. Returns false for keys the pad ignores.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.key_event(key, true)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.key_event(key, false)
    }

    /// Mouse-down / touch-start on a chord button.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, key: &str) -> Result<(), JsValue> {
        let key: ChordKey = key.parse().map_err(to_js_err)?;
        self.inner.on_chord_key_down(key);
        Ok(())
    }

    /// Mouse-up / touch-end on a chord button.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, key: &str) -> Result<(), JsValue> {
        let key: ChordKey = key.parse().map_err(to_js_err)?;
        self.inner.on_chord_key_up(key);
        Ok(())
    }

    /// Touch-move that left button `from` and entered button `to`.
    #[wasm_bindgen(js_name = pointerSlide)]
    pub fn pointer_slide(&mut self, from: &str, to: &str) -> Result<(), JsValue> {
        let from: ChordKey = from.parse().map_err(to_js_err)?;
        let to: ChordKey = to.parse().map_err(to_js_err)?;
        self.inner.apply(&[InputEvent::PointerSlide { from, to }]);
        Ok(())
    }

    #[wasm_bindgen(js_name = joystickMove)]
    pub fn joystick_move(&mut self, angle: f64, distance: f64) {
        self.inner.on_joystick_move(angle, distance);
    }

    #[wasm_bindgen(js_name = joystickEnd)]
    pub fn joystick_end(&mut self) {
        self.inner.on_joystick_end();
    }

    /// Apply an array of tagged event objects as one update.
    #[wasm_bindgen(js_name = applyEvents)]
    pub fn apply_events(&mut self, events: JsValue) -> Result<(), JsValue> {
        let events: Vec<InputEvent> = serde_wasm_bindgen::from_value(events).map_err(to_js_err)?;
        self.inner.apply(&events);
        Ok(())
    }

    /// Move a knob ("attack", "decay", "sustain", "release") to [0, 1].
    #[wasm_bindgen(js_name = setKnob)]
    pub fn set_knob(&mut self, name: &str, value: f64) -> bool {
        let Some(knob) = knob_from_name(name) else {
            log::warn!("unknown knob '{name}'");
            return false;
        };
        self.inner.set_knob(knob, value);
        true
    }

    #[wasm_bindgen(js_name = knobPosition)]
    pub fn knob_position(&self, name: &str) -> Option<f64> {
        knob_from_name(name).map(|k| self.inner.knob_position(k))
    }

    #[wasm_bindgen(js_name = setWaveform)]
    pub fn set_waveform(&mut self, name: &str) -> bool {
        let Some(waveform) = Waveform::from_name(name) else {
            log::warn!("unknown waveform '{name}'");
            return false;
        };
        self.inner.set_waveform(waveform);
        true
    }

    /// Current state for display.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = chordName)]
    pub fn chord_name(&self) -> Option<String> {
        self.inner.chord_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_names() {
        assert_eq!(knob_from_name("attack"), Some(Knob::Attack));
        assert_eq!(knob_from_name("release"), Some(Knob::Release));
        assert_eq!(knob_from_name("cutoff"), None);
    }
}
