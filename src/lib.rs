pub mod bindings;
pub mod chord;
pub mod config;
pub mod error;
pub mod input;
pub mod joystick;
pub mod logging;
pub mod naming;
pub mod pad;
pub mod pitch;
pub mod transpose;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

use crate::chord::CHORD_TABLE;
use crate::error::ChordPadError;
use wasm_bindgen::prelude::*;

pub use crate::chord::{ChordDefinition, ChordKey, ChordTable};
pub use crate::config::{ChordPadConfig, WaveformChange};
pub use crate::input::InputEvent;
pub use crate::pad::{ChordPad, PadSnapshot};
pub use crate::transpose::{ModifierKey, Offset};
pub use crate::voice::{EnvelopeSettings, Knob, ToneEngine, ToneEngineFactory, Waveform};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the chordpad-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: install the console logger at `level` ("info" when
/// omitted) and the panic hook.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .as_deref()
        .map_or(log::LevelFilter::Info, logging::parse_level);
    logging::init(level);
}

/// WASM-exposed: the chord table with display metadata, for laying out
/// the key buttons.
#[wasm_bindgen(js_name = chordTable)]
pub fn chord_table() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&CHORD_TABLE[..]).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// Parse a pad configuration from JSON, validating ranges.
pub fn parse_config(json: &str) -> Result<ChordPadConfig, ChordPadError> {
    Ok(ChordPadConfig::from_json(json)?)
}

/// WASM-exposed: check a JSON configuration, returning the normalized
/// config object with defaults filled in.
#[wasm_bindgen(js_name = checkConfig)]
pub fn check_config(json: &str) -> Result<JsValue, JsValue> {
    let config = parse_config(json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&config).map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_wraps_errors() {
        let err = parse_config(r#"{ "tuningPitch": -1 }"#).unwrap_err();
        assert!(matches!(err, ChordPadError::Config(_)));
        assert!(format!("{err}").contains("tuningPitch"));
    }

    #[test]
    fn chord_table_serializes_camel_case() {
        let json = serde_json::to_value(&CHORD_TABLE[0]).unwrap();
        assert_eq!(json["key"], "h");
        assert_eq!(json["degree"], "I");
        assert_eq!(json["baseFrequencies"][1], "E3");
    }
}
