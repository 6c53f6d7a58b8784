use std::fmt;

#[derive(Debug)]
pub enum ChordPadError {
    UnknownKey { key: String },
    Config(ConfigError),
}

#[derive(Debug)]
pub enum PitchError {
    Empty,
    InvalidLetter { ch: char, text: String },
    InvalidOctave { text: String },
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for ChordPadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordPadError::UnknownKey { key } => write!(f, "Unknown key identifier '{key}'"),
            ChordPadError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for ChordPadError {}

impl fmt::Display for PitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchError::Empty => write!(f, "Empty pitch name"),
            PitchError::InvalidLetter { ch, text } => {
                write!(f, "Invalid note letter '{ch}' in '{text}'")
            }
            PitchError::InvalidOctave { text } => write!(f, "Invalid octave in '{text}'"),
        }
    }
}

impl std::error::Error for PitchError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "{e}"),
            ConfigError::OutOfRange { field, value } => {
                write!(f, "{field} out of range: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ChordPadError {
    fn from(e: ConfigError) -> Self {
        ChordPadError::Config(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
