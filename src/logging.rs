//! Console logger for the `log` facade.
//!
//! In the browser records go to `console.*`; elsewhere to stderr.

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(target_arch = "wasm32")]
mod console {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = console, js_name = error)]
        pub fn error(s: &str);
        #[wasm_bindgen(js_namespace = console, js_name = warn)]
        pub fn warn(s: &str);
        #[wasm_bindgen(js_namespace = console, js_name = info)]
        pub fn info(s: &str);
        #[wasm_bindgen(js_namespace = console, js_name = debug)]
        pub fn debug(s: &str);
    }
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());

        #[cfg(target_arch = "wasm32")]
        {
            match record.level() {
                log::Level::Error => console::error(&line),
                log::Level::Warn => console::warn(&line),
                log::Level::Info => console::info(&line),
                log::Level::Debug | log::Level::Trace => console::debug(&line),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{line}");
    }

    fn flush(&self) {}
}

/// Parse a level name ("warn", "debug", ...), defaulting to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger and the panic hook. Safe to call more than
/// once; later calls only change the level.
pub fn init(level: LevelFilter) {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
