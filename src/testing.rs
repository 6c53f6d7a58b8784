//! Test doubles: a tone engine that records every call and a detector that
//! answers from a fixed script.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::naming::ChordDetector;
use crate::voice::{EnvelopeSettings, ToneEngine, ToneEngineFactory, Waveform};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Trigger(Vec<String>),
    Release(Vec<String>),
    Configure(EnvelopeSettings, Waveform),
    ReleaseAll,
    Dispose,
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<Call>,
    created: usize,
}

/// Factory whose engines all append to one shared call log.
#[derive(Debug, Default, Clone)]
pub struct RecordingFactory {
    log: Rc<RefCell<Log>>,
}

impl RecordingFactory {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().calls.clear();
    }

    pub fn engines_created(&self) -> usize {
        self.log.borrow().created
    }

    /// Only the trigger and release calls.
    pub fn notes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Trigger(_) | Call::Release(_)))
            .collect()
    }
}

pub struct RecordingEngine {
    log: Rc<RefCell<Log>>,
}

impl RecordingEngine {
    fn push(&self, call: Call) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl ToneEngine for RecordingEngine {
    fn trigger(&mut self, pitches: &[String]) {
        self.push(Call::Trigger(pitches.to_vec()));
    }

    fn release(&mut self, pitches: &[String]) {
        self.push(Call::Release(pitches.to_vec()));
    }

    fn configure(&mut self, envelope: &EnvelopeSettings, waveform: Waveform) {
        self.push(Call::Configure(*envelope, waveform));
    }

    fn release_all(&mut self) {
        self.push(Call::ReleaseAll);
    }

    fn dispose(&mut self) {
        self.push(Call::Dispose);
    }
}

impl ToneEngineFactory for RecordingFactory {
    type Engine = RecordingEngine;

    fn create(&mut self, _envelope: &EnvelopeSettings, _waveform: Waveform) -> RecordingEngine {
        self.log.borrow_mut().created += 1;
        RecordingEngine {
            log: Rc::clone(&self.log),
        }
    }
}

/// Detector answering from a pitch-set → candidates table.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDetector {
    answers: HashMap<Vec<String>, Vec<String>>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pitches: &[&str], names: &[&str]) -> Self {
        self.answers.insert(
            pitches.iter().map(|s| s.to_string()).collect(),
            names.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

impl ChordDetector for ScriptedDetector {
    fn detect(&self, pitches: &[String]) -> Vec<String> {
        self.answers.get(pitches).cloned().unwrap_or_default()
    }
}
