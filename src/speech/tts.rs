//! Spoken feedback through an external synthesizer.

use std::process::{Child, Command, Stdio};

use super::backends::binary_on_path;

/// Best-effort text-to-speech sink.
///
/// Every phrase is also printed, so the session works (silently) when no
/// synthesizer is installed. Synthesis failures are swallowed.
pub struct Speaker {
    program: Option<String>,
    in_flight: Option<Child>,
}

impl Speaker {
    /// Build a speaker around an external program (`espeak`, `say`, ...).
    ///
    /// A missing program disables synthesis but keeps textual feedback.
    pub fn new(program: &str) -> Self {
        let program = if binary_on_path(program) {
            Some(program.to_string())
        } else {
            tracing::warn!("speech synthesizer '{}' not found, feedback is text-only", program);
            None
        };
        Self {
            program,
            in_flight: None,
        }
    }

    /// A speaker that never synthesizes. Used by tests.
    pub fn disabled() -> Self {
        Self {
            program: None,
            in_flight: None,
        }
    }

    /// Speak a phrase, best-effort.
    pub fn speak(&mut self, text: &str) {
        println!("🗣️  {}", text);

        let Some(program) = self.program.clone() else {
            return;
        };

        // One utterance at a time; finish the previous one first
        self.reap();

        match Command::new(&program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.in_flight = Some(child),
            Err(e) => tracing::debug!("speech synthesis failed: {}", e),
        }
    }

    /// Release the speech-output resource, waiting out any utterance still
    /// playing.
    pub fn release(&mut self) {
        self.reap();
        self.program = None;
    }

    fn reap(&mut self) {
        if let Some(mut child) = self.in_flight.take() {
            let _ = child.wait();
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.release();
    }
}
