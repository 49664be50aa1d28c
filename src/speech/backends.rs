//! Speech recognition capability providers.
//!
//! Each provider is probed once at startup; a missing binary, model, or
//! credential makes it unavailable for the whole session. Recognition
//! failures degrade to empty text.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::SpeechSettings;

use super::recording::Recorder;

/// Check whether a binary is reachable on PATH.
pub fn binary_on_path(name: &str) -> bool {
    std::process::Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Streaming offline recognition via `vosk-transcriber`.
///
/// The bounded "streaming" listen records until silence (capped by the
/// timeout), then transcribes the capture.
#[derive(Debug, Clone)]
pub struct StreamingOffline {
    model_dir: PathBuf,
}

impl StreamingOffline {
    /// Probe for the transcriber binary and model directory.
    pub fn detect(settings: &SpeechSettings) -> Option<Self> {
        if !binary_on_path("vosk-transcriber") {
            return None;
        }
        if !settings.vosk_model_dir.is_dir() {
            return None;
        }
        Some(Self {
            model_dir: settings.vosk_model_dir.clone(),
        })
    }

    /// Listen within a bounded window; empty on silence or any failure.
    pub fn listen(&self, recorder: &Recorder, timeout_secs: u32) -> String {
        let audio = match recorder.record_until_silence("stream.wav", timeout_secs) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("offline capture failed: {}", e);
                return String::new();
            }
        };

        match run_vosk(&audio, &self.model_dir) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("vosk transcription failed: {}", e);
                String::new()
            }
        }
    }
}

/// Run vosk-transcriber on an audio file
fn run_vosk(audio_path: &Path, model_dir: &Path) -> Result<String, String> {
    let output = std::process::Command::new("vosk-transcriber")
        .args([
            "--model",
            model_dir.to_str().unwrap_or("model"),
            "--input",
            audio_path.to_str().unwrap_or("audio.wav"),
        ])
        .output()
        .map_err(|e| format!("Failed to run vosk-transcriber: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("vosk-transcriber failed: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Cloud recognition over HTTP.
///
/// Records a bounded clip and posts the WAV to the configured endpoint.
/// Any network or recognition failure yields empty text.
#[derive(Debug, Clone)]
pub struct CloudOnline {
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CloudTranscript {
    #[serde(default)]
    text: String,
}

impl CloudOnline {
    /// Probe for a configured endpoint and its API key.
    pub fn detect(settings: &SpeechSettings) -> Option<Self> {
        if settings.cloud_endpoint.is_empty() {
            return None;
        }
        let api_key = std::env::var(&settings.cloud_api_key_env).ok()?;
        Some(Self {
            endpoint: settings.cloud_endpoint.clone(),
            api_key,
        })
    }

    /// Listen within a bounded window; empty on any failure.
    pub fn listen(&self, recorder: &Recorder, timeout_secs: u32) -> String {
        let audio = match recorder.record_until_silence("online.wav", timeout_secs) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("online capture failed: {}", e);
                return String::new();
            }
        };

        match self.transcribe_remote(&audio) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("cloud recognition failed: {}", e);
                String::new()
            }
        }
    }

    fn transcribe_remote(&self, audio_path: &Path) -> Result<String, String> {
        let bytes = std::fs::read(audio_path)
            .map_err(|e| format!("Failed to read recording: {}", e))?;

        let response = ureq::post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "audio/wav")
            .send_bytes(&bytes)
            .map_err(|e| format!("Request failed: {}", e))?;

        let transcript: CloudTranscript = response
            .into_json()
            .map_err(|e| format!("Bad response body: {}", e))?;

        Ok(transcript.text.trim().to_string())
    }
}

/// Batch transcription of a short recording via `whisper-cli`.
#[derive(Debug, Clone)]
pub struct FallbackBatch {
    model_path: PathBuf,
}

impl FallbackBatch {
    /// Probe for the whisper binary and model file.
    pub fn detect(settings: &SpeechSettings) -> Option<Self> {
        if !binary_on_path("whisper-cli") {
            return None;
        }
        if !settings.whisper_model_path.is_file() {
            return None;
        }
        Some(Self {
            model_path: settings.whisper_model_path.clone(),
        })
    }

    /// Transcribe an audio file; `Err` carries a diagnostic for tracing.
    pub fn transcribe(&self, audio_path: &Path) -> Result<String, String> {
        let output = std::process::Command::new("whisper-cli")
            .args([
                "-m",
                self.model_path.to_str().unwrap_or("model.bin"),
                "-f",
                audio_path.to_str().unwrap_or("audio.wav"),
                "--no-timestamps",
                "-l",
                "en",
            ])
            .output()
            .map_err(|e| format!("Failed to run whisper: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("Whisper failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
