//! Backend arbitration: which recognizer runs, in what order.

use std::path::PathBuf;

use crate::config::SpeechSettings;
use crate::session::TranscriptSource;

use super::backends::{CloudOnline, FallbackBatch, StreamingOffline};
use super::recording::Recorder;
use super::{AsrMode, normalize_transcript};

/// Capability registry, resolved once at startup.
///
/// An unavailable backend is an absent variant; it is never retried during
/// the session.
pub struct BackendRegistry {
    pub streaming: Option<StreamingOffline>,
    pub cloud: Option<CloudOnline>,
    pub batch: Option<FallbackBatch>,
}

impl BackendRegistry {
    /// Probe every backend and report what was found.
    pub fn detect(settings: &SpeechSettings) -> Self {
        let streaming = StreamingOffline::detect(settings);
        match &streaming {
            Some(_) => tracing::info!("streaming offline recognition available"),
            None => tracing::warn!(
                "streaming offline recognition unavailable (vosk-transcriber or model {} missing)",
                settings.vosk_model_dir.display()
            ),
        }

        let cloud = CloudOnline::detect(settings);
        match &cloud {
            Some(_) => tracing::info!("cloud recognition available"),
            None => tracing::warn!(
                "cloud recognition unavailable (endpoint or {} unset)",
                settings.cloud_api_key_env
            ),
        }

        let batch = FallbackBatch::detect(settings);
        match &batch {
            Some(_) => tracing::info!("batch fallback transcription available"),
            None => tracing::warn!(
                "batch fallback unavailable (whisper-cli or model {} missing)",
                settings.whisper_model_path.display()
            ),
        }

        Self {
            streaming,
            cloud,
            batch,
        }
    }
}

/// Chooses and sequences recognition backends per mode.
pub struct AsrArbiter {
    registry: BackendRegistry,
    recorder: Recorder,
    settings: SpeechSettings,
}

impl AsrArbiter {
    /// Build the arbiter, probing backend availability once.
    pub fn new(settings: &SpeechSettings, scratch_dir: PathBuf) -> Self {
        Self {
            registry: BackendRegistry::detect(settings),
            recorder: Recorder::new(settings.sample_rate, scratch_dir),
            settings: settings.clone(),
        }
    }

    #[cfg(test)]
    pub fn with_registry(
        settings: &SpeechSettings,
        scratch_dir: PathBuf,
        registry: BackendRegistry,
    ) -> Self {
        Self {
            registry,
            recorder: Recorder::new(settings.sample_rate, scratch_dir),
            settings: settings.clone(),
        }
    }

    /// Listen once in the given mode.
    ///
    /// The result is normalized (lower-cased, trimmed); empty means "listen
    /// again", never an error.
    pub fn listen(&self, mode: AsrMode) -> String {
        let raw = match mode {
            AsrMode::Offline => {
                let text = match &self.registry.streaming {
                    Some(streaming) => {
                        streaming.listen(&self.recorder, self.settings.stream_timeout_secs)
                    }
                    None => String::new(),
                };
                if text.is_empty() {
                    self.batch_fallback()
                } else {
                    text
                }
            }
            AsrMode::Online => {
                let text = match &self.registry.cloud {
                    Some(cloud) => cloud.listen(&self.recorder, self.settings.online_timeout_secs),
                    None => String::new(),
                };
                if text.is_empty() && self.settings.online_batch_fallback {
                    self.batch_fallback()
                } else {
                    text
                }
            }
        };

        normalize_transcript(&raw)
    }

    /// Capture one fixed-duration recording and transcribe it.
    fn batch_fallback(&self) -> String {
        let Some(batch) = &self.registry.batch else {
            return String::new();
        };

        let audio = match self
            .recorder
            .record_fixed("fallback.wav", self.settings.batch_record_secs)
        {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("fallback capture failed: {}", e);
                return String::new();
            }
        };

        match batch.transcribe(&audio) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("fallback transcription failed: {}", e);
                String::new()
            }
        }
    }
}

impl TranscriptSource for AsrArbiter {
    fn listen(&mut self, mode: AsrMode) -> String {
        AsrArbiter::listen(self, mode)
    }
}
