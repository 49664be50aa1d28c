//! Configuration types and file I/O.
//!
//! Config lives at `.vogit/config.toml` inside the repository, with a
//! fallback to `~/.vogit/config.toml`. A missing file means defaults; every
//! field has its own serde default so partial files stay valid across
//! versions.

mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Speech recognition and synthesis settings
    #[serde(default)]
    pub speech: SpeechSettings,

    /// Voice authentication settings
    #[serde(default)]
    pub auth: AuthSettings,

    /// Interactive session settings
    #[serde(default)]
    pub session: SessionSettings,

    /// Command log destinations
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Speech recognition and synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Capture sample rate in Hz (vosk and whisper both want 16 kHz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Bounded window for offline streaming recognition (seconds)
    #[serde(default = "default_stream_timeout")]
    pub stream_timeout_secs: u32,

    /// Bounded window for cloud recognition (seconds)
    #[serde(default = "default_online_timeout")]
    pub online_timeout_secs: u32,

    /// Fixed duration of the batch fallback recording (seconds)
    #[serde(default = "default_batch_record")]
    pub batch_record_secs: u32,

    /// Directory holding the vosk model for streaming offline recognition
    #[serde(default = "default_vosk_model_dir")]
    pub vosk_model_dir: PathBuf,

    /// Path to the whisper model used by the batch fallback
    #[serde(default = "default_whisper_model_path")]
    pub whisper_model_path: PathBuf,

    /// Cloud recognition endpoint; empty disables the online backend
    #[serde(default)]
    pub cloud_endpoint: String,

    /// Environment variable holding the cloud API key
    #[serde(default = "default_cloud_api_key_env")]
    pub cloud_api_key_env: String,

    /// Also try the batch backend when cloud recognition fails.
    /// Off by default: online mode has no fallback.
    #[serde(default)]
    pub online_batch_fallback: bool,

    /// External speech synthesizer invoked for spoken feedback
    #[serde(default = "default_tts_program")]
    pub tts_program: String,
}

/// Voice authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Require voice authentication for commit/push/undo/branch creation
    #[serde(default)]
    pub enabled: bool,

    /// Pre-recorded reference sample; absence fails authentication
    #[serde(default = "default_auth_reference")]
    pub reference_path: PathBuf,

    /// Maximum Euclidean distance between the reference and the fresh
    /// sample's feature vectors for authentication to pass
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,

    /// Duration of the fresh authentication recording (seconds)
    #[serde(default = "default_auth_record")]
    pub record_secs: u32,
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Speak a push suggestion after a commit-only plan succeeds.
    /// The push itself only ever runs on a subsequent "push" utterance.
    #[serde(default = "default_suggest_push")]
    pub suggest_push_after_commit: bool,
}

/// Command log destinations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Timestamped, mode-tagged log
    #[serde(default = "default_detailed_log")]
    pub detailed_log: PathBuf,

    /// Flat transcript/outcome log
    #[serde(default = "default_flat_log")]
    pub flat_log: PathBuf,
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_stream_timeout() -> u32 {
    5
}

fn default_online_timeout() -> u32 {
    6
}

fn default_batch_record() -> u32 {
    3
}

fn default_vosk_model_dir() -> PathBuf {
    PathBuf::from("models/vosk-model-small-en-us-0.15")
}

fn default_whisper_model_path() -> PathBuf {
    PathBuf::from("models/ggml-tiny.bin")
}

fn default_cloud_api_key_env() -> String {
    "VOGIT_CLOUD_KEY".to_string()
}

fn default_tts_program() -> String {
    #[cfg(target_os = "macos")]
    return "say".to_string();
    #[cfg(not(target_os = "macos"))]
    return "espeak".to_string();
}

fn default_auth_reference() -> PathBuf {
    PathBuf::from("auth/voice_ref.wav")
}

fn default_distance_threshold() -> f32 {
    55.0
}

fn default_auth_record() -> u32 {
    3
}

fn default_suggest_push() -> bool {
    true
}

fn default_detailed_log() -> PathBuf {
    PathBuf::from("logs/commands.txt")
}

fn default_flat_log() -> PathBuf {
    PathBuf::from("command_log.txt")
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            stream_timeout_secs: default_stream_timeout(),
            online_timeout_secs: default_online_timeout(),
            batch_record_secs: default_batch_record(),
            vosk_model_dir: default_vosk_model_dir(),
            whisper_model_path: default_whisper_model_path(),
            cloud_endpoint: String::new(),
            cloud_api_key_env: default_cloud_api_key_env(),
            online_batch_fallback: false,
            tts_program: default_tts_program(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            reference_path: default_auth_reference(),
            distance_threshold: default_distance_threshold(),
            record_secs: default_auth_record(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            suggest_push_after_commit: default_suggest_push(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            detailed_log: default_detailed_log(),
            flat_log: default_flat_log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").expect("parse empty config");
        assert_eq!(config.speech.sample_rate, 16000);
        assert_eq!(config.speech.batch_record_secs, 3);
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.distance_threshold, 55.0);
        assert!(config.session.suggest_push_after_commit);
        assert_eq!(config.logging.flat_log, PathBuf::from("command_log.txt"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            enabled = true
            distance_threshold = 40.0
            "#,
        )
        .expect("parse partial config");

        assert!(config.auth.enabled);
        assert_eq!(config.auth.distance_threshold, 40.0);
        assert_eq!(config.auth.record_secs, 3);
        assert_eq!(config.speech.stream_timeout_secs, 5);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.speech.cloud_endpoint = "https://asr.example/v1".to_string();
        config.auth.enabled = true;

        let text = toml::to_string_pretty(&config).expect("serialize");
        let back: Config = toml::from_str(&text).expect("reparse");

        assert_eq!(back.speech.cloud_endpoint, "https://asr.example/v1");
        assert!(back.auth.enabled);
        assert_eq!(back.speech.vosk_model_dir, config.speech.vosk_model_dir);
    }
}
