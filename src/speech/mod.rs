//! Speech recognition and synthesis.
//!
//! Everything audio goes through external tools, probed once at startup:
//!
//! - `rec` (sox) captures microphone audio
//! - `vosk-transcriber` does streaming-style offline recognition
//! - `whisper-cli` transcribes the fixed-duration fallback recording
//! - a configurable HTTP endpoint does cloud recognition
//! - an external synthesizer (`espeak`/`say`) speaks feedback
//!
//! Failures on any of these degrade to empty text or silence; they never
//! cross the boundary as errors.

mod arbiter;
mod backends;
pub mod recording;
mod tts;

pub use arbiter::{AsrArbiter, BackendRegistry};
pub use backends::{CloudOnline, FallbackBatch, StreamingOffline, binary_on_path};
pub use recording::Recorder;
pub use tts::Speaker;

/// Which recognition pipeline the session is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsrMode {
    /// Streaming offline recognition with batch fallback
    Offline,
    /// Cloud recognition only
    Online,
}

impl std::fmt::Display for AsrMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsrMode::Offline => write!(f, "offline"),
            AsrMode::Online => write!(f, "online"),
        }
    }
}

/// Normalize a raw transcript: lower-cased and trimmed.
///
/// The empty string is the "nothing recognized" value; callers treat it as
/// "listen again", never as an error.
pub fn normalize_transcript(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_transcript("  Commit THIS  "), "commit this");
        assert_eq!(normalize_transcript(""), "");
        assert_eq!(normalize_transcript("   \t "), "");
    }

    #[test]
    fn mode_display_matches_keywords() {
        assert_eq!(AsrMode::Offline.to_string(), "offline");
        assert_eq!(AsrMode::Online.to_string(), "online");
    }
}
