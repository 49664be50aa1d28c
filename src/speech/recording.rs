//! Microphone capture via sox's `rec`.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Records WAV clips into a scratch directory.
#[derive(Debug, Clone)]
pub struct Recorder {
    sample_rate: u32,
    scratch_dir: PathBuf,
}

impl Recorder {
    pub fn new(sample_rate: u32, scratch_dir: PathBuf) -> Self {
        Self {
            sample_rate,
            scratch_dir,
        }
    }

    /// Record for exactly `duration_secs` seconds.
    ///
    /// Blocks until the recording ends and returns the WAV path.
    pub fn record_fixed(&self, file_name: &str, duration_secs: u32) -> Result<PathBuf, String> {
        let path = self.prepare(file_name)?;

        let status = Command::new("rec")
            .args([
                "-r",
                &self.sample_rate.to_string(),
                "-c",
                "1", // Mono
                "-b",
                "16", // 16-bit
                path.to_str().unwrap_or("recording.wav"),
                "trim",
                "0",
                &duration_secs.to_string(),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("Failed to start recording: {}", e))?;

        if !status.success() {
            return Err(format!("Recording exited with {}", status));
        }
        if !path.exists() {
            return Err("Recording produced no file".to_string());
        }
        Ok(path)
    }

    /// Record until the speaker falls silent, bounded by `max_secs`.
    ///
    /// sox's silence effect waits for sound to start, then stops after one
    /// second of silence; the trailing trim caps the whole capture.
    pub fn record_until_silence(&self, file_name: &str, max_secs: u32) -> Result<PathBuf, String> {
        let path = self.prepare(file_name)?;

        let status = Command::new("rec")
            .args([
                "-r",
                &self.sample_rate.to_string(),
                "-c",
                "1",
                "-b",
                "16",
                path.to_str().unwrap_or("recording.wav"),
                "silence",
                "1",
                "0.1",
                "1%", // Wait for sound
                "1",
                "1.0",
                "1%", // Stop on silence
                "trim",
                "0",
                &max_secs.to_string(),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("Failed to start recording: {}", e))?;

        if !status.success() {
            return Err(format!("Recording exited with {}", status));
        }
        if !path.exists() {
            return Err("Recording produced no file".to_string());
        }
        Ok(path)
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf, String> {
        std::fs::create_dir_all(&self.scratch_dir)
            .map_err(|e| format!("Failed to create scratch dir: {}", e))?;
        let path = self.scratch_dir.join(file_name);
        // A stale capture must never be transcribed as if it were fresh
        let _ = std::fs::remove_file(&path);
        Ok(path)
    }
}
