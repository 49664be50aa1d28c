//! Append-only command logging.
//!
//! Two independent sinks: a timestamped, mode-tagged detailed log and a
//! flat transcript/outcome log. One entry per line, never truncated or
//! rewritten. A write failure on one sink is reported through tracing and
//! never blocks the other sink or command execution.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::speech::AsrMode;

/// The append-only sink pair.
pub struct CommandLog {
    detailed_path: PathBuf,
    flat_path: PathBuf,
}

impl CommandLog {
    pub fn new(detailed_path: PathBuf, flat_path: PathBuf) -> Self {
        Self {
            detailed_path,
            flat_path,
        }
    }

    /// Append one entry to both sinks.
    ///
    /// Entries land in call order; there is exactly one writer per process.
    pub fn append(&self, mode: AsrMode, message: &str) {
        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let detailed = format!("{} [{}] {}", ts, mode, message);

        if let Err(e) = append_line(&self.detailed_path, &detailed) {
            tracing::warn!(
                "failed to append to {}: {}",
                self.detailed_path.display(),
                e
            );
        }
        if let Err(e) = append_line(&self.flat_path, message) {
            tracing::warn!("failed to append to {}: {}", self.flat_path.display(), e);
        }
    }

    pub fn detailed_path(&self) -> &Path {
        &self.detailed_path
    }

    pub fn flat_path(&self) -> &Path {
        &self.flat_path
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}", line)
}
