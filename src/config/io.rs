//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the repo-local config directory path (`<repo>/.vogit/`)
    pub fn local_config_dir(repo_root: &Path) -> PathBuf {
        repo_root.join(".vogit")
    }

    /// Get the global config file path (`~/.vogit/config.toml`)
    pub fn global_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vogit")
            .join("config.toml")
    }

    /// Load configuration for a repository.
    ///
    /// Looks for `.vogit/config.toml` in the repo root first, then the
    /// global config, and falls back to built-in defaults when neither
    /// exists.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let local = Self::local_config_dir(repo_root).join("config.toml");
        if local.exists() {
            return Self::from_file(&local);
        }

        let global = Self::global_config_path();
        if global.exists() {
            return Self::from_file(&global);
        }

        Ok(Self::default())
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a file with atomic write and file locking.
    ///
    /// An exclusive lock prevents concurrent writers, and the temp file +
    /// rename keeps the config intact if the process dies mid-write.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        // Lock file is separate from the config to survive the rename
        let lock_path = path.with_extension("toml.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

        lock_file
            .lock_exclusive()
            .with_context(|| format!("Failed to lock config file: {}", lock_path.display()))?;

        let tmp_path = path.with_extension("toml.tmp");
        let result = (|| -> Result<()> {
            let mut tmp = std::fs::File::create(&tmp_path)
                .with_context(|| format!("Failed to create temp file: {}", tmp_path.display()))?;
            tmp.write_all(content.as_bytes())
                .context("Failed to write config")?;
            tmp.sync_all().context("Failed to sync config")?;
            std::fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to rename config into place: {}", path.display()))
        })();

        let _ = fs2::FileExt::unlock(&lock_file);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_without_files() {
        let tmp = TempDir::new().expect("tempdir");
        let config = Config::load(tmp.path()).expect("load");
        assert_eq!(config.speech.sample_rate, 16000);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().expect("tempdir");
        let path = Config::local_config_dir(tmp.path()).join("config.toml");

        let mut config = Config::default();
        config.auth.enabled = true;
        config.save_to_file(&path).expect("save");

        let loaded = Config::load(tmp.path()).expect("load");
        assert!(loaded.auth.enabled);
    }
}
