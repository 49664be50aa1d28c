//! Voice authentication gate.
//!
//! A purely binary check: record a fresh sample, compare its timbre
//! feature vector against a pre-recorded reference, pass iff the Euclidean
//! distance is under the configured threshold. No enrollment flow, no
//! adaptive threshold. A missing reference sample is an unconditional
//! failure, not an error.

mod features;

pub use features::{FEATURE_DIM, euclidean_distance, read_wav_mono, timbre_features};

use std::path::Path;

use crate::config::AuthSettings;
use crate::speech::Recorder;

/// The seam the session gates sensitive commands through.
pub trait AuthenticationGate {
    fn authenticate(&mut self) -> bool;
}

/// Compares a fresh recording against the reference sample.
pub struct VoiceAuthenticator {
    settings: AuthSettings,
    recorder: Recorder,
}

impl VoiceAuthenticator {
    pub fn new(settings: &AuthSettings, recorder: Recorder) -> Self {
        Self {
            settings: settings.clone(),
            recorder,
        }
    }

    fn check(&self) -> bool {
        if !self.settings.reference_path.exists() {
            tracing::info!(
                "voice reference {} not found, authentication fails",
                self.settings.reference_path.display()
            );
            return false;
        }

        let sample = match self
            .recorder
            .record_fixed("auth_sample.wav", self.settings.record_secs)
        {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("authentication recording failed: {}", e);
                return false;
            }
        };

        match compare(&self.settings.reference_path, &sample) {
            Ok(distance) => {
                tracing::info!(distance, threshold = self.settings.distance_threshold, "voice distance");
                distance < self.settings.distance_threshold
            }
            Err(e) => {
                tracing::warn!("voice comparison failed: {}", e);
                false
            }
        }
    }
}

impl AuthenticationGate for VoiceAuthenticator {
    fn authenticate(&mut self) -> bool {
        self.check()
    }
}

fn compare(reference: &Path, sample: &Path) -> Result<f32, String> {
    let (ref_samples, ref_rate) = read_wav_mono(reference)?;
    let (new_samples, new_rate) = read_wav_mono(sample)?;

    let ref_vec = timbre_features(&ref_samples, ref_rate);
    let new_vec = timbre_features(&new_samples, new_rate);

    Ok(euclidean_distance(&ref_vec, &new_vec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_reference_fails_unconditionally() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = AuthSettings {
            reference_path: tmp.path().join("nope.wav"),
            ..AuthSettings::default()
        };
        let recorder = Recorder::new(16000, tmp.path().to_path_buf());

        let mut auth = VoiceAuthenticator::new(&settings, recorder);
        assert!(!auth.authenticate());
    }
}
