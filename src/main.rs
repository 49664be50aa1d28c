use anyhow::{Context, Result};

use vogit::auth::VoiceAuthenticator;
use vogit::config::Config;
use vogit::git::Executor;
use vogit::logging::CommandLog;
use vogit::session::SessionController;
use vogit::speech::{AsrArbiter, Recorder, Speaker};

/// Entirely voice-driven: no command-line flags. Diagnostics verbosity
/// comes from the VOGIT_LOG environment variable.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("VOGIT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The working directory is the target repository
    let repo_root = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = Config::load(&repo_root)?;

    let scratch_dir = Config::local_config_dir(&repo_root);
    let arbiter = AsrArbiter::new(&config.speech, scratch_dir.clone());
    let recorder = Recorder::new(config.speech.sample_rate, scratch_dir);
    let authenticator = VoiceAuthenticator::new(&config.auth, recorder);
    let speaker = Speaker::new(&config.speech.tts_program);
    let log = CommandLog::new(
        repo_root.join(&config.logging.detailed_log),
        repo_root.join(&config.logging.flat_log),
    );
    let executor = Executor::new(repo_root);

    let mut session = SessionController::new(
        arbiter,
        authenticator,
        speaker,
        log,
        executor,
        config.session.clone(),
        config.auth.enabled,
    );
    session.run();

    Ok(())
}
