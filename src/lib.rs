//! VoGit - Voice-Guided Git Automation
//!
//! VoGit listens for spoken git commands, recognizes them through a hybrid
//! speech-recognition pipeline, and executes them against the repository in
//! the current working directory.
//!
//! ## Pipeline
//!
//! audio -> [`speech::AsrArbiter`] -> transcript -> [`intent::parse`] ->
//! [`plan::plan`] -> [`git::Executor`] -> outcome -> [`logging::CommandLog`]
//! plus spoken feedback.
//!
//! Recognition backends are external tools (sox's `rec`, `vosk-transcriber`,
//! `whisper-cli`, a cloud endpoint), probed once at startup. A backend whose
//! model or credentials are missing stays disabled for the whole session.
//! The interactive loop itself is a small state machine owned by
//! [`session::SessionController`].

pub mod auth;
pub mod config;
pub mod git;
pub mod intent;
pub mod logging;
pub mod plan;
pub mod session;
pub mod speech;

pub use config::Config;
pub use intent::Intent;
pub use plan::{ExecutionPlan, GitStep};
pub use speech::AsrMode;
