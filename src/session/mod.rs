//! The interactive session state machine.
//!
//! `ModeSelect -> Listening(mode) <-> AuthPending -> Exited`
//!
//! One session exists per process. The controller owns the mode, the
//! authenticated flag, and the running flag, and is the only thing that
//! mutates them. Transcripts come in through [`TranscriptSource`] and
//! authentication through [`AuthenticationGate`], so the whole machine runs
//! deterministically in tests without audio.

#[cfg(test)]
mod tests;

use crate::auth::AuthenticationGate;
use crate::config::SessionSettings;
use crate::git::Executor;
use crate::intent::{self, Intent};
use crate::logging::CommandLog;
use crate::plan::{self, ExecutionPlan};
use crate::speech::{AsrMode, Speaker};

/// Where transcripts come from. The production implementation is
/// `speech::AsrArbiter`; tests inject a scripted source.
pub trait TranscriptSource {
    /// One bounded listen in the given mode; empty means nothing
    /// recognized.
    fn listen(&mut self, mode: AsrMode) -> String;
}

enum SessionState {
    ModeSelect,
    Listening,
    AuthPending { plan: ExecutionPlan },
    Exited,
}

/// Drives the listen -> parse -> plan -> execute loop.
pub struct SessionController<S: TranscriptSource, A: AuthenticationGate> {
    source: S,
    auth: A,
    speaker: Speaker,
    log: CommandLog,
    executor: Executor,
    settings: SessionSettings,
    auth_required: bool,

    mode: AsrMode,
    authenticated: bool,
    running: bool,
}

impl<S: TranscriptSource, A: AuthenticationGate> SessionController<S, A> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: S,
        auth: A,
        speaker: Speaker,
        log: CommandLog,
        executor: Executor,
        settings: SessionSettings,
        auth_required: bool,
    ) -> Self {
        Self {
            source,
            auth,
            speaker,
            log,
            executor,
            settings,
            auth_required,
            mode: AsrMode::Offline,
            authenticated: false,
            running: true,
        }
    }

    /// The active recognition mode.
    pub fn mode(&self) -> AsrMode {
        self.mode
    }

    /// Whether the most recent voice authentication passed.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Run the session to completion.
    pub fn run(&mut self) {
        self.speaker.speak(
            "Voice git automation started. Say 'offline' or 'online' to choose the recognition mode.",
        );

        let mut state = SessionState::ModeSelect;
        while self.running {
            state = match state {
                SessionState::ModeSelect => self.select_mode(),
                SessionState::Listening => self.listen_once(),
                SessionState::AuthPending { plan } => self.resolve_auth(plan),
                SessionState::Exited => break,
            };
        }

        self.speaker.release();
    }

    /// Pick the recognition mode from up to four online-backend attempts;
    /// exhausting them defaults to offline.
    fn select_mode(&mut self) -> SessionState {
        for _ in 0..4 {
            let text = self.source.listen(AsrMode::Online);
            if text.is_empty() {
                continue;
            }
            if text.contains("offline") {
                self.mode = AsrMode::Offline;
                self.speaker.speak("Selected offline mode.");
                break;
            }
            if text.contains("online") {
                self.mode = AsrMode::Online;
                self.speaker.speak("Selected online mode.");
                break;
            }
            self.speaker
                .speak("Please say 'offline' or 'online' to select the recognition mode.");
        }

        self.speaker.speak(&format!(
            "Using {} recognition. Say a git command, or say 'exit' to stop.",
            self.mode
        ));
        SessionState::Listening
    }

    /// One listen -> parse -> plan -> execute cycle.
    fn listen_once(&mut self) -> SessionState {
        let text = self.source.listen(self.mode);
        if text.is_empty() {
            // Silence is a retry, not an event; nothing is logged
            return SessionState::Listening;
        }

        self.log.append(self.mode, &text);
        tracing::info!(transcript = %text, "recognized");

        if text.contains("switch to offline") {
            self.mode = AsrMode::Offline;
            self.speaker.speak("Switched to offline mode.");
            return SessionState::Listening;
        }
        if text.contains("switch to online") {
            self.mode = AsrMode::Online;
            self.speaker.speak("Switched to online mode.");
            return SessionState::Listening;
        }
        if matches!(text.as_str(), "exit" | "quit" | "stop") {
            self.speaker.speak("Exiting. Goodbye.");
            self.running = false;
            return SessionState::Exited;
        }

        let intent = intent::parse(&text);
        if let Intent::Unknown { .. } = intent {
            self.speaker.speak(
                "Unknown git command. Try: commit, push, pull, status, create branch, switch to.",
            );
            return SessionState::Listening;
        }

        let plan = plan::plan(&intent);
        if self.auth_required && intent.is_sensitive() {
            self.speaker.speak("Please authenticate with voice.");
            return SessionState::AuthPending { plan };
        }

        self.run_plan(plan);
        SessionState::Listening
    }

    /// Resolve a pending authentication: success runs the held plan,
    /// failure discards it. Never retried automatically.
    fn resolve_auth(&mut self, plan: ExecutionPlan) -> SessionState {
        if self.auth.authenticate() {
            self.authenticated = true;
            self.speaker.speak("Authentication passed.");
            self.run_plan(plan);
        } else {
            self.authenticated = false;
            self.speaker.speak("Authentication failed.");
            self.log.append(
                self.mode,
                &format!("AUTH FAIL for command: {}", plan.describe()),
            );
        }
        SessionState::Listening
    }

    fn run_plan(&mut self, plan: ExecutionPlan) {
        self.speaker.speak(&format!("Executing {}.", plan.describe()));

        let outcome = self
            .executor
            .execute(&plan, self.mode, &self.log, &mut self.speaker);

        if outcome.succeeded() {
            self.log
                .append(self.mode, &format!("EXECUTED: {}", plan.describe()));

            if plan.has_commit()
                && !plan.has_push()
                && self.settings.suggest_push_after_commit
            {
                // Suggestion only; the push itself needs a "push" utterance
                self.speaker
                    .speak("Do you want to push? Say 'push' to push now, or continue.");
            }
        }
    }
}
