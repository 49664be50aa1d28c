use std::collections::VecDeque;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use super::*;

/// A transcript source that replays a fixed script, then says "exit".
struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TranscriptSource for ScriptedSource {
    fn listen(&mut self, _mode: AsrMode) -> String {
        self.lines
            .pop_front()
            .unwrap_or_else(|| "exit".to_string())
    }
}

struct StubGate {
    accept: bool,
    calls: usize,
}

impl StubGate {
    fn new(accept: bool) -> Self {
        Self { accept, calls: 0 }
    }
}

impl AuthenticationGate for StubGate {
    fn authenticate(&mut self) -> bool {
        self.calls += 1;
        self.accept
    }
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn create_test_repo() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    let repo = tmp.path();
    git(repo, &["init"]);
    git(repo, &["config", "user.email", "test@test.com"]);
    git(repo, &["config", "user.name", "Test User"]);
    std::fs::write(repo.join("test.txt"), "initial\n").expect("write");
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", "Initial commit"]);
    tmp
}

fn controller(
    repo: &Path,
    script: &[&str],
    gate: StubGate,
    auth_required: bool,
) -> SessionController<ScriptedSource, StubGate> {
    let log = CommandLog::new(repo.join("logs/commands.txt"), repo.join("command_log.txt"));
    SessionController::new(
        ScriptedSource::new(script),
        gate,
        Speaker::disabled(),
        log,
        Executor::new(repo),
        SessionSettings::default(),
        auth_required,
    )
}

fn flat_log(repo: &Path) -> String {
    std::fs::read_to_string(repo.join("command_log.txt")).unwrap_or_default()
}

fn last_commit_message(repo: &Path) -> String {
    let output = Command::new("git")
        .args(["log", "-1", "--pretty=%s"])
        .current_dir(repo)
        .output()
        .expect("git log");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn exhausted_mode_selection_defaults_to_offline() {
    let repo = create_test_repo();
    // Four failed attempts, then the first Listening transcript is "exit"
    let mut session = controller(
        repo.path(),
        &["", "hello", "", "what", "exit"],
        StubGate::new(true),
        false,
    );
    session.run();
    assert_eq!(session.mode(), AsrMode::Offline);
}

#[test]
fn mode_selection_picks_online() {
    let repo = create_test_repo();
    let mut session = controller(repo.path(), &["online", "exit"], StubGate::new(true), false);
    session.run();
    assert_eq!(session.mode(), AsrMode::Online);
}

#[test]
fn switch_phrases_update_mode_in_place() {
    let repo = create_test_repo();
    let mut session = controller(
        repo.path(),
        &["offline", "switch to online", "exit"],
        StubGate::new(true),
        false,
    );
    session.run();
    assert_eq!(session.mode(), AsrMode::Online);

    // Mode switches are logged as transcripts but never executed
    let log = flat_log(repo.path());
    assert!(log.contains("switch to online"));
    assert!(!log.contains("EXECUTED"));
}

#[test]
fn status_command_executes_and_logs_outcome() {
    let repo = create_test_repo();
    let mut session = controller(
        repo.path(),
        &["offline", "status", "exit"],
        StubGate::new(true),
        false,
    );
    session.run();

    let log = flat_log(repo.path());
    assert!(log.contains("status"));
    assert!(log.contains("EXECUTED: git status"));
}

#[test]
fn empty_transcripts_are_skipped_without_logging() {
    let repo = create_test_repo();
    let mut session = controller(
        repo.path(),
        &["offline", "", "", "exit"],
        StubGate::new(true),
        false,
    );
    session.run();

    let log = flat_log(repo.path());
    // Only the exit utterance was a transcript worth recording
    assert_eq!(log.lines().count(), 1);
    assert_eq!(log.lines().next(), Some("exit"));
}

#[test]
fn unknown_utterance_is_logged_but_never_executed() {
    let repo = create_test_repo();
    let mut session = controller(
        repo.path(),
        &["offline", "hello there", "exit"],
        StubGate::new(true),
        false,
    );
    session.run();

    let log = flat_log(repo.path());
    assert!(log.contains("hello there"));
    assert!(!log.contains("EXECUTED"));
    assert!(!log.contains("FAILED"));
}

#[test]
fn commit_runs_without_auth_when_gate_disabled() {
    let repo = create_test_repo();
    std::fs::write(repo.path().join("new.txt"), "change\n").expect("write");

    let mut session = controller(
        repo.path(),
        &["offline", "commit message 'spoken change'", "exit"],
        StubGate::new(false), // would fail if consulted
        false,
    );
    session.run();

    assert_eq!(last_commit_message(repo.path()), "spoken change");
    assert!(flat_log(repo.path()).contains("EXECUTED: git add -A | git commit"));
}

#[test]
fn auth_failure_discards_the_plan() {
    let repo = create_test_repo();
    std::fs::write(repo.path().join("new.txt"), "change\n").expect("write");

    let mut session = controller(
        repo.path(),
        &["offline", "commit", "exit"],
        StubGate::new(false),
        true,
    );
    session.run();

    // The commit never happened and is never retried
    assert_eq!(last_commit_message(repo.path()), "Initial commit");
    assert!(!session.is_authenticated());

    let log = flat_log(repo.path());
    assert!(log.contains("AUTH FAIL for command: git add -A | git commit -m voice commit"));
    assert!(!log.contains("EXECUTED"));
}

#[test]
fn auth_success_runs_the_pending_plan() {
    let repo = create_test_repo();
    std::fs::write(repo.path().join("new.txt"), "change\n").expect("write");

    let mut session = controller(
        repo.path(),
        &["offline", "commit", "exit"],
        StubGate::new(true),
        true,
    );
    session.run();

    assert_eq!(last_commit_message(repo.path()), "voice commit");
    assert!(session.is_authenticated());
    assert!(flat_log(repo.path()).contains("EXECUTED"));
}

#[test]
fn non_sensitive_commands_bypass_the_auth_gate() {
    let repo = create_test_repo();
    let gate = StubGate::new(false);
    let mut session = controller(repo.path(), &["offline", "status", "exit"], gate, true);
    session.run();

    assert!(flat_log(repo.path()).contains("EXECUTED: git status"));
    assert_eq!(session.auth.calls, 0);
}
