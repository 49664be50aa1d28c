//! Intent-to-plan translation.
//!
//! Planning is a pure mapping with no I/O. Branch names are never resolved
//! here: the push step carries [`CURRENT_BRANCH`], replaced only at
//! execution time so a branch rename between planning and execution is
//! honored.

use crate::intent::Intent;

/// Placeholder for the branch that is current when a push actually runs.
pub const CURRENT_BRANCH: &str = "<current-branch>";

/// One git invocation as an argument vector (never a shell string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStep {
    pub args: Vec<String>,
}

impl GitStep {
    fn new<const N: usize>(args: [&str; N]) -> Self {
        Self {
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn stage_all() -> Self {
        Self::new(["add", "-A"])
    }

    fn stage(file: &str) -> Self {
        Self::new(["add", file])
    }

    fn commit(message: &str) -> Self {
        Self::new(["commit", "-m", message])
    }

    fn push_current() -> Self {
        Self::new(["push", "origin", CURRENT_BRANCH])
    }

    fn pull() -> Self {
        Self::new(["pull"])
    }

    fn status() -> Self {
        Self::new(["status"])
    }

    fn branch(name: &str) -> Self {
        Self::new(["branch", name])
    }

    fn checkout(name: &str) -> Self {
        Self::new(["checkout", name])
    }

    fn undo_last_commit() -> Self {
        Self::new(["reset", "--soft", "HEAD~1"])
    }

    /// Whether this step pushes to a remote.
    pub fn is_push(&self) -> bool {
        self.args.first().map(String::as_str) == Some("push")
    }

    /// Whether this step creates a commit.
    pub fn is_commit(&self) -> bool {
        self.args.first().map(String::as_str) == Some("commit")
    }
}

impl std::fmt::Display for GitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "git {}", self.args.join(" "))
    }
}

/// Ordered sequence of steps. Empty means "nothing to do".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPlan {
    pub steps: Vec<GitStep>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn has_push(&self) -> bool {
        self.steps.iter().any(GitStep::is_push)
    }

    pub fn has_commit(&self) -> bool {
        self.steps.iter().any(GitStep::is_commit)
    }

    /// Human-readable form for spoken feedback and logs.
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Map an intent to its execution plan. Pure; `Unknown` yields an empty
/// plan.
pub fn plan(intent: &Intent) -> ExecutionPlan {
    let steps = match intent {
        Intent::Commit {
            message,
            file: Some(file),
        } => {
            let message = message
                .clone()
                .unwrap_or_else(|| format!("voice commit {}", file));
            vec![GitStep::stage(file), GitStep::commit(&message)]
        }
        Intent::Commit {
            message: Some(message),
            file: None,
        } => vec![GitStep::stage_all(), GitStep::commit(message)],
        Intent::Commit {
            message: None,
            file: None,
        } => vec![GitStep::stage_all(), GitStep::commit("voice commit")],
        Intent::Push => vec![GitStep::push_current()],
        Intent::Pull => vec![GitStep::pull()],
        Intent::Status => vec![GitStep::status()],
        Intent::CreateBranch { name } => {
            vec![GitStep::branch(name), GitStep::checkout(name)]
        }
        Intent::SwitchBranch { name } => vec![GitStep::checkout(name)],
        Intent::Undo => vec![GitStep::undo_last_commit()],
        Intent::Unknown { .. } => Vec::new(),
    };

    ExecutionPlan { steps }
}
