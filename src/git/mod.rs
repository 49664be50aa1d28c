//! Plan execution against the repository.
//!
//! Steps run strictly in order, synchronously, with combined output
//! captured per step. Execution is fail-fast: the first nonzero exit stops
//! the plan, and earlier effects (staged files, finished commits) are kept.
//! There is no execution-side timeout; a hung git invocation blocks until
//! external supervision intervenes.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::logging::CommandLog;
use crate::plan::{CURRENT_BRANCH, ExecutionPlan, GitStep};
use crate::speech::{AsrMode, Speaker};

/// Result of running a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The working directory is not a git repository; zero steps ran
    NotARepository,
    /// Every step succeeded
    Success {
        steps_run: usize,
        /// Outcome of the guaranteed post-plan push, when the plan pushed
        push: Option<PushOutcome>,
    },
    /// A step failed; `index` is the zero-based position of the first
    /// failing step, `output` its combined stdout/stderr
    StepFailed { index: usize, output: String },
}

impl ExecutionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }
}

/// Result of the execution-time push to `origin/<branch>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub branch: String,
    pub ok: bool,
    pub output: String,
}

/// Runs execution plans against one repository root.
pub struct Executor {
    root: PathBuf,
}

impl Executor {
    /// Build an executor for a directory.
    ///
    /// The repository precondition is checked per execution, not here:
    /// NotARepository is a session-level outcome, not a construction error.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root is inside a git working tree.
    pub fn is_repository(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&self.root)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// The branch HEAD currently points at, `main` when it cannot be read.
    pub fn current_branch(&self) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(&self.root)
            .output();

        match output {
            Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
            _ => "main".to_string(),
        }
    }

    /// Run a plan: fail-fast steps, then the guaranteed push when the plan
    /// contained one.
    ///
    /// Every failure and every push, successful or not, is logged and
    /// announced before this returns.
    pub fn execute(
        &self,
        plan: &ExecutionPlan,
        mode: AsrMode,
        log: &CommandLog,
        voice: &mut Speaker,
    ) -> ExecutionOutcome {
        if !self.is_repository() {
            voice.speak("Not a git repository. Run 'git init' or change to the right folder.");
            log.append(mode, &format!("NOT A REPOSITORY: {}", plan.describe()));
            return ExecutionOutcome::NotARepository;
        }

        for (index, step) in plan.steps.iter().enumerate() {
            let args = self.resolve(step);
            tracing::info!("running git {}", args.join(" "));

            let (ok, output) = self.run_git(&args);
            if !ok {
                let verb = args.first().map(String::as_str).unwrap_or("command");
                voice.speak(&format!("Command failed: git {}", verb));
                log.append(
                    mode,
                    &format!("FAILED: git {} -> {}", args.join(" "), output.trim()),
                );
                return ExecutionOutcome::StepFailed { index, output };
            }
        }

        let push = plan
            .has_push()
            .then(|| self.push_current_branch(mode, log, voice));

        ExecutionOutcome::Success {
            steps_run: plan.steps.len(),
            push,
        }
    }

    /// Push to `origin/<branch>`, resolving the branch at this exact
    /// moment so a rename since planning is honored.
    fn push_current_branch(
        &self,
        mode: AsrMode,
        log: &CommandLog,
        voice: &mut Speaker,
    ) -> PushOutcome {
        let branch = self.current_branch();
        let (ok, output) = self.run_git(&[
            "push".to_string(),
            "origin".to_string(),
            branch.clone(),
        ]);

        if ok {
            voice.speak(&format!("Pushed to origin {}.", branch));
            log.append(mode, &format!("push -> origin/{}", branch));
        } else {
            voice.speak("Push failed. Check credentials or remote.");
            log.append(
                mode,
                &format!("PUSH FAILED -> origin/{} : {}", branch, output.trim()),
            );
        }

        PushOutcome { branch, ok, output }
    }

    /// Substitute the branch placeholder at execution time.
    fn resolve(&self, step: &GitStep) -> Vec<String> {
        step.args
            .iter()
            .map(|arg| {
                if arg == CURRENT_BRANCH {
                    self.current_branch()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }

    fn run_git(&self, args: &[String]) -> (bool, String) {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output();

        match output {
            Ok(o) => {
                let mut combined = String::from_utf8_lossy(&o.stdout).to_string();
                combined.push_str(&String::from_utf8_lossy(&o.stderr));
                (o.status.success(), combined)
            }
            Err(e) => (false, format!("failed to run git: {}", e)),
        }
    }
}
