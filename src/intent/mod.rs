//! Transcript-to-intent parsing.
//!
//! A fixed, ordered table of rules maps normalized transcript text to a
//! structured [`Intent`]. First match wins, and the order is load-bearing:
//! three rules share the keyword "commit", so the quoted-message and
//! file-naming forms must run before the bare form. The table's order is
//! itself a tested contract.
//!
//! Parsing is pure, case-insensitive, whitespace-normalized, and total:
//! malformed input resolves to `Intent::Unknown`, never a panic.

#[cfg(test)]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

/// A recognized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Commit staged or all changes, optionally scoped to one file
    Commit {
        message: Option<String>,
        file: Option<String>,
    },
    /// Push the current branch to origin
    Push,
    /// Pull from the tracked remote
    Pull,
    /// Show working tree status
    Status,
    /// Create a branch and switch to it
    CreateBranch { name: String },
    /// Switch to an existing branch
    SwitchBranch { name: String },
    /// Soft-reset the last commit
    Undo,
    /// Nothing matched; carries the raw text for diagnostics
    Unknown { raw: String },
}

impl Intent {
    /// Whether this command is gated behind voice authentication.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Intent::Commit { .. } | Intent::Push | Intent::Undo | Intent::CreateBranch { .. }
        )
    }
}

/// One parsing rule: a named predicate/extractor/constructor.
struct Rule {
    name: &'static str,
    apply: fn(&str) -> Option<Intent>,
}

static QUOTED_COMMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"commit (?:message )?["'](.+?)["']"#).unwrap());

static FILE_COMMIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"commit (?:the )?file ([\w./\-]+)(?: (?:with )?message ["'](.+?)["'])?"#).unwrap()
});

static CREATE_BRANCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"create branch ([\w\-]+)").unwrap());

static SWITCH_BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:switch to|checkout) (?:branch )?([\w\-]+)").unwrap());

fn commit_with_quoted_message(text: &str) -> Option<Intent> {
    if !text.contains("commit") {
        return None;
    }
    let caps = QUOTED_COMMIT.captures(text)?;
    Some(Intent::Commit {
        message: Some(caps[1].to_string()),
        file: None,
    })
}

fn commit_with_file(text: &str) -> Option<Intent> {
    let caps = FILE_COMMIT.captures(text)?;
    Some(Intent::Commit {
        message: caps.get(2).map(|m| m.as_str().to_string()),
        file: Some(caps[1].to_string()),
    })
}

fn bare_commit(text: &str) -> Option<Intent> {
    // "undo last commit" must reach the undo rule below
    if text.contains("undo") || text.contains("revert") {
        return None;
    }
    if !text.contains("commit") {
        return None;
    }
    Some(Intent::Commit {
        message: None,
        file: None,
    })
}

fn push(text: &str) -> Option<Intent> {
    text.contains("push").then_some(Intent::Push)
}

fn pull(text: &str) -> Option<Intent> {
    text.contains("pull").then_some(Intent::Pull)
}

fn status(text: &str) -> Option<Intent> {
    text.contains("status").then_some(Intent::Status)
}

fn create_branch(text: &str) -> Option<Intent> {
    if !text.contains("create branch") {
        return None;
    }
    match CREATE_BRANCH.captures(text) {
        Some(caps) => Some(Intent::CreateBranch {
            name: caps[1].to_string(),
        }),
        // Keyword present but no extractable name: still a definite answer
        None => Some(Intent::Unknown {
            raw: text.to_string(),
        }),
    }
}

fn switch_branch(text: &str) -> Option<Intent> {
    if !text.contains("switch to") && !text.contains("checkout") {
        return None;
    }
    let caps = SWITCH_BRANCH.captures(text)?;
    Some(Intent::SwitchBranch {
        name: caps[1].to_string(),
    })
}

fn undo(text: &str) -> Option<Intent> {
    (text.contains("undo last commit") || text.contains("revert last commit") || text.contains("undo"))
        .then_some(Intent::Undo)
}

/// The ordered rule table. First match wins.
static RULES: &[Rule] = &[
    Rule {
        name: "commit-quoted-message",
        apply: commit_with_quoted_message,
    },
    Rule {
        name: "commit-file",
        apply: commit_with_file,
    },
    Rule {
        name: "commit-bare",
        apply: bare_commit,
    },
    Rule {
        name: "push",
        apply: push,
    },
    Rule {
        name: "pull",
        apply: pull,
    },
    Rule {
        name: "status",
        apply: status,
    },
    Rule {
        name: "create-branch",
        apply: create_branch,
    },
    Rule {
        name: "switch-branch",
        apply: switch_branch,
    },
    Rule {
        name: "undo",
        apply: undo,
    },
];

/// Parse a transcript into an intent.
///
/// Callers never pass empty text here; an empty transcript means "no
/// intent" and is handled upstream without a parse attempt.
pub fn parse(text: &str) -> Intent {
    let normalized = normalize(text);

    for rule in RULES {
        if let Some(intent) = (rule.apply)(&normalized) {
            tracing::debug!(rule = rule.name, "intent matched");
            return intent;
        }
    }

    Intent::Unknown {
        raw: text.trim().to_string(),
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
pub(crate) fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|r| r.name).collect()
}
