use super::*;

#[test]
fn rule_order_is_the_documented_contract() {
    assert_eq!(
        rule_names(),
        vec![
            "commit-quoted-message",
            "commit-file",
            "commit-bare",
            "push",
            "pull",
            "status",
            "create-branch",
            "switch-branch",
            "undo",
        ]
    );
}

#[test]
fn quoted_commit_wins_over_bare_commit() {
    let intent = parse("commit message \"fix bug\"");
    assert_eq!(
        intent,
        Intent::Commit {
            message: Some("fix bug".to_string()),
            file: None,
        }
    );

    // Single quotes work too
    let intent = parse("commit message 'initial work'");
    assert_eq!(
        intent,
        Intent::Commit {
            message: Some("initial work".to_string()),
            file: None,
        }
    );
}

#[test]
fn commit_without_message_is_bare() {
    assert_eq!(
        parse("commit"),
        Intent::Commit {
            message: None,
            file: None,
        }
    );
    assert_eq!(
        parse("please commit everything"),
        Intent::Commit {
            message: None,
            file: None,
        }
    );
}

#[test]
fn commit_naming_a_file() {
    assert_eq!(
        parse("commit file src/main.rs"),
        Intent::Commit {
            message: None,
            file: Some("src/main.rs".to_string()),
        }
    );

    assert_eq!(
        parse("commit the file notes.txt with message 'tidy up'"),
        Intent::Commit {
            message: Some("tidy up".to_string()),
            file: Some("notes.txt".to_string()),
        }
    );
}

#[test]
fn simple_keywords() {
    assert_eq!(parse("push"), Intent::Push);
    assert_eq!(parse("push it now"), Intent::Push);
    assert_eq!(parse("pull"), Intent::Pull);
    assert_eq!(parse("status"), Intent::Status);
    assert_eq!(parse("show me the status"), Intent::Status);
}

#[test]
fn create_branch_extracts_name() {
    assert_eq!(
        parse("create branch feature-x"),
        Intent::CreateBranch {
            name: "feature-x".to_string(),
        }
    );
}

#[test]
fn malformed_create_branch_is_unknown_not_a_crash() {
    let intent = parse("create branch");
    assert!(matches!(intent, Intent::Unknown { .. }));

    let intent = parse("create branch !!!");
    assert!(matches!(intent, Intent::Unknown { .. }));
}

#[test]
fn switch_and_checkout_forms() {
    assert_eq!(
        parse("switch to develop"),
        Intent::SwitchBranch {
            name: "develop".to_string(),
        }
    );
    assert_eq!(
        parse("checkout branch main"),
        Intent::SwitchBranch {
            name: "main".to_string(),
        }
    );
}

#[test]
fn undo_phrases_reach_the_undo_rule() {
    // "undo last commit" contains "commit" but must not parse as a commit
    assert_eq!(parse("undo last commit"), Intent::Undo);
    assert_eq!(parse("revert last commit"), Intent::Undo);
    assert_eq!(parse("undo"), Intent::Undo);
}

#[test]
fn unknown_carries_raw_text() {
    assert_eq!(
        parse("hello there"),
        Intent::Unknown {
            raw: "hello there".to_string(),
        }
    );
}

#[test]
fn parsing_is_case_insensitive_and_whitespace_normalized() {
    assert_eq!(
        parse("  Commit   Message 'Fix  it'  "),
        Intent::Commit {
            message: Some("fix it".to_string()),
            file: None,
        }
    );
    assert_eq!(parse("PUSH"), Intent::Push);
}

#[test]
fn parsing_is_idempotent() {
    for text in [
        "commit message 'x'",
        "push",
        "create branch topic",
        "gibberish input",
    ] {
        assert_eq!(parse(text), parse(text));
    }
}

#[test]
fn sensitive_intents_are_the_auth_gated_set() {
    assert!(parse("commit").is_sensitive());
    assert!(parse("push").is_sensitive());
    assert!(parse("undo").is_sensitive());
    assert!(parse("create branch b").is_sensitive());

    assert!(!parse("pull").is_sensitive());
    assert!(!parse("status").is_sensitive());
    assert!(!parse("switch to main").is_sensitive());
    assert!(!parse("who knows").is_sensitive());
}
