//! Integration tests for collection commands: new, use, list, rename, delete.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_new_collection_then_list_shows_it() {
    let env = TestEnv::new();

    env.kanban()
        .args(["new", "collection", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Collection created successfully!"))
        .stdout(predicate::str::contains("[Collection: \"Work\"]"));

    env.kanban()
        .args(["list", "collection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Collection: \"Work\"]"))
        .stdout(predicate::str::contains("Tasks: 0"));
}

#[test]
fn test_multi_word_names_are_joined() {
    let env = TestEnv::new();

    env.kanban()
        .args(["new", "collection", "Home", "chores"])
        .assert()
        .success();
    env.kanban()
        .args(["use", "home", "CHORES"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Now working with collection: Home chores",
        ));
}

#[test]
fn test_duplicate_collection_name_is_case_insensitive() {
    let env = TestEnv::new();
    env.kanban().args(["new", "collection", "Work"]).assert().success();

    env.kanban()
        .args(["new", "collection", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_use_marks_single_active_and_repeat_is_informational() {
    let env = TestEnv::new();
    env.kanban().args(["new", "collection", "Work"]).assert().success();
    env.kanban().args(["new", "collection", "Home"]).assert().success();

    env.kanban().args(["use", "Work"]).assert().success();
    env.kanban()
        .args(["use", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Now working with collection: Home"));

    env.kanban()
        .args(["use", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is already active"));

    let listing = env.kanban().args(["list", "collection"]).output().unwrap();
    let stdout = String::from_utf8(listing.stdout).unwrap();
    assert_eq!(stdout.matches("(active)").count(), 1);
    assert!(stdout.contains("[Collection: \"Home\"] (active)"));
}

#[test]
fn test_use_unknown_collection_lists_alternatives() {
    let env = TestEnv::new();

    env.kanban()
        .args(["use", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Collection 'Nowhere' not found."))
        .stdout(predicate::str::contains("No collections found."));

    env.kanban().args(["new", "collection", "Work"]).assert().success();
    env.kanban()
        .args(["use", "Nowhere"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Available collections:"))
        .stdout(predicate::str::contains("[Collection: \"Work\"]"));
}

#[test]
fn test_rename_collection_keeps_it_active() {
    let env = TestEnv::with_active("Work");

    env.kanban()
        .args(["rename", "collection", "Work", "Office", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Collection: \"Office work\"] (active)"));

    env.kanban()
        .args(["list", "task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collection 'Office work'"));
}

#[test]
fn test_delete_collection_requires_confirmation() {
    let env = TestEnv::with_active("Work");
    env.kanban().args(["new", "task", "Draft"]).assert().success();

    env.kanban()
        .args(["delete", "collection", "Work"])
        .write_stdin("maybe\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));
    env.kanban()
        .args(["list", "collection"])
        .assert()
        .stdout(predicate::str::contains("Tasks: 1"));

    env.kanban()
        .args(["delete", "collection", "Work"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collection 'Work' deleted"));
    env.kanban()
        .args(["list", "task"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active collection"));
}

#[test]
fn test_delete_collection_with_status_warns_and_ignores_it() {
    let env = TestEnv::with_active("Work");

    env.kanban()
        .args(["delete", "collection", "Work", "--status", "done"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring --status"))
        .stdout(predicate::str::contains("Collection 'Work' deleted"));
}

#[test]
fn test_delete_all_collections_declined_leaves_everything() {
    let env = TestEnv::with_active("Work");
    env.kanban().args(["new", "collection", "Home"]).assert().success();

    env.kanban()
        .args(["delete", "collection", "--all"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));

    env.kanban()
        .args(["list", "collection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Work\""))
        .stdout(predicate::str::contains("\"Home\""));

    env.kanban()
        .args(["delete", "collection", "--all"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("All collections deleted."));
    env.kanban()
        .args(["list", "collection"])
        .assert()
        .stdout(predicate::str::contains("No collections found."));
}

#[test]
fn test_all_with_name_is_rejected_before_prompt() {
    let env = TestEnv::with_active("Work");

    env.kanban()
        .args(["delete", "collection", "Work", "--all"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("(y/n)").not())
        .stderr(predicate::str::contains("Cannot use --all together with a name."));
}

#[test]
fn test_commands_write_log_file() {
    let env = TestEnv::new();
    env.kanban().args(["new", "collection", "Work"]).assert().success();

    let log = std::fs::read_dir(env.log_dir())
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| std::fs::read_to_string(entry.path()).unwrap_or_default())
        .collect::<String>();
    assert!(log.contains("event=collection_create"));
    assert!(!log.contains("Work"));
}
