mod common;

use common::{at, count_rows, kanban, FixedClock};
use kanban_core::db::open_db_in_memory;
use kanban_core::{
    CleanupRequest, DeleteRequest, DueDateRequest, EntityKind, OutcomeStatus, ScriptedConfirm,
    ServiceError, TaskStatus,
};

fn no_answers() -> ScriptedConfirm {
    ScriptedConfirm::new(Vec::<String>::new())
}

#[test]
fn scenario_create_use_add_and_list() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);

    kanban.new_collection("Work").unwrap();
    let switched = kanban.use_collection("Work").unwrap();
    assert_eq!(switched.status, OutcomeStatus::Done);
    assert_eq!(switched.lines[0], "Now working with collection: Work");

    kanban
        .new_task("Write report", Some("todo"), Some("01/01/2099"))
        .unwrap();
    let listing = kanban.list_tasks(None).unwrap().render();

    assert!(listing.starts_with("All tasks in collection 'Work': (1 Tasks)"));
    let todo = listing.find("-- Todo:").unwrap();
    let task = listing.find("[Task: \"Write report\"]").unwrap();
    assert!(todo < task && task < listing.find("-- In progress:").unwrap());
    assert!(listing.contains("Due date: 01/01/2099"));
}

#[test]
fn new_task_touches_collection() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();

    clock.set(at(9, 3, 2026, 11, 5));
    kanban.new_task("Draft", None, None).unwrap();

    let work = kanban.collections().get_by_name("Work").unwrap().unwrap();
    assert_eq!(work.updated_at(), Some(at(9, 3, 2026, 11, 5)));
}

#[test]
fn scenario_move_then_repeat_is_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("Write report", Some("todo"), None).unwrap();

    clock.set(at(9, 3, 2026, 12, 0));
    let moved = kanban.move_task("in_progress", "write report").unwrap();
    assert_eq!(moved.status, OutcomeStatus::Done);

    let work = kanban.collections().get_by_name("Work").unwrap().unwrap();
    let task = kanban.tasks().require_by_name(work.id(), "Write report").unwrap();
    assert_eq!(task.status(), TaskStatus::InProgress);
    assert_eq!(task.updated_at(), Some(at(9, 3, 2026, 12, 0)));

    let repeated = kanban.move_task("IN_PROGRESS", "Write report").unwrap();
    assert_eq!(repeated.status, OutcomeStatus::Unchanged);
    assert!(repeated.is_success());
    assert_eq!(
        repeated.lines,
        ["Task 'Write report' is already in status 'in_progress'."]
    );
}

#[test]
fn task_commands_need_active_collection() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();

    assert!(matches!(
        kanban.new_task("Draft", None, None),
        Err(ServiceError::NoActiveCollection)
    ));
    assert!(matches!(
        kanban.list_tasks(None),
        Err(ServiceError::NoActiveCollection)
    ));
    assert!(matches!(
        kanban.move_all("todo", "done", &mut no_answers()),
        Err(ServiceError::NoActiveCollection)
    ));
}

#[test]
fn use_switches_single_active_and_reports_repeat() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.new_collection("Home").unwrap();

    kanban.use_collection("Work").unwrap();
    kanban.use_collection("home").unwrap();
    let active: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM collections WHERE is_active = 1;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(active, 1);
    assert!(kanban
        .collections()
        .get_by_name("Home")
        .unwrap()
        .unwrap()
        .is_active());

    let repeat = kanban.use_collection("HOME").unwrap();
    assert_eq!(repeat.status, OutcomeStatus::Unchanged);
    assert_eq!(repeat.lines[0], "Collection 'Home' is already active.");

    let missing = kanban.use_collection("Garden").unwrap();
    assert_eq!(missing.status, OutcomeStatus::Rejected);
    assert_eq!(missing.notices, ["Collection 'Garden' not found."]);
    assert_eq!(missing.lines[0], "Available collections:");
    assert!(missing.render().contains("[Collection: \"Home\"] (active)"));
}

#[test]
fn delete_collection_cascades_to_tasks_after_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("a", None, None).unwrap();
    kanban.new_task("b", Some("done"), None).unwrap();
    let work_id = kanban.collections().get_by_name("Work").unwrap().unwrap().id();

    let request = DeleteRequest {
        kind: EntityKind::Collection,
        name: Some("work".to_string()),
        all: false,
        status: None,
    };

    let mut decline = ScriptedConfirm::new(["n"]);
    let cancelled = kanban.delete(&request, &mut decline).unwrap();
    assert_eq!(cancelled.status, OutcomeStatus::Cancelled);
    assert_eq!(cancelled.lines, ["Operation cancelled."]);
    assert_eq!(
        count_rows(&conn, "SELECT COUNT(*) FROM tasks WHERE collection_id = ?1;", work_id),
        2
    );

    let mut accept = ScriptedConfirm::new(["y"]);
    let deleted = kanban.delete(&request, &mut accept).unwrap();
    assert_eq!(deleted.status, OutcomeStatus::Done);
    assert_eq!(accept.asked(), ["Delete collection 'Work' and all its tasks?"]);
    assert_eq!(
        count_rows(&conn, "SELECT COUNT(*) FROM tasks WHERE collection_id = ?1;", work_id),
        0
    );
    assert!(matches!(
        kanban.list_tasks(None),
        Err(ServiceError::NoActiveCollection)
    ));
}

#[test]
fn scenario_delete_all_collections_declined_leaves_everything() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.new_collection("Home").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("a", None, None).unwrap();

    let request = DeleteRequest {
        kind: EntityKind::Collection,
        name: None,
        all: true,
        status: None,
    };
    let outcome = kanban
        .delete(&request, &mut ScriptedConfirm::new(["what", "n"]))
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Cancelled);
    assert_eq!(kanban.collections().list_all(kanban.tasks()).unwrap().len(), 2);

    let outcome = kanban.delete(&request, &mut ScriptedConfirm::new(["yes"])).unwrap();
    assert_eq!(outcome.lines, ["All collections deleted."]);
    assert!(kanban.collections().list_all(kanban.tasks()).unwrap().is_empty());
    let tasks_left: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tasks_left, 0);
}

#[test]
fn conflicting_flags_are_rejected_before_prompting() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("Report", None, None).unwrap();

    let mut confirm = ScriptedConfirm::new(["y", "y", "y", "y"]);

    let named_all = DeleteRequest {
        kind: EntityKind::Task,
        name: Some("Report".to_string()),
        all: true,
        status: None,
    };
    assert!(matches!(
        kanban.delete(&named_all, &mut confirm),
        Err(ServiceError::InvalidArgument(_))
    ));

    let both = CleanupRequest {
        all: true,
        status: Some("todo".to_string()),
    };
    assert!(kanban.cleanup(&both, &mut confirm).is_err());
    assert!(kanban
        .cleanup(&CleanupRequest::default(), &mut confirm)
        .is_err());

    assert!(kanban.move_all("todo", "TODO", &mut confirm).is_err());
    assert!(kanban.move_all("todo", "later", &mut confirm).is_err());

    let set_and_remove = DueDateRequest {
        name: "Report".to_string(),
        set: Some("01/01/2099".to_string()),
        remove: true,
    };
    assert!(kanban.due_date(&set_and_remove).is_err());

    assert!(confirm.asked().is_empty());
}

#[test]
fn status_on_collection_delete_is_ignored_with_notice() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();

    let request = DeleteRequest {
        kind: EntityKind::Collection,
        name: Some("Work".to_string()),
        all: false,
        status: Some("done".to_string()),
    };
    let outcome = kanban.delete(&request, &mut ScriptedConfirm::new(["y"])).unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Done);
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].contains("Ignoring --status"));
    assert!(kanban.collections().get_by_name("Work").unwrap().is_none());
}

#[test]
fn delete_tasks_by_status_and_all() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("a", None, None).unwrap();
    kanban.new_task("b", Some("done"), None).unwrap();
    kanban.new_task("c", Some("done"), None).unwrap();

    let by_status = DeleteRequest {
        kind: EntityKind::Task,
        name: None,
        all: true,
        status: Some("DONE".to_string()),
    };
    let mut confirm = ScriptedConfirm::new(["y"]);
    let outcome = kanban.delete(&by_status, &mut confirm).unwrap();
    assert_eq!(outcome.lines, ["2 task(s) with status 'done' deleted."]);
    assert_eq!(
        confirm.asked(),
        ["Delete ALL tasks with status 'done' in collection 'Work'?"]
    );

    let all = DeleteRequest {
        status: None,
        ..by_status
    };
    let outcome = kanban.delete(&all, &mut ScriptedConfirm::new(["y"])).unwrap();
    assert_eq!(outcome.lines, ["1 task(s) deleted."]);

    let single = DeleteRequest {
        kind: EntityKind::Task,
        name: Some("ghost".to_string()),
        all: false,
        status: None,
    };
    assert!(matches!(
        kanban.delete(&single, &mut no_answers()),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn blank_status_filter_is_rejected_before_prompting() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("a", None, None).unwrap();
    kanban.new_task("b", Some("done"), None).unwrap();

    let request = DeleteRequest {
        kind: EntityKind::Task,
        name: None,
        all: true,
        status: Some("  ".to_string()),
    };
    let mut confirm = ScriptedConfirm::new(["y"]);
    match kanban.delete(&request, &mut confirm) {
        Err(ServiceError::InvalidArgument(message)) => {
            assert!(message.starts_with("Invalid status:"), "{message}");
        }
        other => panic!("expected invalid status, got {other:?}"),
    }
    assert!(confirm.asked().is_empty());

    let work = kanban.collections().require_by_name("Work").unwrap();
    assert_eq!(kanban.tasks().list_all(work.id()).unwrap().len(), 2);
}

#[test]
fn move_all_moves_every_matching_task_after_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    for name in ["a", "b"] {
        kanban.new_task(name, None, None).unwrap();
    }
    kanban.new_task("c", Some("in_progress"), None).unwrap();

    let declined = kanban
        .move_all("todo", "done", &mut ScriptedConfirm::new([""]))
        .unwrap();
    assert_eq!(declined.status, OutcomeStatus::Cancelled);

    let outcome = kanban
        .move_all("todo", "done", &mut ScriptedConfirm::new(["Y"]))
        .unwrap();
    assert_eq!(outcome.lines, ["2 task(s) moved from 'todo' to 'done'."]);

    let work = kanban.collections().get_by_name("Work").unwrap().unwrap();
    assert!(kanban
        .tasks()
        .list_by_status(work.id(), TaskStatus::Todo)
        .unwrap()
        .is_empty());
    assert_eq!(
        kanban
            .tasks()
            .list_by_status(work.id(), TaskStatus::InProgress)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn cleanup_removes_only_expired_tasks() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(15, 12, 1999, 9, 0));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Archive").unwrap();
    kanban.use_collection("Archive").unwrap();
    kanban.new_task("Y2K audit", None, Some("01/01/2000")).unwrap();
    kanban
        .new_task("Y2K party", Some("done"), Some("01/01/2000"))
        .unwrap();
    kanban.new_task("Someday", None, None).unwrap();
    kanban.new_task("Far future", None, Some("01/01/2099")).unwrap();

    clock.set(at(9, 3, 2026, 10, 30));

    let todo_only = CleanupRequest {
        all: false,
        status: Some("todo".to_string()),
    };
    let mut confirm = ScriptedConfirm::new(["y"]);
    let outcome = kanban.cleanup(&todo_only, &mut confirm).unwrap();
    assert_eq!(outcome.lines, ["1 expired task(s) removed."]);
    assert_eq!(
        confirm.asked(),
        ["Remove expired tasks with status 'todo' from collection 'Archive'?"]
    );

    let everything = CleanupRequest {
        all: true,
        status: None,
    };
    let outcome = kanban
        .cleanup(&everything, &mut ScriptedConfirm::new(["y"]))
        .unwrap();
    assert_eq!(outcome.lines, ["1 expired task(s) removed."]);

    let archive = kanban.collections().get_by_name("Archive").unwrap().unwrap();
    let names: Vec<_> = kanban
        .tasks()
        .list_all(archive.id())
        .unwrap()
        .into_iter()
        .map(|task| task.name().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Someday".to_string()));
    assert!(names.contains(&"Far future".to_string()));
}

#[test]
fn due_date_command_sets_and_removes() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.new_task("Report", None, None).unwrap();

    let set = DueDateRequest {
        name: "report".to_string(),
        set: Some("31/12/2026".to_string()),
        remove: false,
    };
    let outcome = kanban.due_date(&set).unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Done);
    assert!(outcome.render().contains("Due date: 31/12/2026"));

    assert_eq!(kanban.due_date(&set).unwrap().status, OutcomeStatus::Unchanged);

    let remove = DueDateRequest {
        name: "Report".to_string(),
        set: None,
        remove: true,
    };
    assert_eq!(kanban.due_date(&remove).unwrap().status, OutcomeStatus::Done);
    let again = kanban.due_date(&remove).unwrap();
    assert_eq!(again.status, OutcomeStatus::Unchanged);
    assert_eq!(again.lines, ["Task 'Report' does not have a due date."]);

    let past = DueDateRequest {
        name: "Report".to_string(),
        set: Some("08/03/2026".to_string()),
        remove: false,
    };
    assert!(matches!(
        kanban.due_date(&past),
        Err(ServiceError::InvalidDueDate)
    ));
}

#[test]
fn rename_collection_refreshes_active_context() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::at(at(9, 3, 2026, 10, 30));
    let mut kanban = kanban(&conn, &clock);
    kanban.new_collection("Work").unwrap();
    kanban.use_collection("Work").unwrap();
    kanban.list_tasks(None).unwrap();

    kanban
        .rename(EntityKind::Collection, "Work", "Office")
        .unwrap();
    let listing = kanban.list_tasks(None).unwrap();
    assert_eq!(listing.lines[0], "All tasks in collection 'Office': (0 Tasks)");

    kanban.new_task("Draft", None, None).unwrap();
    let renamed = kanban.rename(EntityKind::Task, "draft", "Final").unwrap();
    assert!(renamed.render().contains("[Task: \"Final\"]"));

    let same = kanban.rename(EntityKind::Collection, "office", "Office").unwrap();
    assert_eq!(same.status, OutcomeStatus::Unchanged);
    assert_eq!(same.lines, ["Collection 'Office' already has that name."]);
    let same = kanban.rename(EntityKind::Task, "Final", "Final").unwrap();
    assert_eq!(same.status, OutcomeStatus::Unchanged);
}
