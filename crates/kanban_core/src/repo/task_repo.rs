//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Every query is scoped by `collection_id`; no call reaches across
//!   collections.
//! - Name lookups are case-insensitive over trimmed input.
//! - Bulk mutations report the number of rows they changed.
//! - Creating a task stamps its collection's `updated_at` in the same
//!   transaction.

use crate::model::timestamp::{format_datetime, parse_datetime};
use crate::model::{CollectionId, NewTask, Task, TaskId, TaskStatus};
use crate::repo::{ensure_connection_ready, map_unique_violation, RepoError, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    status,
    due_date,
    created_at,
    updated_at,
    collection_id
FROM tasks";

/// Storage contract for task records.
pub trait TaskRepository {
    /// Inserts the task and stamps the owning collection as updated.
    fn create_task(&self, draft: &NewTask) -> RepoResult<Task>;
    fn find_task_by_name(&self, collection_id: CollectionId, name: &str)
        -> RepoResult<Option<Task>>;
    /// Tasks of one collection, newest `created_at` first.
    fn list_tasks(&self, collection_id: CollectionId) -> RepoResult<Vec<Task>>;
    fn list_tasks_by_status(
        &self,
        collection_id: CollectionId,
        status: TaskStatus,
    ) -> RepoResult<Vec<Task>>;
    /// Persists name, status, due date and update timestamp.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn move_all_by_status(
        &self,
        collection_id: CollectionId,
        from: TaskStatus,
        to: TaskStatus,
        updated_at: NaiveDateTime,
    ) -> RepoResult<usize>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn delete_tasks_by_status(
        &self,
        collection_id: CollectionId,
        status: TaskStatus,
    ) -> RepoResult<usize>;
    fn delete_tasks_by_collection(&self, collection_id: CollectionId) -> RepoResult<usize>;
    fn count_tasks_by_collection(&self, collection_id: CollectionId) -> RepoResult<u32>;
}

/// SQLite-backed task repository.
#[derive(Clone, Copy)]
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a connection carrying the kanban schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_tasks(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        tasks.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, draft: &NewTask) -> RepoResult<Task> {
        let created_at = format_datetime(&draft.created_at());
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tasks (name, status, due_date, created_at, updated_at, collection_id)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5);",
            params![
                draft.name(),
                draft.status().as_str(),
                draft.due_date().as_ref().map(format_datetime),
                created_at,
                draft.collection_id(),
            ],
        )
        .map_err(|err| map_unique_violation(err, draft.name()))?;
        let id = tx.last_insert_rowid();

        let touched = tx.execute(
            "UPDATE collections SET updated_at = ?1 WHERE id = ?2;",
            params![created_at, draft.collection_id()],
        )?;
        if touched == 0 {
            return Err(RepoError::NotFound(format!(
                "collection {}",
                draft.collection_id()
            )));
        }

        let task = Task::from_new(id, draft)?;
        tx.commit()?;
        Ok(task)
    }

    fn find_task_by_name(
        &self,
        collection_id: CollectionId,
        name: &str,
    ) -> RepoResult<Option<Task>> {
        let tasks = self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE collection_id = ?1 AND name = ?2 COLLATE NOCASE;"),
            vec![
                Value::Integer(collection_id),
                Value::Text(name.trim().to_string()),
            ],
        )?;
        Ok(tasks.into_iter().next())
    }

    fn list_tasks(&self, collection_id: CollectionId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE collection_id = ?1;"),
            vec![Value::Integer(collection_id)],
        )
    }

    fn list_tasks_by_status(
        &self,
        collection_id: CollectionId,
        status: TaskStatus,
    ) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE collection_id = ?1 AND status = ?2;"),
            vec![
                Value::Integer(collection_id),
                Value::Text(status.as_str().to_string()),
            ],
        )
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks
                 SET
                    name = ?1,
                    status = ?2,
                    due_date = ?3,
                    updated_at = ?4
                 WHERE id = ?5;",
                params![
                    task.name(),
                    task.status().as_str(),
                    task.due_date().as_ref().map(format_datetime),
                    task.updated_at().as_ref().map(format_datetime),
                    task.id(),
                ],
            )
            .map_err(|err| map_unique_violation(err, task.name()))?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("task {}", task.id())));
        }
        Ok(())
    }

    fn move_all_by_status(
        &self,
        collection_id: CollectionId,
        from: TaskStatus,
        to: TaskStatus,
        updated_at: NaiveDateTime,
    ) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET status = ?1, updated_at = ?2
             WHERE collection_id = ?3
               AND status = ?4;",
            params![
                to.as_str(),
                format_datetime(&updated_at),
                collection_id,
                from.as_str(),
            ],
        )?;
        Ok(changed)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    fn delete_tasks_by_status(
        &self,
        collection_id: CollectionId,
        status: TaskStatus,
    ) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE collection_id = ?1 AND status = ?2;",
            params![collection_id, status.as_str()],
        )?;
        Ok(changed)
    }

    fn delete_tasks_by_collection(&self, collection_id: CollectionId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE collection_id = ?1;", [collection_id])?;
        Ok(changed)
    }

    fn count_tasks_by_collection(&self, collection_id: CollectionId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE collection_id = ?1;",
            [collection_id],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;
    let collection_id: CollectionId = row.get("collection_id")?;
    let name: String = row.get("name")?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let created_at = parse_column_timestamp(row, "created_at")?.ok_or_else(|| {
        RepoError::InvalidData("missing timestamp in tasks.created_at".to_string())
    })?;
    let due_date = parse_column_timestamp(row, "due_date")?;
    let updated_at = parse_column_timestamp(row, "updated_at")?;

    let mut task = Task::new(id, collection_id, &name, created_at)?;
    task.set_status(status);
    task.set_due_date(due_date)?;
    task.set_updated_at(updated_at)?;
    Ok(task)
}

fn parse_column_timestamp(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => parse_datetime(&text).map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid timestamp `{text}` in tasks.{column}"))
        }),
        None => Ok(None),
    }
}
