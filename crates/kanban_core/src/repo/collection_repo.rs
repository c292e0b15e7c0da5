//! Collection repository contract and SQLite implementation.
//!
//! # Invariants
//! - Name lookups are case-insensitive over trimmed input.
//! - Switching the active collection is a single transaction: after it
//!   commits exactly one row has `is_active = 1`.
//! - Deleting a collection removes its tasks in the same transaction.

use crate::model::timestamp::{format_datetime, parse_datetime};
use crate::model::{Collection, CollectionId, NewCollection};
use crate::repo::{bool_to_int, ensure_connection_ready, map_unique_violation, RepoError, RepoResult};
use chrono::NaiveDateTime;
use log::error;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLLECTION_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_at,
    updated_at,
    is_active
FROM collections";

/// Storage contract for collection records.
pub trait CollectionRepository {
    fn create_collection(&self, draft: &NewCollection) -> RepoResult<Collection>;
    fn find_collection_by_name(&self, name: &str) -> RepoResult<Option<Collection>>;
    /// All collections, newest `created_at` first.
    fn list_collections(&self) -> RepoResult<Vec<Collection>>;
    fn rename_collection(
        &self,
        id: CollectionId,
        new_name: &str,
        updated_at: NaiveDateTime,
    ) -> RepoResult<()>;
    /// Deletes the collection and its tasks; returns the task rows removed.
    fn delete_collection(&self, id: CollectionId) -> RepoResult<usize>;
    /// Deletes every collection and task; returns `(collections, tasks)` removed.
    fn delete_all_collections(&self) -> RepoResult<(usize, usize)>;
    /// Clears every active flag, then activates the named collection.
    fn set_active(&self, name: &str) -> RepoResult<()>;
    fn clear_all_active(&self) -> RepoResult<()>;
    fn load_active_collection(&self) -> RepoResult<Option<Collection>>;
}

/// SQLite-backed collection repository.
#[derive(Clone, Copy)]
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Constructs a repository from a connection carrying the kanban schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, sql: &str, param: &dyn rusqlite::ToSql) -> RepoResult<Option<Collection>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([param])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_collection_row(row)?));
        }
        Ok(None)
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn create_collection(&self, draft: &NewCollection) -> RepoResult<Collection> {
        self.conn
            .execute(
                "INSERT INTO collections (name, created_at, updated_at, is_active)
                 VALUES (?1, ?2, NULL, 0);",
                params![draft.name(), format_datetime(&draft.created_at())],
            )
            .map_err(|err| map_unique_violation(err, draft.name()))?;

        let id = self.conn.last_insert_rowid();
        Ok(Collection::new(id, draft.name(), draft.created_at())?)
    }

    fn find_collection_by_name(&self, name: &str) -> RepoResult<Option<Collection>> {
        let name = name.trim();
        self.query_one(
            &format!("{COLLECTION_SELECT_SQL} WHERE name = ?1 COLLATE NOCASE;"),
            &name,
        )
    }

    fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!("{COLLECTION_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut collections = Vec::new();
        while let Some(row) = rows.next()? {
            collections.push(parse_collection_row(row)?);
        }

        // Stored timestamps are day-first text, so order after parsing.
        collections.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(collections)
    }

    fn rename_collection(
        &self,
        id: CollectionId,
        new_name: &str,
        updated_at: NaiveDateTime,
    ) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE collections SET name = ?1, updated_at = ?2 WHERE id = ?3;",
                params![new_name, format_datetime(&updated_at), id],
            )
            .map_err(|err| map_unique_violation(err, new_name))?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("collection {id}")));
        }
        Ok(())
    }

    fn delete_collection(&self, id: CollectionId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let tasks_removed = tx.execute("DELETE FROM tasks WHERE collection_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM collections WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("collection {id}")));
        }
        tx.commit()?;
        Ok(tasks_removed)
    }

    fn delete_all_collections(&self) -> RepoResult<(usize, usize)> {
        let tx = self.conn.unchecked_transaction()?;
        let tasks_removed = tx.execute("DELETE FROM tasks;", [])?;
        let collections_removed = tx.execute("DELETE FROM collections;", [])?;
        tx.commit()?;
        Ok((collections_removed, tasks_removed))
    }

    fn set_active(&self, name: &str) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("UPDATE collections SET is_active = 0;", [])?;
        let changed = tx.execute(
            "UPDATE collections SET is_active = 1 WHERE name = ?1 COLLATE NOCASE;",
            [name.trim()],
        )?;

        if changed != 1 {
            // Dropping `tx` rolls back, so the previous active flag survives.
            error!(
                "event=collection_set_active module=repo status=error rows={}",
                changed
            );
            return Err(RepoError::NotFound(format!("collection `{}`", name.trim())));
        }

        tx.commit()?;
        Ok(())
    }

    fn clear_all_active(&self) -> RepoResult<()> {
        self.conn
            .execute("UPDATE collections SET is_active = 0;", [])?;
        Ok(())
    }

    fn load_active_collection(&self) -> RepoResult<Option<Collection>> {
        let collection = self
            .conn
            .query_row(
                &format!("{COLLECTION_SELECT_SQL} WHERE is_active = ?1 ORDER BY id LIMIT 1;"),
                [bool_to_int(true)],
                |row| Ok(parse_collection_row(row)),
            )
            .optional()?;

        collection.transpose()
    }
}

fn parse_collection_row(row: &Row<'_>) -> RepoResult<Collection> {
    let id: CollectionId = row.get("id")?;
    let name: String = row.get("name")?;

    let created_text: String = row.get("created_at")?;
    let created_at = parse_datetime(&created_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_text}` in collections.created_at"
        ))
    })?;

    let updated_at = match row.get::<_, Option<String>>("updated_at")? {
        Some(text) => Some(parse_datetime(&text).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{text}` in collections.updated_at"
            ))
        })?),
        None => None,
    };

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in collections.is_active"
            )));
        }
    };

    let mut collection = Collection::new(id, &name, created_at)?;
    collection.set_updated_at(updated_at)?;
    collection.set_active(is_active);
    Ok(collection)
}
