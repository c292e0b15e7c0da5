//! Task entity.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `collection_id` is positive and fixed after creation.
//! - `due_date` and `updated_at`, when set, are not earlier than `created_at`.

use super::collection::CollectionId;
use super::status::TaskStatus;
use super::timestamp::{format_date, format_datetime, truncate_to_minute};
use super::validation::{ensure_positive, normalize_name, ValidationError};
use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// Validated input for inserting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    collection_id: CollectionId,
    name: String,
    status: TaskStatus,
    due_date: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl NewTask {
    /// Starts a `todo` task without a due date.
    pub fn new(
        collection_id: CollectionId,
        name: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            collection_id: ensure_positive("collection_id", collection_id)?,
            name: normalize_name("Task", name)?,
            status: TaskStatus::Todo,
            due_date: None,
            created_at: truncate_to_minute(created_at),
        })
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDateTime>) -> Result<Self, ValidationError> {
        self.due_date = checked_due_date(self.created_at, due_date)?;
        Ok(self)
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDateTime> {
        self.due_date
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// Unit of work owned by exactly one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    collection_id: CollectionId,
    name: String,
    status: TaskStatus,
    due_date: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
}

impl Task {
    /// Builds a `todo` task with no due date and no update timestamp.
    pub fn new(
        id: TaskId,
        collection_id: CollectionId,
        name: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ensure_positive("task id", id)?,
            collection_id: ensure_positive("collection_id", collection_id)?,
            name: normalize_name("Task", name)?,
            status: TaskStatus::Todo,
            due_date: None,
            created_at: truncate_to_minute(created_at),
            updated_at: None,
        })
    }

    /// Materializes a persisted draft under its assigned id.
    pub fn from_new(id: TaskId, draft: &NewTask) -> Result<Self, ValidationError> {
        let mut task = Self::new(id, draft.collection_id, &draft.name, draft.created_at)?;
        task.status = draft.status;
        task.set_due_date(draft.due_date)?;
        Ok(task)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDateTime> {
        self.due_date
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = normalize_name("Task", name)?;
        Ok(())
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDateTime>) -> Result<(), ValidationError> {
        self.due_date = checked_due_date(self.created_at, due_date)?;
        Ok(())
    }

    pub fn set_updated_at(&mut self, value: Option<NaiveDateTime>) -> Result<(), ValidationError> {
        let value = value.map(truncate_to_minute);
        if value.is_some_and(|at| at < self.created_at) {
            return Err(ValidationError::BeforeCreation {
                field: "updated_at",
            });
        }
        self.updated_at = value;
        Ok(())
    }

    /// A task is expired when its due date lies strictly before `now`.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

fn checked_due_date(
    created_at: NaiveDateTime,
    due_date: Option<NaiveDateTime>,
) -> Result<Option<NaiveDateTime>, ValidationError> {
    let due_date = due_date.map(truncate_to_minute);
    if due_date.is_some_and(|due| due < created_at) {
        return Err(ValidationError::BeforeCreation { field: "due_date" });
    }
    Ok(due_date)
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Task: \"{}\"]", self.name)?;
        write!(f, "\n ├─ Status: {}", self.status.as_str().to_uppercase())?;
        if let Some(due_date) = self.due_date {
            write!(f, "\n ├─ Due date: {}", format_date(&due_date))?;
        }
        if let Some(updated_at) = self.updated_at {
            write!(f, "\n ├─ Updated at: {}", format_datetime(&updated_at))?;
        }
        write!(f, "\n └─ Created at: {}", format_datetime(&self.created_at))
    }
}
