//! Collection entity.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `updated_at`, when set, is not earlier than `created_at`.
//! - `task_count` is derived from tasks at read time and never persisted.

use super::timestamp::{format_datetime, truncate_to_minute};
use super::validation::{ensure_positive, normalize_name, ValidationError};
use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

/// Storage-assigned collection identifier.
pub type CollectionId = i64;

/// Validated input for inserting a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    name: String,
    created_at: NaiveDateTime,
}

impl NewCollection {
    pub fn new(name: &str, created_at: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self {
            name: normalize_name("Collection", name)?,
            created_at: truncate_to_minute(created_at),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// Named group of tasks; at most one collection is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    id: CollectionId,
    name: String,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
    is_active: bool,
    task_count: u32,
}

impl Collection {
    /// Builds an inactive collection with no update timestamp.
    pub fn new(
        id: CollectionId,
        name: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ensure_positive("collection id", id)?,
            name: normalize_name("Collection", name)?,
            created_at: truncate_to_minute(created_at),
            updated_at: None,
            is_active: false,
            task_count: 0,
        })
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn task_count(&self) -> u32 {
        self.task_count
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = normalize_name("Collection", name)?;
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

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn set_task_count(&mut self, count: u32) {
        self.task_count = count;
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Collection: \"{}\"]", self.name)?;
        if self.is_active {
            write!(f, " (active)")?;
        }
        write!(f, "\n ├─ Created at: {}", format_datetime(&self.created_at))?;
        if let Some(updated_at) = self.updated_at {
            write!(f, "\n ├─ Updated at: {}", format_datetime(&updated_at))?;
        }
        write!(f, "\n └─ Tasks: {}", self.task_count)
    }
}
