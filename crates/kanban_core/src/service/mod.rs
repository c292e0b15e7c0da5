//! Registry services and the active-collection context.
//!
//! # Responsibility
//! - Enforce name uniqueness, scope rules and no-op detection above storage.
//! - Translate repository failures into the user-facing error taxonomy.
//!
//! # Invariants
//! - Storage failures are logged here, once, before they reach callers.
//! - `AlreadyInState` is informational; callers must not treat it as fatal.

use crate::model::ValidationError;
use crate::repo::{RepoError, RepoResult};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection_service;
pub mod context;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entity addressed by a command's type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Collection,
    Task,
}

/// Error taxonomy shared by registries and command operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Bad or missing user input.
    InvalidArgument(String),
    NotFound { kind: EntityKind, name: String },
    DuplicateName { kind: EntityKind, name: String },
    NoActiveCollection,
    /// Due date precedes the task's creation time.
    InvalidDueDate,
    /// Requested change matches current state; nothing was written.
    AlreadyInState(String),
    /// Confirmation input could not be read.
    Prompt(std::io::Error),
    Repo(RepoError),
}

impl ServiceError {
    /// True for notices that should not fail the command.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::AlreadyInState(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::NotFound {
                kind: EntityKind::Collection,
                name,
            } => write!(f, "Collection '{name}' not found."),
            Self::NotFound {
                kind: EntityKind::Task,
                name,
            } => write!(f, "Task '{name}' not found in the active collection."),
            Self::DuplicateName {
                kind: EntityKind::Collection,
                name,
            } => write!(f, "Collection with name '{name}' already exists."),
            Self::DuplicateName {
                kind: EntityKind::Task,
                name,
            } => write!(f, "Task with name '{name}' already exists in this collection."),
            Self::NoActiveCollection => {
                write!(f, "No active collection. Use 'use <collection-name>' first.")
            }
            Self::InvalidDueDate => write!(f, "Due date cannot be before the task creation date."),
            Self::AlreadyInState(message) => write!(f, "{message}"),
            Self::Prompt(err) => write!(f, "failed to read confirmation: {err}"),
            Self::Repo(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Prompt(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::BeforeCreation { field: "due_date" } => Self::InvalidDueDate,
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

/// Converts a repository result, logging storage-level failures.
pub(crate) fn storage<T>(event: &'static str, result: RepoResult<T>) -> ServiceResult<T> {
    result.map_err(|err| {
        if matches!(
            err,
            RepoError::Db(_) | RepoError::InvalidData(_) | RepoError::UninitializedConnection { .. }
        ) {
            error!("event={event} module=service status=error error={err}");
        }
        err.into()
    })
}

/// Like [`storage`], but reports a uniqueness violation as `DuplicateName`.
pub(crate) fn storage_write<T>(
    event: &'static str,
    kind: EntityKind,
    result: RepoResult<T>,
) -> ServiceResult<T> {
    match result {
        Err(RepoError::DuplicateName(name)) => Err(ServiceError::DuplicateName { kind, name }),
        other => storage(event, other),
    }
}
