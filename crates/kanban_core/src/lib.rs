//! Core of the kanban task manager: entities, storage, registries and the
//! command operations the CLI drives.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ops;
pub mod repo;
pub mod service;

pub use config::{ConfigError, EnvOverrides, KanbanConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, flush_logging, init_logging, logging_status, LoggingError,
};
pub use model::{
    Collection, CollectionId, NewCollection, NewTask, Task, TaskId, TaskStatus, ValidationError,
};
pub use ops::{
    CleanupRequest, Confirm, DeleteRequest, DueDateRequest, Kanban, Outcome, OutcomeStatus,
    ScriptedConfirm, SqliteKanban, TerminalConfirm,
};
pub use repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::{EntityKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
