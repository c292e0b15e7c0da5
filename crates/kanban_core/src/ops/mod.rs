//! Command operations over the collection and task registries.
//!
//! # Responsibility
//! - Compose registries, the active-collection context, the clock and the
//!   confirmation port into one method per user command.
//! - Produce printable [`Outcome`]s; never write to a terminal directly.
//!
//! # Invariants
//! - Argument conflicts are rejected before any prompt or storage access.
//! - Bulk and irreversible commands confirm first; a decline writes nothing.
//! - Every change to the active collection invalidates the context cache.
//! - Informational no-ops surface as [`OutcomeStatus::Unchanged`].

use crate::model::timestamp::truncate_to_minute;
use crate::model::Collection;
use crate::repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use crate::service::collection_service::CollectionService;
use crate::service::context::ActiveCollectionContext;
use crate::service::task_service::TaskService;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDateTime;
use mockable::Clock;
use rusqlite::Connection;

mod args;
mod bulk;
mod collections;
pub mod confirm;
mod tasks;

pub use args::{CleanupRequest, DeleteRequest, DueDateChange, DueDateRequest};
pub use confirm::{parse_answer, Confirm, ScriptedConfirm, TerminalConfirm};

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The change was applied.
    Done,
    /// The user declined a confirmation; nothing was written.
    Cancelled,
    /// The requested state already held; nothing was written.
    Unchanged,
    /// The command could not proceed; `notices` say why.
    Rejected,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Unchanged => "unchanged",
            Self::Rejected => "rejected",
        }
    }
}

/// Printable result of one command.
///
/// `lines` belong on stdout, `notices` on stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: OutcomeStatus,
    pub lines: Vec<String>,
    pub notices: Vec<String>,
}

impl Outcome {
    fn with_status(status: OutcomeStatus) -> Self {
        Self {
            status,
            lines: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn done() -> Self {
        Self::with_status(OutcomeStatus::Done)
    }

    pub fn cancelled() -> Self {
        Self::with_status(OutcomeStatus::Cancelled).line("Operation cancelled.")
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self::with_status(OutcomeStatus::Unchanged).line(message)
    }

    pub fn rejected(notice: impl Into<String>) -> Self {
        Self::with_status(OutcomeStatus::Rejected).notice(notice)
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Appends every line of a multi-line block.
    pub fn block(mut self, text: &str) -> Self {
        self.lines.extend(text.lines().map(str::to_string));
        self
    }

    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notices.push(notice.into());
        self
    }

    /// Prepends notices gathered before the outcome was known.
    fn with_notices(mut self, mut notices: Vec<String>) -> Self {
        notices.append(&mut self.notices);
        self.notices = notices;
        self
    }

    /// False only for [`OutcomeStatus::Rejected`].
    pub fn is_success(&self) -> bool {
        self.status != OutcomeStatus::Rejected
    }

    /// `lines` joined for stdout, newline-terminated when non-empty.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Maps informational errors onto an `Unchanged` outcome.
fn settle(result: ServiceResult<Outcome>) -> ServiceResult<Outcome> {
    match result {
        Err(ServiceError::AlreadyInState(message)) => Ok(Outcome::unchanged(message)),
        other => other,
    }
}

/// Asks `question`, mapping read failures to `ServiceError::Prompt`.
fn ask(confirm: &mut impl Confirm, question: &str) -> ServiceResult<bool> {
    confirm.confirm(question).map_err(ServiceError::Prompt)
}

/// Command facade. One instance serves one process invocation.
pub struct Kanban<CR, TR, C>
where
    CR: CollectionRepository,
    TR: TaskRepository,
    C: Clock,
{
    collections: CollectionService<CR>,
    tasks: TaskService<TR>,
    context: ActiveCollectionContext,
    clock: C,
}

/// Facade over the SQLite repositories of one connection.
pub type SqliteKanban<'conn, C> =
    Kanban<SqliteCollectionRepository<'conn>, SqliteTaskRepository<'conn>, C>;

impl<'conn, C: Clock> Kanban<SqliteCollectionRepository<'conn>, SqliteTaskRepository<'conn>, C> {
    /// Builds the facade over a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// Returns `UninitializedConnection` when the schema is not current.
    pub fn open(conn: &'conn Connection, clock: C) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteCollectionRepository::try_new(conn)?,
            SqliteTaskRepository::try_new(conn)?,
            clock,
        ))
    }
}

impl<CR, TR, C> Kanban<CR, TR, C>
where
    CR: CollectionRepository,
    TR: TaskRepository,
    C: Clock,
{
    pub fn new(collections: CR, tasks: TR, clock: C) -> Self {
        Self {
            collections: CollectionService::new(collections),
            tasks: TaskService::new(tasks),
            context: ActiveCollectionContext::new(),
            clock,
        }
    }

    pub fn collections(&self) -> &CollectionService<CR> {
        &self.collections
    }

    pub fn tasks(&self) -> &TaskService<TR> {
        &self.tasks
    }

    pub fn context(&self) -> &ActiveCollectionContext {
        &self.context
    }

    /// Current local time at minute precision.
    fn now(&self) -> NaiveDateTime {
        truncate_to_minute(self.clock.local().naive_local())
    }

    fn active(&mut self) -> ServiceResult<Collection> {
        self.context.require_active(self.collections.repo())
    }

    /// Fills `task_count` for display.
    fn counted(&self, mut collection: Collection) -> ServiceResult<Collection> {
        collection.set_task_count(self.tasks.count_by_collection(collection.id())?);
        Ok(collection)
    }
}
