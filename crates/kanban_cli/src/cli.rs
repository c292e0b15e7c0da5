//! CLI argument definitions for kanban.

use clap::{Parser, Subcommand, ValueEnum};
use kanban_core::EntityKind;
use std::path::PathBuf;

/// Kanban - collections of tasks moving through todo, in_progress and done.
///
/// Start with `kanban new collection <name>`, then `kanban use <name>`.
#[derive(Parser, Debug)]
#[command(name = "kanban")]
#[command(version, about = "Track tasks across kanban collections", long_about = None)]
pub struct Cli {
    /// Database file to use instead of the configured one.
    /// Can also be set via KANBAN_DB environment variable.
    #[arg(long = "db", global = true, env = "KANBAN_DB")]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Entity a command applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Collection,
    Task,
}

impl From<Kind> for EntityKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Collection => EntityKind::Collection,
            Kind::Task => EntityKind::Task,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Switch the active collection
    Use {
        /// Collection name (multiple words are joined)
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Create a collection, or a task in the active collection
    New {
        #[arg(value_enum, ignore_case = true)]
        kind: Kind,

        /// Name (multiple words are joined)
        #[arg(required = true)]
        name: Vec<String>,

        /// Initial task status (todo, in_progress, done)
        #[arg(short, long)]
        status: Option<String>,

        /// Task due date (dd/MM/yyyy)
        #[arg(short = 'd', long = "due-date")]
        due_date: Option<String>,
    },

    /// List collections, or the active collection's tasks
    List {
        #[arg(value_enum, ignore_case = true)]
        kind: Kind,

        /// Only show tasks with this status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete one or all collections or tasks
    Delete {
        #[arg(value_enum, ignore_case = true)]
        kind: Kind,

        /// Name (multiple words are joined)
        name: Vec<String>,

        /// Delete every item of the given type
        #[arg(short, long)]
        all: bool,

        /// With `task --all`, only delete tasks with this status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Move one task to a status, or all tasks between statuses
    ///
    /// `move <status> <task name>` or `move --all <from> <to>`.
    Move {
        /// Move every task with the first status to the second
        #[arg(short, long)]
        all: bool,

        /// Target status, or source status with --all
        status: String,

        /// Task name, or target status with --all
        #[arg(required = true)]
        rest: Vec<String>,
    },

    /// Rename a collection or a task
    Rename {
        #[arg(value_enum, ignore_case = true)]
        kind: Kind,

        /// Current name (quote it when it contains spaces)
        current: String,

        /// New name (multiple words are joined)
        #[arg(required = true)]
        new_name: Vec<String>,
    },

    /// Set or remove a task's due date
    Duedate {
        /// Task name (multiple words are joined)
        name: Vec<String>,

        /// New due date (dd/MM/yyyy)
        #[arg(short, long)]
        set: Option<String>,

        /// Remove the due date
        #[arg(short, long)]
        remove: bool,
    },

    /// Remove tasks whose due date has passed
    Cleanup {
        /// Sweep every status
        #[arg(short, long)]
        all: bool,

        /// Sweep only this status
        #[arg(short, long)]
        status: Option<String>,
    },
}

impl Commands {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Use { .. } => "use",
            Self::New { .. } => "new",
            Self::List { .. } => "list",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Rename { .. } => "rename",
            Self::Duedate { .. } => "duedate",
            Self::Cleanup { .. } => "cleanup",
        }
    }
}

/// Joins positional words into one name.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
