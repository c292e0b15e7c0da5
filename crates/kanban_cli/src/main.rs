//! `kanban` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the database.
//! - Dispatch one parsed command to the core facade and print its outcome.
//!
//! # Invariants
//! - Outcome lines go to stdout; notices and errors go to stderr.
//! - Exit code is 0 unless the command was rejected or failed.

mod cli;

use clap::Parser;
use cli::{join_words, Cli, Commands, Kind};
use kanban_core::{
    flush_logging, init_logging, open_db, CleanupRequest, ConfigError, DbError, DeleteRequest, DueDateRequest,
    KanbanConfig, Outcome, RepoError, ServiceError, SqliteKanban, TerminalConfirm,
};
use log::{error, info};
use mockable::DefaultClock;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

const TASK_ONLY_FLAGS_NOTICE: &str =
    "Warning: --status and --due-date only apply to tasks. Ignoring.";

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Db(DbError),
    Repo(RepoError),
    Command(ServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "cannot open database: {err}"),
            Self::Repo(err) => write!(f, "cannot open database: {err}"),
            Self::Command(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Command(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Command(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();

    let code = match run(cli) {
        Ok(outcome) => {
            info!(
                "event=command_finish module=cli status={} command={command}",
                outcome.status.as_str()
            );
            report(&outcome)
        }
        Err(CliError::Command(err)) if err.is_informational() => {
            println!("{err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=command_finish module=cli status=error command={command}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

fn run(cli: Cli) -> Result<Outcome, CliError> {
    let config = KanbanConfig::load()?.with_db_path(cli.db_path);
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {err}");
    }
    info!(
        "event=command_start module=cli status=start command={}",
        cli.command.name()
    );

    let conn = open_db(&config.db_path)?;
    let mut kanban = SqliteKanban::open(&conn, DefaultClock)?;
    Ok(dispatch(&mut kanban, cli.command)?)
}

fn dispatch(
    kanban: &mut SqliteKanban<'_, DefaultClock>,
    command: Commands,
) -> Result<Outcome, ServiceError> {
    let mut confirm = TerminalConfirm::stdio();

    match command {
        Commands::Use { name } => kanban.use_collection(&join_words(&name)),
        Commands::New {
            kind: Kind::Collection,
            name,
            status,
            due_date,
        } => {
            let outcome = kanban.new_collection(&join_words(&name))?;
            if status.is_some() || due_date.is_some() {
                return Ok(outcome.notice(TASK_ONLY_FLAGS_NOTICE));
            }
            Ok(outcome)
        }
        Commands::New {
            kind: Kind::Task,
            name,
            status,
            due_date,
        } => kanban.new_task(&join_words(&name), status.as_deref(), due_date.as_deref()),
        Commands::List {
            kind: Kind::Collection,
            ..
        } => kanban.list_collections(),
        Commands::List {
            kind: Kind::Task,
            status,
        } => kanban.list_tasks(status.as_deref()),
        Commands::Delete {
            kind,
            name,
            all,
            status,
        } => {
            let request = DeleteRequest {
                kind: kind.into(),
                name: (!name.is_empty()).then(|| join_words(&name)),
                all,
                status,
            };
            kanban.delete(&request, &mut confirm)
        }
        Commands::Move { all: true, status, rest } => match rest.as_slice() {
            [to] => kanban.move_all(&status, to, &mut confirm),
            _ => Err(ServiceError::InvalidArgument(
                "Usage: move --all <from-status> <to-status>".to_string(),
            )),
        },
        Commands::Move {
            all: false,
            status,
            rest,
        } => kanban.move_task(&status, &join_words(&rest)),
        Commands::Rename {
            kind,
            current,
            new_name,
        } => kanban.rename(kind.into(), &current, &join_words(&new_name)),
        Commands::Duedate { name, set, remove } => kanban.due_date(&DueDateRequest {
            name: join_words(&name),
            set,
            remove,
        }),
        Commands::Cleanup { all, status } => {
            kanban.cleanup(&CleanupRequest { all, status }, &mut confirm)
        }
    }
}

fn report(outcome: &Outcome) -> ExitCode {
    for notice in &outcome.notices {
        eprintln!("{notice}");
    }
    print!("{}", outcome.render());

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
