//! Command argument requests and their validation.
//!
//! Everything here runs before storage is touched and before any prompt.

use crate::model::timestamp::parse_date;
use crate::model::TaskStatus;
use crate::service::{EntityKind, ServiceError, ServiceResult};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const DATE_FORMAT_HINT: &str = "Invalid date format. Use dd/MM/yyyy (example: 12/12/2026).";

static DATE_ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid date argument regex"));

/// `delete <type> [name...] [--all] [--status <s>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub kind: EntityKind,
    pub name: Option<String>,
    pub all: bool,
    pub status: Option<String>,
}

/// `duedate <name...> (--set <dd/MM/yyyy> | --remove)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueDateRequest {
    pub name: String,
    pub set: Option<String>,
    pub remove: bool,
}

/// Validated due-date change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateChange {
    Set(NaiveDateTime),
    Remove,
}

impl DueDateRequest {
    pub fn change(&self) -> ServiceResult<DueDateChange> {
        match (self.set.as_deref(), self.remove) {
            (Some(_), true) => Err(invalid("Cannot use --set and --remove together.")),
            (None, false) => Err(invalid("No changes specified. Use --set or --remove.")),
            (Some(text), false) => parse_due_date(text).map(DueDateChange::Set),
            (None, true) => Ok(DueDateChange::Remove),
        }
    }
}

/// `cleanup (--all | --status <s>)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupRequest {
    pub all: bool,
    pub status: Option<String>,
}

impl CleanupRequest {
    /// Statuses to sweep, in workflow order.
    pub fn statuses(&self) -> ServiceResult<Vec<TaskStatus>> {
        let status = self.status.as_deref().filter(|text| !text.trim().is_empty());
        match (self.all, status) {
            (true, Some(_)) => Err(invalid("Cannot use --all and --status together.")),
            (false, None) => Err(invalid("Specify --all or --status.")),
            (true, None) => Ok(TaskStatus::ALL.to_vec()),
            (false, Some(text)) => Ok(vec![parse_status(text)?]),
        }
    }
}

pub(crate) fn invalid(message: &str) -> ServiceError {
    ServiceError::InvalidArgument(message.to_string())
}

/// Trimmed, non-empty name or `InvalidArgument(message)`.
pub(crate) fn required_name(raw: Option<&str>, message: &str) -> ServiceResult<String> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(invalid(message)),
    }
}

pub(crate) fn parse_status(text: &str) -> ServiceResult<TaskStatus> {
    text.parse::<TaskStatus>().map_err(|_| {
        ServiceError::InvalidArgument(format!(
            "Invalid status: {}. Valid values: todo, in_progress, done.",
            text.trim()
        ))
    })
}

pub(crate) fn parse_due_date(text: &str) -> ServiceResult<NaiveDateTime> {
    let text = text.trim();
    if !DATE_ARG_RE.is_match(text) {
        return Err(invalid(DATE_FORMAT_HINT));
    }
    parse_date(text).map_err(|_| invalid(DATE_FORMAT_HINT))
}
