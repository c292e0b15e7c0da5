//! Validation errors and shared attribute checks.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Violated entity rule, raised at construction or mutation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming.
    EmptyName { entity: &'static str },
    /// Identifier field is zero or negative.
    NonPositiveId { field: &'static str, value: i64 },
    /// Timestamp field precedes `created_at`.
    BeforeCreation { field: &'static str },
    /// Status text is not one of `todo|in_progress|done`.
    InvalidStatus(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { entity } => write!(f, "{entity} name must not be empty"),
            Self::NonPositiveId { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::BeforeCreation { field } => write!(f, "{field} cannot be before created_at"),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected one of: todo, in_progress, done"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims `raw` and rejects blank names.
pub(crate) fn normalize_name(entity: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { entity });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_positive(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveId { field, value });
    }
    Ok(value)
}
