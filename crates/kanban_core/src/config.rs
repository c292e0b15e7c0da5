//! Runtime configuration.
//!
//! Resolution order, later wins: built-in defaults, the optional TOML file at
//! `<config dir>/kanban/config.toml`, then `KANBAN_DB`, `KANBAN_LOG_DIR` and
//! `KANBAN_LOG_LEVEL`. The CLI applies `--db` last.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "kanban";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "kanban.db";
const LOG_DIR_NAME: &str = "logs";

pub const DB_ENV: &str = "KANBAN_DB";
pub const LOG_DIR_ENV: &str = "KANBAN_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";

/// Effective settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

/// Keys accepted in `config.toml`. All optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
}

/// Values read from the environment. Empty variables count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            db_path: non_empty(std::env::var_os(DB_ENV)).map(PathBuf::from),
            log_dir: non_empty(std::env::var_os(LOG_DIR_ENV)).map(PathBuf::from),
            log_level: non_empty(std::env::var_os(LOG_LEVEL_ENV))
                .map(|value| value.to_string_lossy().into_owned()),
        }
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    /// No platform data directory and no explicit path.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::NoDataDir => write!(
                f,
                "no data directory available; set {DB_ENV} and {LOG_DIR_ENV}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NoDataDir => None,
        }
    }
}

/// Platform location of `config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl KanbanConfig {
    /// Loads from the platform config file and the process environment.
    ///
    /// # Errors
    /// Fails when the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path().as_deref(), &EnvOverrides::from_env())
    }

    /// Loads from an explicit file (absent files are skipped) and overrides.
    pub fn load_from(path: Option<&Path>, env: &EnvOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if path.exists() => read_file(path)?,
            _ => FileConfig::default(),
        };

        let db_path = env.db_path.clone().or(file.db_path);
        let log_dir = env.log_dir.clone().or(file.log_dir);
        let log_level = env
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| default_log_level().to_string());

        let (db_path, log_dir) = match (db_path, log_dir) {
            (Some(db_path), Some(log_dir)) => (db_path, log_dir),
            (db_path, log_dir) => {
                let data_dir = dirs::data_dir()
                    .map(|dir| dir.join(APP_DIR_NAME))
                    .ok_or(ConfigError::NoDataDir)?;
                (
                    db_path.unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
                    log_dir.unwrap_or_else(|| data_dir.join(LOG_DIR_NAME)),
                )
            }
        };

        Ok(Self {
            db_path: absolutize(db_path),
            log_dir: absolutize(log_dir),
            log_level,
        })
    }

    /// Replaces the database path when `db_path` is given.
    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = absolutize(db_path);
        }
        self
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
