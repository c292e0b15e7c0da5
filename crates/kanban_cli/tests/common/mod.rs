//! Shared helpers for kanban CLI integration tests.
//!
//! Every `TestEnv` owns a temporary directory holding the database, the log
//! directory and an empty config home, so tests never touch user data and
//! can run in parallel.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
pub use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Environment with collection `name` created and active.
    pub fn with_active(name: &str) -> Self {
        let env = Self::new();
        env.kanban().args(["new", "collection", name]).assert().success();
        env.kanban().args(["use", name]).assert().success();
        env
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("kanban.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// `kanban` command isolated to this environment.
    pub fn kanban(&self) -> Command {
        let mut cmd = Command::cargo_bin("kanban").unwrap();
        cmd.env("KANBAN_DB", self.db_path())
            .env("KANBAN_LOG_DIR", self.log_dir())
            .env("KANBAN_LOG_LEVEL", "info")
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"));
        cmd
    }
}
