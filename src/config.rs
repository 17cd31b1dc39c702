use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_DB_PATH: &str = "tracker.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite journal mode, mapped 1:1 to the `journal_mode` pragma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    Wal,
    #[default]
    Delete,
}

impl JournalMode {
    pub fn pragma_value(self) -> &'static str {
        match self {
            JournalMode::Wal => "wal",
            JournalMode::Delete => "delete",
        }
    }
}

/// Where and how the parcel database is opened.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file. Ignored when `in_memory` is set.
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
    pub journal_mode: JournalMode,
    pub in_memory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: JournalMode::default(),
            in_memory: false,
        }
    }
}

impl StoreConfig {
    /// Default settings for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            in_memory: true,
            ..Self::default()
        }
    }

    /// Read a JSON config file; absent fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: StoreConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.in_memory && self.path.as_os_str().is_empty() {
            return Err(Error::Config("database path is empty".to_string()));
        }
        if !self.in_memory && self.path.is_dir() {
            return Err(Error::Config(format!(
                "database path {} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Open a connection and apply the configured pragmas.
    pub fn open(&self) -> Result<Connection> {
        self.validate()?;
        let conn = if self.in_memory {
            info!("opening in-memory parcel database");
            Connection::open_in_memory()?
        } else {
            info!(path = %self.path.display(), "opening parcel database");
            Connection::open(&self.path)?
        };
        // journal_mode returns the resulting mode as a row
        let _mode: String = conn.query_row(
            &format!("PRAGMA journal_mode = {}", self.journal_mode.pragma_value()),
            [],
            |row| row.get(0),
        )?;
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        Ok(conn)
    }
}
