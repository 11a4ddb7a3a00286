//! Environment-driven server configuration.
//!
//! # Responsibility
//! - Resolve port, database file, password, web root and logging settings.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - An unparseable port falls back to the default instead of failing startup.

use scheduler_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 7540;
pub const DEFAULT_DB_FILE_NAME: &str = "scheduler.db";
pub const DEFAULT_WEB_DIR: &str = "./web";

pub const PORT_VAR: &str = "TODO_PORT";
pub const DB_FILE_VAR: &str = "TODO_DBFILE";
pub const PASSWORD_VAR: &str = "TODO_PASSWORD";
pub const WEB_DIR_VAR: &str = "TODO_WEB_DIR";
pub const LOG_DIR_VAR: &str = "TODO_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "TODO_LOG_LEVEL";

#[derive(Debug)]
pub enum ConfigError {
    /// Default database path needs the executable location.
    ExecutablePath(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExecutablePath(err) => {
                write!(f, "cannot resolve executable directory for database file: {err}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ExecutablePath(err) => Some(err),
        }
    }
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub db_file: PathBuf,
    /// `None` disables authentication.
    pub password: Option<String>,
    pub web_dir: PathBuf,
    /// `None` logs to stderr.
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = var(PORT_VAR)
            .and_then(|raw| raw.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let db_file = match var(DB_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_db_file()?,
        };

        Ok(Self {
            port,
            db_file,
            password: var(PASSWORD_VAR),
            web_dir: PathBuf::from(var(WEB_DIR_VAR).unwrap_or_else(|| DEFAULT_WEB_DIR.to_string())),
            log_dir: var(LOG_DIR_VAR),
            log_level: var(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
        })
    }
}

fn default_db_file() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ExecutablePath)?;
    let dir = exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(dir.join(DEFAULT_DB_FILE_NAME))
}
