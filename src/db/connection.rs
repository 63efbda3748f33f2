use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Directory under $HOME holding the ledger and its configuration
const DATA_DIR: &str = ".stages";

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(DATA_DIR))
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("stages.db"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("rc"))
    }

    /// Get database path from configuration file or default
    pub fn resolve_path() -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        match Self::path_from_config(&config_path)? {
            Some(path) => Ok(path),
            None => Self::default_path(),
        }
    }

    /// Read `data.location=` from a config file.
    /// Relative locations resolve against the config file's directory.
    pub fn path_from_config(config_path: &Path) -> Result<Option<PathBuf>> {
        if !config_path.exists() {
            return Ok(None);
        }
        let config = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        for line in config.lines() {
            let line = line.trim();
            if let Some(path_str) = line.strip_prefix("data.location=") {
                let path = PathBuf::from(path_str.trim());
                if path.is_relative() {
                    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
                    return Ok(Some(base.join(path)));
                }
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Connect to the database, creating it and parent directories if needed
    pub fn connect() -> Result<Connection> {
        let db_path = Self::resolve_path()?;
        Self::connect_at(&db_path)
    }

    /// Connect to the database at an explicit path
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        log::debug!("Opening database at {}", db_path.display());
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}
