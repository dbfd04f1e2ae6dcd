//! Storage layer for qrattend.
//!
//! This module owns the `SQLite` connection. A [`Storage`] is opened once per
//! logical operation and lent by reference to the registry, ledger and report
//! builder; dropping it closes the connection.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Handle to the attendance database.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Begin a transaction on the shared connection.
    ///
    /// Statements issued through this `Storage` while the guard is alive run
    /// inside the transaction. Dropping the guard without committing rolls
    /// everything back.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open or `BEGIN` fails.
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let students: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        let attendance_records: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))?;
        let last_date: Option<String> =
            self.conn
                .query_row("SELECT MAX(date) FROM attendance", [], |row| row.get(0))?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            students,
            attendance_records,
            last_date,
            db_size_bytes,
        })
    }
}

/// Statistics about the attendance database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of registered students.
    pub students: i64,
    /// Number of attendance records.
    pub attendance_records: i64,
    /// Most recent day with any attendance.
    pub last_date: Option<String>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
