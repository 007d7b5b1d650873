//! cc-switch database access.
//!
//! The database belongs to cc-switch; the importer only opens an existing
//! file and works inside its `providers` table.

pub mod import;
pub mod providers;
pub mod schema;

use crate::error::{ImportError, ImportResult};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Database handle wrapping a SQLite connection.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open an existing cc-switch database.
    ///
    /// Never creates the file, and fails if it has no `providers` table.
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ImportError::DatabaseNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA busy_timeout=5000;")?;

        let db = Self {
            conn,
            path: path.to_path_buf(),
        };
        if !db.has_providers_table()? {
            return Err(ImportError::MissingProvidersTable(db.path));
        }

        Ok(db)
    }

    /// Open an in-memory database with the providers schema (for testing).
    pub fn open_in_memory() -> ImportResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        db.create_schema()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute a function with access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> ImportResult<T>
    where
        F: FnOnce(&Connection) -> ImportResult<T>,
    {
        f(&self.conn)
    }

    /// Execute a function with mutable access to the connection (for transactions).
    pub fn with_conn_mut<F, T>(&mut self, f: F) -> ImportResult<T>
    where
        F: FnOnce(&mut Connection) -> ImportResult<T>,
    {
        f(&mut self.conn)
    }
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
