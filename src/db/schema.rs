//! The cc-switch `providers` table.

use super::Database;
use crate::error::ImportResult;

/// Columns the importer reads and writes, keyed by `(id, app_type)`.
pub const PROVIDERS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS providers (
    id TEXT NOT NULL,
    app_type TEXT NOT NULL,
    name TEXT NOT NULL,
    settings_config TEXT NOT NULL,
    website_url TEXT,
    category TEXT,
    created_at INTEGER,
    sort_index INTEGER,
    notes TEXT,
    icon TEXT,
    icon_color TEXT,
    meta TEXT NOT NULL DEFAULT '{}',
    is_current BOOLEAN NOT NULL DEFAULT 0,
    PRIMARY KEY (id, app_type)
);";

impl Database {
    /// Create the providers table if it does not exist.
    pub fn create_schema(&self) -> ImportResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(PROVIDERS_SCHEMA)?;
            Ok(())
        })
    }

    /// Whether the database has a `providers` table.
    pub fn has_providers_table(&self) -> ImportResult<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'providers'",
                [],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }
}
