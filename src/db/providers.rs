//! Row-level access to the cc-switch `providers` table.

use super::Database;
use crate::error::ImportResult;
use crate::template::normalize_template;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde_json::Value;

/// Id of the row whose settings seed every imported provider.
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// Category written on every imported row.
pub const CUSTOM_CATEGORY: &str = "custom";

/// A stored provider row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRow {
    pub id: String,
    pub app_type: String,
    pub name: String,
    pub settings_config: String,
    pub website_url: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<i64>,
    pub sort_index: Option<i64>,
    pub notes: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
    pub meta: String,
    pub is_current: bool,
}

impl ProviderRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            app_type: row.get("app_type")?,
            name: row.get("name")?,
            settings_config: row.get("settings_config")?,
            website_url: row.get("website_url")?,
            category: row.get("category")?,
            created_at: row.get("created_at")?,
            sort_index: row.get("sort_index")?,
            notes: row.get("notes")?,
            icon: row.get("icon")?,
            icon_color: row.get("icon_color")?,
            meta: row.get("meta")?,
            is_current: row.get("is_current")?,
        })
    }

    /// Parsed `settings_config`, `Null` if it is not valid JSON.
    pub fn settings(&self) -> Value {
        serde_json::from_str(&self.settings_config).unwrap_or(Value::Null)
    }
}

/// Content fields the importer writes for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDraft {
    pub id: String,
    pub name: String,
    pub settings_config: Value,
    pub notes: String,
}

const SELECT_COLUMNS: &str = "id, app_type, name, settings_config, website_url, category, \
     created_at, sort_index, notes, icon, icon_color, meta, is_current";

/// Load the default settings template for `app_type`, degrading to an
/// empty template when the row is missing or malformed.
pub fn load_default_template(conn: &Connection, app_type: &str) -> ImportResult<Value> {
    let raw: Option<Option<String>> = conn
        .query_row(
            "SELECT settings_config FROM providers WHERE id = ?1 AND app_type = ?2",
            params![DEFAULT_TEMPLATE_ID, app_type],
            |row| row.get(0),
        )
        .optional()?;
    Ok(normalize_template(raw.flatten().as_deref()))
}

pub fn provider_exists(conn: &Connection, id: &str, app_type: &str) -> ImportResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM providers WHERE id = ?1 AND app_type = ?2",
            params![id, app_type],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_provider(
    conn: &Connection,
    app_type: &str,
    draft: &ProviderDraft,
    created_at: i64,
) -> ImportResult<()> {
    let encoded = serde_json::to_string(&draft.settings_config)?;
    conn.execute(
        "INSERT INTO providers (
            id, app_type, name, settings_config,
            website_url, category, created_at, sort_index, notes,
            icon, icon_color, meta, is_current
        ) VALUES (
            ?1, ?2, ?3, ?4,
            '', ?5, ?6, NULL, ?7,
            '', '', '{}', 0
        )",
        params![
            draft.id,
            app_type,
            draft.name,
            encoded,
            CUSTOM_CATEGORY,
            created_at,
            draft.notes
        ],
    )?;
    Ok(())
}

/// Update content fields in place; administrative columns are left alone.
pub fn update_provider(conn: &Connection, app_type: &str, draft: &ProviderDraft) -> ImportResult<()> {
    let encoded = serde_json::to_string(&draft.settings_config)?;
    conn.execute(
        "UPDATE providers
            SET name = ?1,
                settings_config = ?2,
                category = ?3,
                notes = ?4
          WHERE id = ?5 AND app_type = ?6",
        params![
            draft.name,
            encoded,
            CUSTOM_CATEGORY,
            draft.notes,
            draft.id,
            app_type
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn get_provider(&self, id: &str, app_type: &str) -> ImportResult<Option<ProviderRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM providers WHERE id = ?1 AND app_type = ?2",
                        SELECT_COLUMNS
                    ),
                    params![id, app_type],
                    ProviderRow::from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// All providers of `app_type`, ordered by id.
    pub fn list_providers(&self, app_type: &str) -> ImportResult<Vec<ProviderRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM providers WHERE app_type = ?1 ORDER BY id",
                SELECT_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![app_type], ProviderRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Store the default template row for `app_type` (used to seed fixtures).
    pub fn put_default_template(&self, app_type: &str, settings: &Value) -> ImportResult<()> {
        let encoded = serde_json::to_string(settings)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO providers (id, app_type, name, settings_config, category)
                 VALUES (?1, ?2, 'Default', ?3, 'official')
                 ON CONFLICT (id, app_type) DO UPDATE SET settings_config = excluded.settings_config",
                params![DEFAULT_TEMPLATE_ID, app_type, encoded],
            )?;
            Ok(())
        })
    }
}
