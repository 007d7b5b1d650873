//! Import of env records into the cc-switch `providers` table.
//!
//! Each env record becomes one candidate row whose id is derived from the
//! record's relative name. Per candidate:
//! - no row with that id: insert it
//! - row exists, incremental: skip, the stored row is authoritative
//! - row exists, overwrite: update name, settings, category and notes
//!
//! The whole run executes inside one transaction and commits once at the
//! end, so a failing upsert leaves the table untouched. A dry run executes
//! the same statements and rolls the transaction back.

use rusqlite::Connection;
use serde_json::Value;
use tracing::{debug, info};

use super::providers::{
    ProviderDraft, insert_provider, load_default_template, provider_exists, update_provider,
};
use super::{Database, now_ms};
use crate::env::EnvRecord;
use crate::error::ImportResult;
use crate::identity::provider_id;
use crate::report::{ImportCounts, PreviewEntry};
use crate::template::project_settings;
use crate::types::{ImportMode, RowAction};

/// Default prefix for derived provider ids.
pub const DEFAULT_ID_PREFIX: &str = "env_";

/// Default application-type partition.
pub const DEFAULT_APP_TYPE: &str = "claude";

/// Options for controlling a relational import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: ImportMode,
    pub id_prefix: String,
    pub app_type: String,
    /// Run every upsert, then roll back instead of committing.
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: ImportMode::Incremental,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            app_type: DEFAULT_APP_TYPE.to_string(),
            dry_run: false,
        }
    }
}

impl ImportOptions {
    /// Options for an incremental import (insert missing, skip existing).
    pub fn incremental() -> Self {
        Self::default()
    }

    /// Options for an overwrite import (insert missing, update existing).
    pub fn overwrite() -> Self {
        Self {
            mode: ImportMode::Overwrite,
            ..Self::default()
        }
    }

    /// Preview the import without committing (builder pattern).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = app_type.into();
        self
    }
}

/// Result of a relational import.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub counts: ImportCounts,
    /// One entry per candidate, in processing order.
    pub preview: Vec<PreviewEntry>,
    /// Whether the transaction was committed.
    pub committed: bool,
}

/// Build the candidate row for `record`.
pub fn draft_provider(template: &Value, record: &EnvRecord, id_prefix: &str) -> ProviderDraft {
    ProviderDraft {
        id: provider_id(id_prefix, &record.relative_name),
        name: record.relative_name.clone(),
        settings_config: project_settings(template, record),
        notes: record.model().unwrap_or_default().to_string(),
    }
}

/// Insert, update or skip one candidate according to `mode`.
pub fn upsert_provider(
    conn: &Connection,
    app_type: &str,
    draft: &ProviderDraft,
    mode: ImportMode,
) -> ImportResult<RowAction> {
    if !provider_exists(conn, &draft.id, app_type)? {
        insert_provider(conn, app_type, draft, now_ms())?;
        return Ok(RowAction::Inserted);
    }

    match mode {
        ImportMode::Incremental => Ok(RowAction::Skipped),
        ImportMode::Overwrite => {
            update_provider(conn, app_type, draft)?;
            Ok(RowAction::Updated)
        }
    }
}

impl Database {
    /// Import env records as cc-switch providers.
    ///
    /// Returns the per-candidate decisions and aggregate counts. When
    /// `options.dry_run` is set, nothing is committed but the decisions are
    /// exactly those a real run would make.
    pub fn import_env_records(
        &mut self,
        records: &[EnvRecord],
        options: &ImportOptions,
    ) -> ImportResult<ImportOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let template = load_default_template(&tx, &options.app_type)?;

            let mut outcome = ImportOutcome::default();
            for record in records {
                let draft = draft_provider(&template, record, &options.id_prefix);
                let action = upsert_provider(&tx, &options.app_type, &draft, options.mode)?;
                debug!(id = %draft.id, name = %draft.name, %action, "Provider upsert");

                outcome.counts.record(action);
                outcome.preview.push(PreviewEntry::Row {
                    action,
                    id: draft.id,
                    name: draft.name,
                    notes: draft.notes,
                });
            }

            if options.dry_run {
                tx.rollback()?;
                info!(candidates = records.len(), "Dry run, rolled back provider changes");
            } else {
                tx.commit()?;
                outcome.committed = true;
                info!(
                    inserted = outcome.counts.inserted,
                    updated = outcome.counts.updated,
                    skipped = outcome.counts.skipped,
                    "Committed provider import"
                );
            }

            Ok(outcome)
        })
    }
}
