//! CodeSwitch provider document import.
//!
//! Env records are grouped by credential, the existing document is loaded
//! and deduped, groups are merged into it per [`ImportMode`], and the
//! resulting document is written atomically. Within the written document no
//! two entries share an `(apiUrl, apiKey)` pair, even when the input
//! document already did.

pub mod candidates;
pub mod dedupe;
pub mod merge;
pub mod models;
pub mod store;

pub use candidates::{CandidateGroup, Candidates, group_candidates};
pub use dedupe::{Deduped, dedupe_providers};
pub use merge::{IdAllocator, MergeOutcome, merge_candidates};
pub use store::{ProvidersDocument, backup_path, load_document, write_document};

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::env::EnvRecord;
use crate::error::ImportResult;
use crate::identity::ProviderKey;
use crate::report::{ImportCounts, PreviewEntry};
use crate::types::ImportMode;

/// Options for controlling a document import.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    pub mode: ImportMode,
    /// Compute everything but skip the write.
    pub dry_run: bool,
    /// Copy the previous document to `<path>.bak` before replacing it.
    pub backup: bool,
}

/// Result of a document import.
#[derive(Debug, Clone, Default)]
pub struct DocumentOutcome {
    pub document: ProvidersDocument,
    pub counts: ImportCounts,
    /// Number of credential groups.
    pub candidates: usize,
    /// Existing entries after the dedupe pass.
    pub existing: usize,
    pub preview: Vec<PreviewEntry>,
    pub written: bool,
    pub backup: Option<std::path::PathBuf>,
}

/// Compute the new document from `existing` without touching disk.
///
/// `id_seed` is the floor for newly allocated ids (normally now in ms).
pub fn plan_document(
    existing: ProvidersDocument,
    records: &[EnvRecord],
    mode: ImportMode,
    id_seed: i64,
) -> DocumentOutcome {
    let candidates = group_candidates(records);
    let deduped = dedupe_providers(existing.providers);
    if deduped.removed > 0 {
        info!(removed = deduped.removed, "Removed duplicate provider entries");
    }

    let existing_count = deduped.providers.len();
    let mut ids = IdAllocator::new(&deduped.providers, id_seed);
    let merged = merge_candidates(deduped.providers, &candidates.groups, mode, &mut ids);

    let document = ProvidersDocument {
        root: existing.root,
        providers: merged.providers,
        providers_slot: existing.providers_slot,
    };
    let preview = preview_entries(&document.providers);

    DocumentOutcome {
        counts: ImportCounts {
            inserted: merged.inserted,
            updated: merged.updated,
            skipped: 0,
            removed_dupes: deduped.removed,
            skipped_envs: candidates.skipped_envs,
        },
        candidates: candidates.groups.len(),
        existing: existing_count,
        preview,
        document,
        written: false,
        backup: None,
    }
}

/// Import `records` into the document at `path`.
pub fn import_document(
    path: &Path,
    records: &[EnvRecord],
    options: &DocumentOptions,
    id_seed: i64,
) -> ImportResult<DocumentOutcome> {
    let existing = load_document(path)?;
    let mut outcome = plan_document(existing, records, options.mode, id_seed);

    if options.dry_run {
        info!(path = %path.display(), "Dry run, provider document not written");
        return Ok(outcome);
    }

    outcome.backup = write_document(path, &outcome.document, options.backup)?;
    outcome.written = true;
    Ok(outcome)
}

/// Preview lines for every keyed entry. Never includes `apiKey`.
fn preview_entries(providers: &[Value]) -> Vec<PreviewEntry> {
    providers
        .iter()
        .filter_map(|entry| {
            let key = ProviderKey::from_entry(entry)?;
            Some(PreviewEntry::Provider {
                name: entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                api_url: key.api_url,
                models: models::normalize_supported_models(entry.get("supportedModels")).len(),
            })
        })
        .collect()
}
