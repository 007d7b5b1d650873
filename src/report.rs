//! Import run reports.
//!
//! Reports carry counts and preview lines only. Nothing here ever holds a
//! credential value, so a report can be printed or logged as-is.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::types::{ImportMode, RowAction, TargetKind};

/// Aggregate counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub inserted: usize,
    /// Existing records that matched a candidate (updated or merged).
    pub updated: usize,
    pub skipped: usize,
    /// Pre-existing document entries dropped by the dedupe pass.
    pub removed_dupes: usize,
    /// Env files without a usable identity for the target.
    pub skipped_envs: usize,
}

impl ImportCounts {
    pub fn record(&mut self, action: RowAction) {
        match action {
            RowAction::Inserted => self.inserted += 1,
            RowAction::Updated => self.updated += 1,
            RowAction::Skipped => self.skipped += 1,
        }
    }
}

/// One secret-free preview line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewEntry {
    /// A cc-switch row decision.
    Row {
        action: RowAction,
        id: String,
        name: String,
        notes: String,
    },
    /// A keyed CodeSwitch entry in the output document.
    Provider {
        name: String,
        api_url: String,
        models: usize,
    },
}

impl fmt::Display for PreviewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewEntry::Row {
                action,
                id,
                name,
                notes,
            } => write!(f, "{}\t{}\t{}\t{}", action, id, name, notes),
            PreviewEntry::Provider {
                name,
                api_url,
                models,
            } => write!(f, "- {}\t{}\tmodels={}", name, api_url, models),
        }
    }
}

/// Result of one import run against one target.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub target: TargetKind,
    pub mode: ImportMode,
    pub dry_run: bool,
    /// Database or document path that was (or would be) written.
    pub destination: PathBuf,
    pub env_files: usize,
    /// Candidates after identity resolution (rows or credential groups).
    pub candidates: usize,
    /// Existing target records seen before merging (after dedupe).
    pub existing: usize,
    pub counts: ImportCounts,
    pub preview: Vec<PreviewEntry>,
    /// Backup copy written before the document swap, if any.
    pub backup: Option<PathBuf>,
}

impl ImportReport {
    pub fn new(target: TargetKind, mode: ImportMode, dry_run: bool, destination: PathBuf) -> Self {
        Self {
            target,
            mode,
            dry_run,
            destination,
            env_files: 0,
            candidates: 0,
            existing: 0,
            counts: ImportCounts::default(),
            preview: Vec::new(),
            backup: None,
        }
    }

    /// One-line human summary of the run.
    pub fn summary(&self) -> String {
        let c = &self.counts;
        let dest = self.destination.display();
        match (self.target, self.dry_run) {
            (TargetKind::CcSwitch, false) => format!(
                "imported {} env(s) into {} (inserted={}, updated={}, skipped={}, mode={})",
                self.env_files, dest, c.inserted, c.updated, c.skipped, self.mode
            ),
            (TargetKind::CcSwitch, true) => format!(
                "dry run: {} env(s) against {} (would insert={}, update={}, skip={}, mode={})",
                self.env_files, dest, c.inserted, c.updated, c.skipped, self.mode
            ),
            (TargetKind::CodeSwitch, false) => format!(
                "updated {} (mode={}, inserted={}, updated={}, removed_dupes={}, skipped_envs={})",
                dest, self.mode, c.inserted, c.updated, c.removed_dupes, c.skipped_envs
            ),
            (TargetKind::CodeSwitch, true) => format!(
                "env_files={} skipped_envs={} desired_providers={} existing_providers={} \
                 removed_dupes={} mode={} inserted={} updated={}",
                self.env_files,
                c.skipped_envs,
                self.candidates,
                self.existing,
                c.removed_dupes,
                self.mode,
                c.inserted,
                c.updated
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_record() {
        let mut counts = ImportCounts::default();
        counts.record(RowAction::Inserted);
        counts.record(RowAction::Inserted);
        counts.record(RowAction::Skipped);
        assert_eq!(counts.inserted, 2);
        assert_eq!(counts.updated, 0);
        assert_eq!(counts.skipped, 1);
    }

    #[test]
    fn test_preview_lines() {
        let row = PreviewEntry::Row {
            action: RowAction::Updated,
            id: "env_a".into(),
            name: "a".into(),
            notes: "m".into(),
        };
        assert_eq!(row.to_string(), "updated\tenv_a\ta\tm");

        let provider = PreviewEntry::Provider {
            name: "teamA@api.example.com#abcdef".into(),
            api_url: "https://api.example.com".into(),
            models: 2,
        };
        assert_eq!(
            provider.to_string(),
            "- teamA@api.example.com#abcdef\thttps://api.example.com\tmodels=2"
        );
    }

    #[test]
    fn test_summary_mentions_mode() {
        let mut report = ImportReport::new(
            TargetKind::CcSwitch,
            ImportMode::Overwrite,
            false,
            PathBuf::from("cc.db"),
        );
        report.env_files = 3;
        report.counts.updated = 3;
        assert_eq!(
            report.summary(),
            "imported 3 env(s) into cc.db (inserted=0, updated=3, skipped=0, mode=overwrite)"
        );
    }
}
