//! Core types shared by both import targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an already-identified target record is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Keep existing target data; only add what is missing or union
    /// additive fields.
    #[default]
    Incremental,
    /// Prefer source data, replacing stored content fields on conflict.
    Overwrite,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Incremental => "incremental",
            ImportMode::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which downstream store an import writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// cc-switch SQLite `providers` table, one row per env file.
    CcSwitch,
    /// CodeSwitch JSON document, one entry per distinct credential.
    CodeSwitch,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::CcSwitch => "cc-switch",
            TargetKind::CodeSwitch => "code-switch",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one relational upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Inserted,
    Updated,
    Skipped,
}

impl RowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowAction::Inserted => "inserted",
            RowAction::Updated => "updated",
            RowAction::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
