//! Configuration types.
//!
//! [`ImportConfig`] is fully explicit: every path is resolved before it
//! reaches the import core, which never consults the environment or the
//! home directory itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::db::import::{DEFAULT_APP_TYPE, DEFAULT_ID_PREFIX};
use crate::types::ImportMode;

/// Default env file extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "env";

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Root directory scanned for env files.
    pub env_root: PathBuf,

    /// Extension of env files, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub mode: ImportMode,

    /// Compute and report the plan without committing or writing.
    #[serde(default)]
    pub dry_run: bool,

    pub cc_switch: CcSwitchConfig,

    pub code_switch: CodeSwitchConfig,
}

/// cc-switch (SQLite) target settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcSwitchConfig {
    pub db_path: PathBuf,

    /// Prefix for derived provider ids.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Application-type partition of the providers table.
    #[serde(default = "default_app_type")]
    pub app_type: String,
}

/// CodeSwitch (JSON document) target settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSwitchConfig {
    pub out_path: PathBuf,

    /// Keep `<out_path>.bak` of the previous document.
    #[serde(default)]
    pub backup: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_app_type() -> String {
    DEFAULT_APP_TYPE.to_string()
}

impl ImportConfig {
    /// Config with explicit paths and defaults for everything else.
    pub fn with_paths(
        env_root: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            env_root: env_root.into(),
            extension: default_extension(),
            mode: ImportMode::default(),
            dry_run: false,
            cc_switch: CcSwitchConfig {
                db_path: db_path.into(),
                id_prefix: default_id_prefix(),
                app_type: default_app_type(),
            },
            code_switch: CodeSwitchConfig {
                out_path: out_path.into(),
                backup: false,
            },
        }
    }

    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
