//! Normalized per-file environment records.

use std::collections::BTreeMap;
use std::path::Path;

/// Parsed key/value pairs of one env file. Values are never empty.
pub type EnvFields = BTreeMap<String, String>;

/// Primary model identifier.
pub const MODEL_KEY: &str = "ANTHROPIC_MODEL";
/// Secondary ("small/fast") model identifier.
pub const FAST_MODEL_KEY: &str = "ANTHROPIC_SMALL_FAST_MODEL";
pub const BASE_URL_KEY: &str = "ANTHROPIC_BASE_URL";
pub const AUTH_TOKEN_KEY: &str = "ANTHROPIC_AUTH_TOKEN";

/// One env file, normalized for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRecord {
    /// Path relative to the env root, extension stripped, `/`-separated.
    pub relative_name: String,
    pub fields: EnvFields,
}

impl EnvRecord {
    pub fn from_fields(relative_name: impl Into<String>, fields: EnvFields) -> Self {
        Self {
            relative_name: relative_name.into(),
            fields,
        }
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn model(&self) -> Option<&str> {
        self.field(MODEL_KEY)
    }

    pub fn fast_model(&self) -> Option<&str> {
        self.field(FAST_MODEL_KEY)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.field(BASE_URL_KEY)
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.field(AUTH_TOKEN_KEY)
    }
}

/// First `/`-separated segment of a relative name.
pub fn top_segment(relative_name: &str) -> &str {
    relative_name.split('/').next().unwrap_or(relative_name)
}

/// Derive the relative name of `path` below `root`.
///
/// The trailing `.<extension>` is removed and path separators are
/// normalized to `/`, so the result is identical across platforms.
pub fn relative_name(root: &Path, path: &Path, extension: &str) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let suffix = format!(".{}", extension);
    match joined.strip_suffix(&suffix) {
        Some(stem) => stem.to_string(),
        None => joined,
    }
}
