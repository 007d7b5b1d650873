//! Loading and atomically rewriting the CodeSwitch provider document.

use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ImportError, ImportResult};

/// A provider document: top-level object plus its `providers` array.
///
/// Every top-level key other than `providers` is carried through unchanged,
/// and `providers` is written back at the position it was read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvidersDocument {
    pub root: Map<String, Value>,
    pub providers: Vec<Value>,
    /// Index of `providers` among the top-level keys; `None` means last.
    pub providers_slot: Option<usize>,
}

impl ProvidersDocument {
    /// Parse document text read from `path` (used in error messages).
    pub fn parse(text: &str, path: &Path) -> ImportResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| ImportError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Object(mut root) = value else {
            return Err(ImportError::InvalidRoot(path.to_path_buf()));
        };

        let providers_slot = root
            .keys()
            .position(|key| key == "providers")
            .filter(|&slot| slot + 1 < root.len());
        let providers = match root.remove("providers") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(providers)) => providers,
            Some(_) => return Err(ImportError::InvalidProviders(path.to_path_buf())),
        };

        Ok(Self {
            root,
            providers,
            providers_slot,
        })
    }

    /// Reassemble the full JSON document.
    pub fn to_value(&self) -> Value {
        let slot = self
            .providers_slot
            .map_or(self.root.len(), |slot| slot.min(self.root.len()));
        let providers = Value::Array(self.providers.clone());

        let mut root = Map::with_capacity(self.root.len() + 1);
        for (index, (key, value)) in self.root.iter().enumerate() {
            if index == slot {
                root.insert("providers".to_string(), providers.clone());
            }
            root.insert(key.clone(), value.clone());
        }
        if slot == self.root.len() {
            root.insert("providers".to_string(), providers);
        }
        Value::Object(root)
    }

    /// Pretty JSON (2-space indent) with a trailing newline.
    pub fn to_json_pretty(&self) -> ImportResult<String> {
        let mut text = serde_json::to_string_pretty(&self.to_value())?;
        text.push('\n');
        Ok(text)
    }
}

/// Load the document at `path`; a missing file is an empty document.
pub fn load_document(path: &Path) -> ImportResult<ProvidersDocument> {
    if !path.exists() {
        return Ok(ProvidersDocument::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ImportError::io("failed to read", path, e))?;
    ProvidersDocument::parse(&text, path)
}

/// Path of the backup copy kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Write `document` to `path` via a temp file in the same directory and an
/// atomic rename. With `backup`, an existing file is first copied to
/// `<path>.bak`; the returned path is that copy.
pub fn write_document(
    path: &Path,
    document: &ProvidersDocument,
    backup: bool,
) -> ImportResult<Option<PathBuf>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| ImportError::io("failed to create", &dir, e))?;

    let backup_written = if backup && path.exists() {
        let bak = backup_path(path);
        fs::copy(path, &bak).map_err(|e| ImportError::io("failed to back up", path, e))?;
        info!(backup = %bak.display(), "Backed up provider document");
        Some(bak)
    } else {
        None
    };

    let text = document.to_json_pretty()?;
    let mut temp =
        NamedTempFile::new_in(&dir).map_err(|e| ImportError::io("failed to create temp file in", &dir, e))?;
    temp.write_all(text.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ImportError::io("failed to write", temp.path().to_path_buf(), e))?;
    temp.persist(path)
        .map_err(|e| ImportError::io("failed to replace", path, e.error))?;

    info!(path = %path.display(), providers = document.providers.len(), "Wrote provider document");
    Ok(backup_written)
}
