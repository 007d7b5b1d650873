//! Env file discovery.

use crate::error::{ImportError, ImportResult};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Hidden entries (dotfiles and dot-directories) below the root are skipped.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Find every `*.<extension>` file below `root`, sorted by path.
///
/// Symlinks to files are included; symlinked directories are not descended.
///
/// Fails with [`ImportError::EnvRootNotFound`] when `root` is not a
/// directory and with [`ImportError::NoEnvFiles`] when nothing matches.
pub fn discover_env_files(root: &Path, extension: &str) -> ImportResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ImportError::EnvRootNotFound(root.to_path_buf()));
    }

    let suffix = format!(".{}", extension);
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&suffix))
        })
        .map(DirEntry::into_path)
        .collect();

    if files.is_empty() {
        return Err(ImportError::NoEnvFiles {
            root: root.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    files.sort();
    Ok(files)
}
