//! Environment file intake.
//!
//! Turns a directory tree of `key=value` files into normalized
//! [`EnvRecord`]s:
//! - [`discover`] walks the env root and yields candidate files in sorted order
//! - [`parse`] reads one file into a key/value mapping
//! - [`record`] derives the relative name and model/credential accessors

pub mod discover;
pub mod parse;
pub mod record;

pub use discover::discover_env_files;
pub use parse::{parse_env_file, parse_env_str};
pub use record::{EnvFields, EnvRecord, relative_name, top_segment};

use crate::error::ImportResult;
use std::path::Path;
use tracing::{debug, info};

/// Discover, parse and extract every env file below `root`.
pub fn load_env_records(root: &Path, extension: &str) -> ImportResult<Vec<EnvRecord>> {
    let files = discover_env_files(root, extension)?;
    info!(root = %root.display(), files = files.len(), "Discovered env files");

    files
        .iter()
        .map(|path| {
            let fields = parse_env_file(path)?;
            let record = EnvRecord::from_fields(relative_name(root, path, extension), fields);
            debug!(name = %record.relative_name, keys = record.fields.len(), "Parsed env file");
            Ok(record)
        })
        .collect()
}
