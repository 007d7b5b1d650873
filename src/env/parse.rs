//! Line-oriented `key=value` parsing.
//!
//! Accepts an optional `export` prefix, strips `#` comments that sit outside
//! quotes, and unwraps one pair of matching single or double quotes. Lines
//! that do not look like an assignment are skipped, as are keys whose value
//! ends up empty.

use super::record::EnvFields;
use crate::error::{ImportError, ImportResult};
use regex_lite::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=(.*)$")
        .expect("assignment pattern is valid")
});

/// Parse the env file at `path`.
pub fn parse_env_file(path: &Path) -> ImportResult<EnvFields> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ImportError::io("failed to read", path, e))?;
    Ok(parse_env_str(&content))
}

/// Parse env file content already held in memory.
pub fn parse_env_str(content: &str) -> EnvFields {
    let mut fields = EnvFields::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(caps) = ASSIGNMENT.captures(raw_line) else {
            continue;
        };
        let key = &caps[1];
        let value = unquote(strip_inline_comment(&caps[2]));
        if value.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), value.to_string());
    }

    fields
}

/// Cut the value at the first `#` that is not inside quotes.
fn strip_inline_comment(value: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;

    for (i, ch) in value.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double => return value[..i].trim_end(),
            _ => {}
        }
    }

    value.trim_end()
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'\'' || bytes[0] == b'"')
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
