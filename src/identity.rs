//! Identity resolution for import targets.
//!
//! Two strategies, one per target:
//! - cc-switch rows are keyed by a slug of the env file's relative path, so
//!   re-importing the same file always lands on the same row.
//! - CodeSwitch entries are keyed by the exact `(apiUrl, apiKey)` pair, so
//!   two files holding the same credentials collapse into one entry.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

use crate::env::EnvRecord;

/// Derive a stable cc-switch provider id from a relative env name.
///
/// `/` becomes `__`, then every run of characters outside
/// `[A-Za-z0-9_.-]` is collapsed to a single `_`.
pub fn provider_id(prefix: &str, relative_name: &str) -> String {
    let base = relative_name.replace('/', "__");
    let mut id = String::with_capacity(prefix.len() + base.len());
    id.push_str(prefix);

    let mut in_run = false;
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
            id.push(ch);
            in_run = false;
        } else if !in_run {
            id.push('_');
            in_run = true;
        }
    }
    id
}

/// Identity of a CodeSwitch provider entry.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    pub api_url: String,
    pub api_key: String,
}

impl ProviderKey {
    /// Build a key from raw values; blank URL or key means no identity.
    pub fn new(api_url: &str, api_key: &str) -> Option<Self> {
        let api_url = api_url.trim();
        let api_key = api_key.trim();
        if api_url.is_empty() || api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Key of an existing document entry, if it has string `apiUrl`/`apiKey`.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let api_url = entry.get("apiUrl")?.as_str()?;
        let api_key = entry.get("apiKey")?.as_str()?;
        Self::new(api_url, api_key)
    }

    /// Key of an env record, from its base URL and auth token.
    pub fn from_record(record: &EnvRecord) -> Option<Self> {
        Self::new(record.base_url()?, record.auth_token()?)
    }

    pub fn host(&self) -> String {
        url_host(&self.api_url)
    }

    pub fn fingerprint(&self) -> String {
        key_fingerprint(&self.api_key)
    }
}

// apiKey stays out of Debug output so keys never reach logs.
impl fmt::Debug for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderKey")
            .field("api_url", &self.api_url)
            .field("api_key", &format_args!("#{}", self.fingerprint()))
            .finish()
    }
}

/// Network location of a URL (`host[:port]`), or the input itself when it
/// does not parse as a URL with a host.
///
/// The host is taken as written, so its case and an explicit port (even a
/// scheme default such as `:443`) are kept. Userinfo is dropped.
pub fn url_host(api_url: &str) -> String {
    match Url::parse(api_url) {
        Ok(url) => match url.host_str() {
            Some(host) => match written_authority(api_url) {
                Some(authority) => authority.to_string(),
                None => match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                },
            },
            None => api_url.to_string(),
        },
        Err(_) => api_url.to_string(),
    }
}

/// `host[:port]` exactly as it appears between `://` and the path.
fn written_authority(api_url: &str) -> Option<&str> {
    let (_, rest) = api_url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!host.is_empty()).then_some(host)
}

/// Short content fingerprint of a credential: first 6 hex chars of SHA-256.
pub fn key_fingerprint(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(6);
    encoded
}
