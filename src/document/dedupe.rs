//! Coalescing of duplicate entries already present in a document.

use serde_json::Value;
use std::collections::HashMap;

use super::models::{normalize_supported_models, union_models};
use crate::identity::ProviderKey;

/// Result of the dedupe pass.
#[derive(Debug, Clone, Default)]
pub struct Deduped {
    pub providers: Vec<Value>,
    /// Entries dropped: later duplicates of a key, and non-object entries.
    pub removed: usize,
}

/// Collapse entries sharing an `(apiUrl, apiKey)` identity.
///
/// The first entry for a key is kept in place with its `supportedModels`
/// normalized; each later duplicate has its models unioned into that first
/// entry and is dropped. Entries without an identity are always kept.
pub fn dedupe_providers(providers: Vec<Value>) -> Deduped {
    let mut out: Vec<Value> = Vec::with_capacity(providers.len());
    let mut seen: HashMap<ProviderKey, usize> = HashMap::new();
    let mut removed = 0;

    for mut entry in providers {
        if !entry.is_object() {
            removed += 1;
            continue;
        }

        let Some(key) = ProviderKey::from_entry(&entry) else {
            out.push(entry);
            continue;
        };

        match seen.get(&key) {
            Some(&first) => {
                let extra = normalize_supported_models(entry.get("supportedModels"));
                let kept = &mut out[first];
                let mut merged = normalize_supported_models(kept.get("supportedModels"));
                union_models(&mut merged, &extra);
                kept["supportedModels"] = Value::Object(merged);
                removed += 1;
            }
            None => {
                let models = normalize_supported_models(entry.get("supportedModels"));
                entry["supportedModels"] = Value::Object(models);
                seen.insert(key, out.len());
                out.push(entry);
            }
        }
    }

    Deduped {
        providers: out,
        removed,
    }
}
