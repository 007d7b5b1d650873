//! Merge of credential groups into a deduped provider list.

use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::candidates::CandidateGroup;
use super::models::{SupportedModels, normalize_supported_models, union_models};
use crate::identity::ProviderKey;
use crate::types::ImportMode;

/// Result of merging candidates into existing entries.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// The provider list to write.
    pub providers: Vec<Value>,
    pub inserted: usize,
    /// Existing entries that matched a candidate.
    pub updated: usize,
}

/// Monotonic integer id allocator for new entries.
///
/// Starts from the larger of the highest existing integer id and `seed`
/// (normally the current time in milliseconds) and hands out the next value.
/// Once that reaches `i64::MAX`, the lowest unused positive id is used instead.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    last: i64,
    used: HashSet<i64>,
}

impl IdAllocator {
    pub fn new(existing: &[Value], seed: i64) -> Self {
        let used: HashSet<i64> = existing
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_i64))
            .collect();
        let last = used.iter().copied().fold(seed, i64::max);
        Self { last, used }
    }

    pub fn allocate(&mut self) -> i64 {
        let id = match self.last.checked_add(1) {
            Some(next) => {
                self.last = next;
                next
            }
            None => (1..)
                .find(|id| !self.used.contains(id))
                .unwrap_or_default(),
        };
        self.used.insert(id);
        id
    }
}

/// A brand-new entry with default presentation fields.
pub fn new_provider_entry(id: i64, group: &CandidateGroup, models: SupportedModels) -> Value {
    json!({
        "id": id,
        "name": group.display_name(),
        "apiUrl": group.key.api_url,
        "apiKey": group.key.api_key,
        "officialSite": "",
        "icon": "adobe",
        "tint": "rgba(15, 23, 42, 0.12)",
        "accent": "#0a84ff",
        "enabled": true,
        "supportedModels": models,
    })
}

/// Apply `groups` to the deduped `existing` entries.
///
/// Incremental: matched entries get the candidate's models unioned in
/// place; the output is every existing entry in original order followed by
/// new entries. Overwrite: matched entries keep their other fields but take
/// the candidate's models wholesale, and the output is only the candidate
/// set, so existing entries without a candidate are dropped.
pub fn merge_candidates(
    mut existing: Vec<Value>,
    groups: &[CandidateGroup],
    mode: ImportMode,
    ids: &mut IdAllocator,
) -> MergeOutcome {
    let by_key: HashMap<ProviderKey, usize> = existing
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| ProviderKey::from_entry(entry).map(|key| (key, i)))
        .collect();

    let mut imported: Vec<Value> = Vec::with_capacity(groups.len());
    let mut outcome = MergeOutcome::default();

    for group in groups {
        let models = group.supported_models.clone();

        let Some(&slot) = by_key.get(&group.key) else {
            let entry = new_provider_entry(ids.allocate(), group, models);
            debug!(name = %entry["name"], api_url = %group.key.api_url, "New provider entry");
            imported.push(entry);
            outcome.inserted += 1;
            continue;
        };

        let entry = &mut existing[slot];
        match mode {
            ImportMode::Incremental => {
                let mut merged = normalize_supported_models(entry.get("supportedModels"));
                union_models(&mut merged, &models);
                entry["supportedModels"] = Value::Object(merged);
                imported.push(entry.clone());
            }
            ImportMode::Overwrite => {
                let mut replaced = entry.clone();
                replaced["supportedModels"] = Value::Object(models);
                imported.push(replaced);
            }
        }
        debug!(name = %entry["name"], api_url = %group.key.api_url, %mode, "Matched provider entry");
        outcome.updated += 1;
    }

    outcome.providers = match mode {
        ImportMode::Incremental => {
            let kept: HashSet<ProviderKey> = by_key.into_keys().collect();
            existing
                .into_iter()
                .chain(imported.into_iter().filter(|entry| {
                    ProviderKey::from_entry(entry).is_none_or(|key| !kept.contains(&key))
                }))
                .collect()
        }
        ImportMode::Overwrite => imported,
    };

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::candidates::group_candidates;
    use crate::env::{EnvRecord, parse_env_str};

    fn groups(records: &[(&str, &str)]) -> Vec<CandidateGroup> {
        let records: Vec<EnvRecord> = records
            .iter()
            .map(|(name, content)| EnvRecord::from_fields(*name, parse_env_str(content)))
            .collect();
        group_candidates(&records).groups
    }

    fn existing() -> Vec<Value> {
        vec![
            json!({"id": 5, "name": "custom", "apiUrl": "https://a", "apiKey": "k", "icon": "star", "supportedModels": {"old": true}}),
            json!({"id": 9, "name": "manual", "apiUrl": "https://z"}),
            json!({"id": 7, "name": "unrelated", "apiUrl": "https://b", "apiKey": "k2", "supportedModels": {}}),
        ]
    }

    #[test]
    fn test_id_allocator_uses_max() {
        let mut ids = IdAllocator::new(&existing(), 3);
        assert_eq!(ids.allocate(), 10);
        assert_eq!(ids.allocate(), 11);

        let mut ids = IdAllocator::new(&existing(), 1_000);
        assert_eq!(ids.allocate(), 1_001);
    }

    #[test]
    fn test_id_allocator_at_i64_max_reuses_free_ids() {
        let existing = vec![
            json!({"id": i64::MAX, "apiUrl": "https://x", "apiKey": "k"}),
            json!({"id": 1, "apiUrl": "https://y", "apiKey": "k"}),
        ];
        let mut ids = IdAllocator::new(&existing, 0);
        assert_eq!(ids.allocate(), 2);
        assert_eq!(ids.allocate(), 3);

        let mut ids = IdAllocator::new(&[], i64::MAX - 1);
        assert_eq!(ids.allocate(), i64::MAX);
        assert_eq!(ids.allocate(), 1);
    }

    #[test]
    fn test_incremental_unions_in_place_and_appends() {
        let groups = groups(&[
            ("teamA/x", "ANTHROPIC_BASE_URL=https://a\nANTHROPIC_AUTH_TOKEN=k\nANTHROPIC_MODEL=new\n"),
            ("teamB/y", "ANTHROPIC_BASE_URL=https://c\nANTHROPIC_AUTH_TOKEN=k3\n"),
        ]);
        let mut ids = IdAllocator::new(&existing(), 100);

        let outcome = merge_candidates(existing(), &groups, ImportMode::Incremental, &mut ids);
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.updated, 1);

        let names: Vec<_> = outcome.providers.iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names[..3], [json!("custom"), json!("manual"), json!("unrelated")]);
        assert_eq!(outcome.providers.len(), 4);

        let matched = &outcome.providers[0];
        assert_eq!(matched["supportedModels"], json!({"old": true, "new": true}));
        assert_eq!(matched["icon"], "star");
        assert_eq!(matched["id"], 5);

        let added = &outcome.providers[3];
        assert_eq!(added["id"], 101);
        assert_eq!(added["apiUrl"], "https://c");
        assert_eq!(added["enabled"], true);
    }

    #[test]
    fn test_overwrite_replaces_models_and_drops_unmatched() {
        let groups = groups(&[(
            "teamA/x",
            "ANTHROPIC_BASE_URL=https://a\nANTHROPIC_AUTH_TOKEN=k\nANTHROPIC_MODEL=new\n",
        )]);
        let mut ids = IdAllocator::new(&existing(), 100);

        let outcome = merge_candidates(existing(), &groups, ImportMode::Overwrite, &mut ids);
        assert_eq!(outcome.providers.len(), 1);
        let entry = &outcome.providers[0];
        assert_eq!(entry["name"], "custom");
        assert_eq!(entry["icon"], "star");
        assert_eq!(entry["supportedModels"], json!({"new": true}));
    }

    #[test]
    fn test_new_entry_layout() {
        let groups = groups(&[(
            "teamA/acct1",
            "ANTHROPIC_BASE_URL=https://api.example.com\nANTHROPIC_AUTH_TOKEN=abc123\nANTHROPIC_MODEL=claude-x/big\n",
        )]);
        let entry = new_provider_entry(1, &groups[0], groups[0].supported_models.clone());
        let keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "id", "name", "apiUrl", "apiKey", "officialSite", "icon", "tint", "accent",
                "enabled", "supportedModels"
            ]
        );
        assert_eq!(entry["supportedModels"], json!({"claude-x/*": true}));
    }
}
