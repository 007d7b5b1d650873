//! Grouping of env records by credential identity.

use std::collections::HashMap;

use super::models::{SupportedModels, model_patterns, union_models};
use crate::env::{EnvRecord, top_segment};
use crate::identity::ProviderKey;

/// All env records that share one `(apiUrl, apiKey)` pair.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub key: ProviderKey,
    /// Relative names of every contributing env file, in input order.
    pub env_names: Vec<String>,
    pub supported_models: SupportedModels,
}

impl CandidateGroup {
    /// Display name for a brand-new entry.
    ///
    /// The host alone, or `<segment>@<host>#<fingerprint>` when the first
    /// env file lives under a named top-level directory (anything except
    /// `default`), so several credentials on one host stay distinguishable.
    pub fn display_name(&self) -> String {
        let host = self.key.host();
        let segment = self
            .env_names
            .first()
            .map(|name| top_segment(name))
            .unwrap_or_default();

        if segment.is_empty() || segment == "default" {
            host
        } else {
            format!("{}@{}#{}", segment, host, self.key.fingerprint())
        }
    }
}

/// Result of grouping env records.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    /// Groups ordered by `(host, first env name)`.
    pub groups: Vec<CandidateGroup>,
    /// Records without a base URL or auth token.
    pub skipped_envs: usize,
}

/// Group records by credential, unioning their model patterns.
pub fn group_candidates(records: &[EnvRecord]) -> Candidates {
    let mut groups: Vec<CandidateGroup> = Vec::new();
    let mut index: HashMap<ProviderKey, usize> = HashMap::new();
    let mut skipped_envs = 0;

    for record in records {
        let Some(key) = ProviderKey::from_record(record) else {
            skipped_envs += 1;
            continue;
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(CandidateGroup {
                key,
                env_names: Vec::new(),
                supported_models: SupportedModels::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.env_names.push(record.relative_name.clone());
        union_models(&mut group.supported_models, &model_patterns(record));
    }

    groups.sort_by_cached_key(|g| (g.key.host(), g.env_names.first().cloned().unwrap_or_default()));

    Candidates {
        groups,
        skipped_envs,
    }
}
