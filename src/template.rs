//! Projection of env records onto the cc-switch default settings template.

use serde_json::{Map, Value, json};

use crate::env::EnvRecord;

pub const SONNET_ALIAS_KEY: &str = "ANTHROPIC_DEFAULT_SONNET_MODEL";
pub const OPUS_ALIAS_KEY: &str = "ANTHROPIC_DEFAULT_OPUS_MODEL";
pub const HAIKU_ALIAS_KEY: &str = "ANTHROPIC_DEFAULT_HAIKU_MODEL";

/// The fallback template used when none is stored or it is malformed.
pub fn empty_template() -> Value {
    json!({ "env": {} })
}

/// Normalize a raw stored template.
///
/// Anything that is not a JSON object degrades to [`empty_template`]; an
/// object whose `env` is missing or not an object gets an empty `env`.
pub fn normalize_template(raw: Option<&str>) -> Value {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return empty_template();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(mut template)) => {
            if !template.get("env").is_some_and(Value::is_object) {
                template.insert("env".to_string(), Value::Object(Map::new()));
            }
            Value::Object(template)
        }
        _ => empty_template(),
    }
}

/// Build the settings document for `record` from `template`.
///
/// `env` is replaced by the record's fields plus model-role aliases, and the
/// top-level `model` follows the record's primary model. Aliases and `model`
/// are removed when the record no longer names a model, so a stale selection
/// never survives a re-import.
pub fn project_settings(template: &Value, record: &EnvRecord) -> Value {
    let mut env: Map<String, Value> = record
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    match record.model() {
        Some(model) => {
            env.insert(SONNET_ALIAS_KEY.to_string(), json!(model));
            env.insert(OPUS_ALIAS_KEY.to_string(), json!(model));
        }
        None => {
            env.remove(SONNET_ALIAS_KEY);
            env.remove(OPUS_ALIAS_KEY);
        }
    }

    match record.fast_model() {
        Some(fast) => {
            env.insert(HAIKU_ALIAS_KEY.to_string(), json!(fast));
        }
        None => {
            env.remove(HAIKU_ALIAS_KEY);
        }
    }

    let mut settings = match template {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    settings.insert("env".to_string(), Value::Object(env));
    match record.model() {
        Some(model) => {
            settings.insert("model".to_string(), json!(model));
        }
        None => {
            settings.remove("model");
        }
    }

    Value::Object(settings)
}
