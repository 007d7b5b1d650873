//! `supportedModels` maps: pattern -> `true`.

use serde_json::{Map, Value};

use crate::env::EnvRecord;

/// Ordered set of supported model patterns, serialized as `{pattern: true}`.
pub type SupportedModels = Map<String, Value>;

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Normalize a stored `supportedModels` value.
///
/// Non-objects become empty; entries with a falsy flag are dropped and the
/// rest are set to `true`.
pub fn normalize_supported_models(value: Option<&Value>) -> SupportedModels {
    let Some(Value::Object(map)) = value else {
        return SupportedModels::new();
    };
    map.iter()
        .filter(|(_, flag)| is_truthy(flag))
        .map(|(pattern, _)| (pattern.clone(), Value::Bool(true)))
        .collect()
}

/// Union `other` into `models`, keeping first-seen order.
pub fn union_models(models: &mut SupportedModels, other: &SupportedModels) {
    for pattern in other.keys() {
        models.insert(pattern.clone(), Value::Bool(true));
    }
}

/// Model patterns an env record contributes.
///
/// A model id containing `/` contributes `<vendor>/*` (the part before the
/// first `/`); any other id contributes itself.
pub fn model_patterns(record: &EnvRecord) -> SupportedModels {
    let mut patterns = SupportedModels::new();
    for model in [record.model(), record.fast_model()].into_iter().flatten() {
        let model = model.trim();
        if model.is_empty() {
            continue;
        }
        match model.split_once('/') {
            Some((vendor, _)) => {
                let vendor = vendor.trim();
                if !vendor.is_empty() {
                    patterns.insert(format!("{}/*", vendor), Value::Bool(true));
                }
            }
            None => {
                patterns.insert(model.to_string(), Value::Bool(true));
            }
        }
    }
    patterns
}
