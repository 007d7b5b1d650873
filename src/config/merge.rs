//! Field-by-field merging of configuration tiers.

use serde_json::Value;

/// Overlay `overlay` onto `base` in place.
///
/// Objects merge key by key; any other overlay value replaces the base
/// value. A `null` overlay means "not specified" and leaves the base alone.
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        if !value.is_null() {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge tiers in order, later tiers taking precedence.
pub fn merge_tiers(tiers: impl IntoIterator<Item = Value>) -> Value {
    tiers.into_iter().fold(Value::Null, |mut acc, tier| {
        merge_into(&mut acc, tier);
        acc
    })
}
