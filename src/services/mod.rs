// src/services/mod.rs
pub mod chat_client;
pub mod history_store;
pub mod report_builder;
pub mod report_client;

use serde_json::Value;

/// Loose truthiness used when merging payloads from external services:
/// null, false, zero and the empty string count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First key of `keys` whose value in `obj` is truthy.
pub fn first_truthy<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| is_truthy(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_loose_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(0.5)));
    }

    #[test]
    fn first_truthy_skips_empty_aliases() {
        let obj = json!({ "a": "", "b": 0, "c": "hit" });
        assert_eq!(first_truthy(&obj, &["a", "b", "c"]), Some(&json!("hit")));
        assert_eq!(first_truthy(&obj, &["a", "missing"]), None);
    }
}
