//! Deserializers for fields the remote API sends as either numbers or strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, numeric string or null -> `Option<f64>`.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// String, number or null -> `String` (empty for null).
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// String, number or null -> `Option<String>` (None for null or blank).
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = string(deserializer)?;
    Ok((!s.trim().is_empty()).then_some(s))
}

pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "string")]
        id: String,
        #[serde(default, deserialize_with = "opt_string")]
        note: Option<String>,
    }

    #[test]
    fn accepts_mixed_shapes() {
        let p: Probe = serde_json::from_value(json!({ "amount": "1200.5", "id": 42, "note": " " })).unwrap();
        assert_eq!(p.amount, Some(1200.5));
        assert_eq!(p.id, "42");
        assert_eq!(p.note, None);

        let p: Probe = serde_json::from_value(json!({ "amount": null, "id": null })).unwrap();
        assert_eq!(p.amount, None);
        assert_eq!(p.id, "");
    }

    #[test]
    fn missing_fields_default() {
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.amount, None);
        assert!(p.id.is_empty());
    }
}
