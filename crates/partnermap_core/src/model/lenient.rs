//! Tolerant field decoders for persisted documents.
//!
//! Documents written by older clients may omit fields, store `null`, or carry
//! numbers where text is expected (phone numbers are the usual culprit). These
//! helpers turn every such shape into the model default instead of failing the
//! whole partner.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Decodes a text field; `null`, missing, and non-scalar values become `""`.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(scalar_to_string).unwrap_or_default())
}

/// Decodes a list of text values; anything that is not an array becomes `[]`.
pub(crate) fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .map(scalar_to_string)
        .filter(|value| !value.is_empty())
        .collect())
}

/// Decodes a list of nested records; `null` and non-arrays become `[]`.
///
/// Individual entries that do not decode are dropped.
pub(crate) fn record_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Decodes a stable id, assigning a fresh one when absent or unparsable.
pub(crate) fn stable_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .unwrap_or_else(Uuid::new_v4))
}

/// Decodes an optional text value for enum-like fields.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).map(str::to_string))
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::text")]
        name: String,
        #[serde(default, deserialize_with = "super::text_list")]
        tags: Vec<String>,
        #[serde(default = "Uuid::new_v4", deserialize_with = "super::stable_id")]
        id: Uuid,
    }

    #[test]
    fn null_and_missing_fields_take_defaults() {
        let probe: Probe = serde_json::from_value(json!({ "name": null })).unwrap();
        assert_eq!(probe.name, "");
        assert!(probe.tags.is_empty());
        assert!(!probe.id.is_nil());
    }

    #[test]
    fn numeric_text_is_stringified() {
        let probe: Probe =
            serde_json::from_value(json!({ "name": 612345678, "tags": ["a", 2, null] })).unwrap();
        assert_eq!(probe.name, "612345678");
        assert_eq!(probe.tags, vec!["a".to_string(), "2".to_string()]);
    }

    #[test]
    fn existing_id_is_kept() {
        let id = Uuid::new_v4();
        let probe: Probe = serde_json::from_value(json!({ "id": id.to_string() })).unwrap();
        assert_eq!(probe.id, id);
    }

    #[test]
    fn malformed_id_is_replaced() {
        let probe: Probe = serde_json::from_value(json!({ "id": "not-a-uuid" })).unwrap();
        assert!(!probe.id.is_nil());
    }
}
