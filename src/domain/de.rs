//! Best-effort field decoders for loosely typed host records.
//!
//! Every helper reads the raw JSON value first and falls back to "absent"
//! instead of failing, so one odd field never rejects a whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `T`, treating any shape mismatch as absent.
pub fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(d)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(raw).ok())
}

/// Integer from a number (floored) or a numeric string.
pub fn number<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_number(&Value::deserialize(d)?))
}

/// Like [`number`], but also unwraps the host's `{ "value": n }` form.
pub fn number_or_value<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(d)?;
    match &raw {
        Value::Object(map) => Ok(map.get("value").and_then(as_number)),
        other => Ok(as_number(other)),
    }
}

/// String from a plain string, `{ "value": s }` or `{ "name": s }`.
/// Empty strings count as absent.
pub fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_text(&Value::deserialize(d)?))
}

/// Plain string, with null and non-strings mapped to empty.
pub fn string_or_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Boolean that also accepts the numeric proficiency levels some systems use.
pub fn flag<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    })
}

/// Sequence of records, dropping entries that do not decode.
pub fn records<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

pub fn as_number(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.floor() as i64),
        _ => None,
    }
}

pub fn as_text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("value")
            .and_then(Value::as_str)
            .or_else(|| map.get("name").and_then(Value::as_str)),
        _ => None,
    }?;
    (!s.is_empty()).then(|| s.to_owned())
}
