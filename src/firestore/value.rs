//! Conversion between plain JSON documents and Firestore REST typed values
//!
//! Documents are handled as `serde_json` objects. On the wire every value is
//! wrapped in a single-key object naming its type (`{"stringValue": "x"}`).

use crate::error::FirestoreError;
use crate::firestore::timestamp::Timestamp;
use base64::Engine;
use serde_json::{json, Map, Number, Value};

/// Document payload: an opaque JSON object
pub type DocumentData = Map<String, Value>;

/// Encode a JSON value as a Firestore REST value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => encode_number(n),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn encode_number(n: &Number) -> Value {
    // int64 travels as a decimal string
    if let Some(i) = n.as_i64() {
        return json!({ "integerValue": i.to_string() });
    }
    // u64 above i64::MAX and all fractional values become doubles
    json!({ "doubleValue": n.as_f64().unwrap_or(0.0) })
}

/// Encode every field of a document
pub fn encode_fields(data: &DocumentData) -> Map<String, Value> {
    data.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Decode the `fields` object of a REST document
pub fn decode_fields(fields: &Map<String, Value>) -> Result<DocumentData, FirestoreError> {
    let mut data = Map::new();
    for (key, value) in fields {
        data.insert(key.clone(), decode_value(value)?);
    }
    Ok(data)
}

/// Decode one Firestore REST value
///
/// Timestamps come back as RFC 3339 strings with nanosecond precision, bytes
/// as their base64 text, references as the document name and geo points as
/// `{latitude, longitude}` objects.
pub fn decode_value(value: &Value) -> Result<Value, FirestoreError> {
    let Some(object) = value.as_object() else {
        return Err(invalid("expected a typed value object", value));
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Err(invalid("empty typed value", value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| invalid("booleanValue is not a bool", inner)),
        "integerValue" => decode_integer(inner),
        "doubleValue" => decode_double(inner),
        "stringValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| invalid("expected a string", inner)),
        "timestampValue" => {
            let Some(text) = inner.as_str() else {
                return Err(invalid("timestampValue is not a string", inner));
            };
            let ts = Timestamp::parse_rfc3339(text)?;
            Ok(Value::String(ts.to_rfc3339()?))
        }
        "bytesValue" => {
            let Some(text) = inner.as_str() else {
                return Err(invalid("bytesValue is not a string", inner));
            };
            base64::engine::general_purpose::STANDARD
                .decode(text)
                .map_err(|e| FirestoreError::InvalidData(format!("bytesValue is not base64: {}", e)))?;
            Ok(Value::String(text.to_string()))
        }
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
            "longitude": inner.get("longitude").and_then(Value::as_f64).unwrap_or(0.0)
        })),
        "arrayValue" => {
            let mut items = Vec::new();
            if let Some(values) = inner.get("values").and_then(Value::as_array) {
                for item in values {
                    items.push(decode_value(item)?);
                }
            }
            Ok(Value::Array(items))
        }
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            None => Ok(Value::Object(Map::new())),
            Some(fields) => Ok(Value::Object(decode_fields(fields)?)),
        },
        other => Err(FirestoreError::InvalidData(format!("unsupported value type {}", other))),
    }
}

fn decode_integer(inner: &Value) -> Result<Value, FirestoreError> {
    let parsed = match inner {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed
        .map(|i| Value::Number(i.into()))
        .ok_or_else(|| invalid("integerValue is not an int64", inner))
}

fn decode_double(inner: &Value) -> Result<Value, FirestoreError> {
    match inner {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        // Non-finite doubles are sent as "NaN", "Infinity" and "-Infinity"
        Value::String(s) => Ok(Value::String(s.clone())),
        _ => Err(invalid("doubleValue is not a number", inner)),
    }
}

fn invalid(what: &str, value: &Value) -> FirestoreError {
    FirestoreError::InvalidData(format!("{}: {}", what, value))
}

/// Leaf field paths of a document, as used in an update mask
///
/// Nested non-empty objects contribute their own leaves so a merge write
/// only touches the fields that were supplied. Empty objects are leaves.
pub fn field_paths(data: &DocumentData) -> Vec<String> {
    let mut paths = Vec::new();
    collect_field_paths(None, data, &mut paths);
    paths
}

fn collect_field_paths(prefix: Option<&str>, data: &DocumentData, out: &mut Vec<String>) {
    for (key, value) in data {
        let segment = quote_segment(key);
        let path = match prefix {
            None => segment,
            Some(prefix) => format!("{}.{}", prefix, segment),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                collect_field_paths(Some(path.as_str()), inner, out)
            }
            _ => out.push(path),
        }
    }
}

/// Quote a field name for use in a field path
///
/// Simple names (`[A-Za-z_][A-Za-z0-9_]*`) are used as-is, anything else is
/// wrapped in backticks with `` ` `` and `\` escaped.
pub fn quote_segment(name: &str) -> String {
    let mut chars = name.chars();
    let simple = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if simple {
        return name.to_string();
    }
    format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
}
