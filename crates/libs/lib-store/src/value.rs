//! # Typed Value Codec
//!
//! The store's wire format wraps every field in a type tag
//! (`{"stringValue": "x"}`, `{"arrayValue": {"values": [...]}}`, ...).
//! This module converts between that encoding and plain JSON so documents
//! can be (de)serialized with ordinary serde derives.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{Result, StoreError};

/// Encode a plain JSON value into the store's typed encoding.
pub fn to_store_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Integers travel stringified on the wire
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_store_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let mut fields = Map::new();
            for (key, item) in map {
                fields.insert(key.clone(), to_store_value(item));
            }
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode one typed value back into plain JSON.
pub fn from_store_value(value: &Value) -> Result<Value> {
    let map = value
        .as_object()
        .ok_or_else(|| StoreError::Decode("value is not an object".to_string()))?;
    let (tag, inner) = map
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty value object".to_string()))?;

    let decoded = match tag.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.clone(),
        "integerValue" => {
            let raw = inner
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| inner.to_string());
            let parsed: i64 = raw
                .parse()
                .map_err(|_| StoreError::Decode(format!("bad integerValue: {}", raw)))?;
            json!(parsed)
        }
        "doubleValue" => inner.clone(),
        // Timestamps arrive RFC 3339; chrono-backed fields parse them as-is
        "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let decoded: Result<Vec<Value>> = items.iter().map(from_store_value).collect();
            Value::Array(decoded?)
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Value::Object(decode_fields(&fields)?)
        }
        other => {
            return Err(StoreError::Decode(format!("unsupported value tag: {}", other)));
        }
    };
    Ok(decoded)
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), from_store_value(value)?);
    }
    Ok(out)
}

/// Serialize a record into a `{"fields": {...}}` document body.
pub fn encode_document<T: Serialize>(record: &T) -> Result<Value> {
    let plain = serde_json::to_value(record).map_err(|e| StoreError::Decode(e.to_string()))?;
    let object = plain
        .as_object()
        .ok_or_else(|| StoreError::Decode("record did not serialize to an object".to_string()))?;

    let mut fields = Map::new();
    for (key, value) in object {
        fields.insert(key.clone(), to_store_value(value));
    }
    Ok(json!({ "fields": fields }))
}

/// Deserialize a record from a document's `fields`, injecting the document
/// id under `id_field` when the stored record does not carry it itself.
pub fn decode_document<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    id_field: &str,
    document_id: &str,
) -> Result<T> {
    let mut object = decode_fields(fields)?;
    object
        .entry(id_field.to_string())
        .or_insert_with(|| Value::String(document_id.to_string()));

    serde_json::from_value(Value::Object(object)).map_err(|e| StoreError::Decode(e.to_string()))
}
