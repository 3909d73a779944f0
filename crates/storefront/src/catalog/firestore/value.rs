//! Typed Firestore REST values and their JSON equivalents.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as Json};

use crate::catalog::{CatalogError, Fields};

/// A Firestore value as it appears on the wire, e.g. `{"stringValue": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    StringValue(String),
    /// 64-bit integers travel as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    BooleanValue(bool),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
    NullValue(()),
    TimestampValue(String),
    GeoPointValue(GeoPoint),
    /// Base64.
    BytesValue(String),
    ReferenceValue(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A document resource returned by get, create and list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    /// Full resource name; the last path segment is the document id.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl RawDocument {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

/// One page of a list read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<RawDocument>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Convert a Firestore value to JSON.
///
/// Timestamps, bytes and references become strings; geo points become
/// `{latitude, longitude}` objects.
pub fn to_json(value: Value) -> Result<Json, CatalogError> {
    Ok(match value {
        Value::StringValue(s)
        | Value::TimestampValue(s)
        | Value::BytesValue(s)
        | Value::ReferenceValue(s) => Json::String(s),
        Value::IntegerValue(s) => {
            let n: i64 = s
                .parse()
                .map_err(|_| CatalogError::Decode(format!("invalid integer value: {s}")))?;
            Json::Number(n.into())
        }
        Value::DoubleValue(d) => Json::Number(
            Number::from_f64(d)
                .ok_or_else(|| CatalogError::Decode(format!("non-finite double value: {d}")))?,
        ),
        Value::BooleanValue(b) => Json::Bool(b),
        Value::MapValue(map) => Json::Object(fields_to_json(map.fields)?),
        Value::ArrayValue(array) => Json::Array(
            array
                .values
                .into_iter()
                .map(to_json)
                .collect::<Result<_, _>>()?,
        ),
        Value::NullValue(()) => Json::Null,
        Value::GeoPointValue(point) => serde_json::json!({
            "latitude": point.latitude,
            "longitude": point.longitude,
        }),
    })
}

/// Convert JSON to a Firestore value.
///
/// Integers that fit in `i64` become `integerValue`; every other number
/// becomes `doubleValue`.
pub fn from_json(value: Json) -> Value {
    match value {
        Json::Null => Value::NullValue(()),
        Json::Bool(b) => Value::BooleanValue(b),
        Json::Number(n) => n.as_i64().map_or_else(
            || Value::DoubleValue(n.as_f64().unwrap_or_default()),
            |i| Value::IntegerValue(i.to_string()),
        ),
        Json::String(s) => Value::StringValue(s),
        Json::Array(values) => Value::ArrayValue(ArrayValue {
            values: values.into_iter().map(from_json).collect(),
        }),
        Json::Object(map) => Value::MapValue(MapValue {
            fields: json_to_fields(map),
        }),
    }
}

/// Top-level fields written as native timestamps so server-side ordering
/// sorts them by time alongside documents stamped by other clients.
const TIMESTAMP_FIELDS: &[&str] = &["createdAt", "updatedAt"];

/// Convert a document body to its wire field map.
///
/// Like [`json_to_fields`], except that RFC 3339 strings in the
/// `createdAt`/`updatedAt` fields become `timestampValue`s.
pub fn document_to_fields(fields: Fields) -> BTreeMap<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Json::String(s)
                    if TIMESTAMP_FIELDS.contains(&key.as_str())
                        && DateTime::parse_from_rfc3339(&s).is_ok() =>
                {
                    Value::TimestampValue(s)
                }
                other => from_json(other),
            };
            (key, value)
        })
        .collect()
}

/// Convert a Firestore field map to document fields.
pub fn fields_to_json(fields: BTreeMap<String, Value>) -> Result<Fields, CatalogError> {
    fields
        .into_iter()
        .map(|(key, value)| Ok((key, to_json(value)?)))
        .collect()
}

/// Convert document fields to a Firestore field map.
pub fn json_to_fields(fields: Fields) -> BTreeMap<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, from_json(value)))
        .collect()
}
