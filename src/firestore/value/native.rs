use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Number, Value as JsonValue};

use crate::firestore::error::{invalid_argument, unsupported_value_type, FirestoreResult};

/// Host-side value handed to and returned from the document store.
///
/// Numbers keep the integer/double distinction, but the two compare equal when they hold
/// the same number, so `Integer(3) == Double(3.0)`. A geopoint is a map with exactly the
/// keys `latitude` and `longitude`; a document reference is a string holding the full
/// resource name.
#[derive(Clone, Debug)]
pub enum NativeValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Array(Vec<NativeValue>),
    Map(BTreeMap<String, NativeValue>),
}

impl NativeValue {
    pub fn geo_point(latitude: f64, longitude: f64) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("latitude".to_string(), NativeValue::Double(latitude));
        fields.insert("longitude".to_string(), NativeValue::Double(longitude));
        NativeValue::Map(fields)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, NativeValue::Double(value) if value.is_nan())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NativeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of either number variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::Integer(value) => Some(*value as f64),
            NativeValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[NativeValue]> {
        match self {
            NativeValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, NativeValue>> {
        match self {
            NativeValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up `key` when this is a map.
    pub fn get(&self, key: &str) -> Option<&NativeValue> {
        self.as_map().and_then(|fields| fields.get(key))
    }

    /// Converts any `Serialize` value through its JSON representation.
    ///
    /// Values serde cannot express as JSON, such as maps keyed by structs or tuples, fail
    /// with `unsupported-value-type`. Timestamps serialize as strings on the way in; build
    /// a [`NativeValue::Timestamp`] explicitly to store a timestamp field.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> FirestoreResult<Self> {
        let json = serde_json::to_value(value)
            .map_err(|err| unsupported_value_type(format!("Cannot convert value: {err}")))?;
        Ok(Self::from(json))
    }

    /// Deserializes into a typed value. Timestamps are presented as RFC 3339 strings and
    /// bytes as arrays of numbers, which is what `chrono` and `Vec<u8>` expect.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> FirestoreResult<T> {
        serde_json::from_value(self.to_json())
            .map_err(|err| invalid_argument(format!("Cannot deserialize value: {err}")))
    }

    /// Plain (untagged) JSON rendering.
    pub fn to_json(&self) -> JsonValue {
        match self {
            NativeValue::Null => JsonValue::Null,
            NativeValue::Boolean(value) => JsonValue::Bool(*value),
            NativeValue::Integer(value) => JsonValue::Number(Number::from(*value)),
            NativeValue::Double(value) => Number::from_f64(*value)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            NativeValue::String(value) => JsonValue::String(value.clone()),
            NativeValue::Bytes(bytes) => {
                JsonValue::Array(bytes.iter().map(|byte| JsonValue::from(*byte)).collect())
            }
            NativeValue::Timestamp(timestamp) => {
                JsonValue::String(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            NativeValue::Array(values) => JsonValue::Array(values.iter().map(NativeValue::to_json).collect()),
            NativeValue::Map(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NativeValue::Null, NativeValue::Null) => true,
            (NativeValue::Boolean(left), NativeValue::Boolean(right)) => left == right,
            (NativeValue::Integer(left), NativeValue::Integer(right)) => left == right,
            (NativeValue::Double(left), NativeValue::Double(right)) => left == right,
            (NativeValue::Integer(left), NativeValue::Double(right))
            | (NativeValue::Double(right), NativeValue::Integer(left)) => *left as f64 == *right,
            (NativeValue::String(left), NativeValue::String(right)) => left == right,
            (NativeValue::Bytes(left), NativeValue::Bytes(right)) => left == right,
            (NativeValue::Timestamp(left), NativeValue::Timestamp(right)) => left == right,
            (NativeValue::Array(left), NativeValue::Array(right)) => left == right,
            (NativeValue::Map(left), NativeValue::Map(right)) => left == right,
            _ => false,
        }
    }
}

impl From<JsonValue> for NativeValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => NativeValue::Null,
            JsonValue::Bool(value) => NativeValue::Boolean(value),
            JsonValue::Number(number) => match number.as_i64() {
                Some(integer) => NativeValue::Integer(integer),
                None => NativeValue::Double(number.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(value) => NativeValue::String(value),
            JsonValue::Array(values) => NativeValue::Array(values.into_iter().map(NativeValue::from).collect()),
            JsonValue::Object(fields) => NativeValue::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, NativeValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Boolean(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        NativeValue::Integer(i64::from(value))
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Integer(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Double(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<Vec<u8>> for NativeValue {
    fn from(value: Vec<u8>) -> Self {
        NativeValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(value: DateTime<Utc>) -> Self {
        NativeValue::Timestamp(value)
    }
}

impl From<Vec<NativeValue>> for NativeValue {
    fn from(values: Vec<NativeValue>) -> Self {
        NativeValue::Array(values)
    }
}

impl From<BTreeMap<String, NativeValue>> for NativeValue {
    fn from(fields: BTreeMap<String, NativeValue>) -> Self {
        NativeValue::Map(fields)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(NativeValue::Null)
    }
}
