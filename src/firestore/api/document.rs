use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::value::heuristics::reference_path;
use crate::firestore::value::{unwrap_fields, NativeValue};

/// A document as returned by the REST API, with its fields unwrapped.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Full resource name, `projects/<p>/databases/(default)/documents/<path>`.
    pub path: String,
    pub fields: BTreeMap<String, NativeValue>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    pub fn from_json(value: &JsonValue) -> FirestoreResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid_argument("Expected document object"))?;
        let path = object
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| invalid_argument("Document is missing its name"))?
            .to_string();
        let fields = match object.get("fields") {
            Some(fields) => unwrap_fields(fields)?,
            None => BTreeMap::new(),
        };
        Ok(Self {
            path,
            fields,
            create_time: parse_time(object.get("createTime"))?,
            update_time: parse_time(object.get("updateTime"))?,
        })
    }

    /// Last segment of the resource name.
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Path below the database's `documents` root, e.g. `users/u1`.
    pub fn relative_path(&self) -> Option<&str> {
        reference_path(&self.path)
    }

    pub fn get(&self, field: &str) -> Option<&NativeValue> {
        self.fields.get(field)
    }

    /// Deserializes the fields into a typed value.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> FirestoreResult<T> {
        NativeValue::Map(self.fields.clone()).deserialize_into()
    }
}

fn parse_time(value: Option<&JsonValue>) -> FirestoreResult<Option<DateTime<Utc>>> {
    let Some(value) = value.and_then(JsonValue::as_str) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(value)
        .map(|time| Some(time.with_timezone(&Utc)))
        .map_err(|err| invalid_argument(format!("Invalid document timestamp: {err}")))
}
