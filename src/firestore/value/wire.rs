use std::collections::BTreeMap;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value as JsonValue};

use crate::firestore::error::{invalid_argument, FirestoreResult};

/// A Firestore value in its tagged REST form (`{"<kind>Value": payload}`).
#[derive(Clone, Debug, PartialEq)]
pub enum WireValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Full resource name, `projects/<p>/databases/(default)/documents/<path>`.
    Reference(String),
    Timestamp(DateTime<Utc>),
    GeoPoint { latitude: f64, longitude: f64 },
    Array(Vec<WireValue>),
    Map(BTreeMap<String, WireValue>),
}

impl WireValue {
    pub fn to_json(&self) -> JsonValue {
        match self {
            WireValue::Null => json!({ "nullValue": JsonValue::Null }),
            WireValue::Boolean(boolean) => json!({ "booleanValue": boolean }),
            WireValue::Integer(integer) => json!({ "integerValue": integer.to_string() }),
            WireValue::Double(double) => json!({ "doubleValue": encode_double(*double) }),
            WireValue::String(string) => json!({ "stringValue": string }),
            WireValue::Bytes(bytes) => json!({ "bytesValue": BASE64_STANDARD.encode(bytes) }),
            WireValue::Reference(reference) => json!({ "referenceValue": reference }),
            WireValue::Timestamp(timestamp) => {
                json!({ "timestampValue": timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true) })
            }
            WireValue::GeoPoint {
                latitude,
                longitude,
            } => json!({
                "geoPointValue": {
                    "latitude": latitude,
                    "longitude": longitude,
                }
            }),
            WireValue::Array(values) => {
                let values = values.iter().map(WireValue::to_json).collect::<Vec<_>>();
                json!({ "arrayValue": { "values": values } })
            }
            WireValue::Map(fields) => json!({
                "mapValue": {
                    "fields": encode_fields(fields)
                }
            }),
        }
    }

    /// Decodes a tagged value. Unrecognised tags decode to [`WireValue::Null`]; a
    /// recognised tag with a malformed payload is an error.
    pub fn from_json(value: &JsonValue) -> FirestoreResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid_argument("Expected Firestore value object"))?;

        if let Some(bool_value) = object.get("booleanValue") {
            let value = bool_value
                .as_bool()
                .ok_or_else(|| invalid_argument("booleanValue must be bool"))?;
            return Ok(WireValue::Boolean(value));
        }
        if let Some(integer_value) = object.get("integerValue") {
            let parsed = match integer_value {
                JsonValue::String(value) => i64::from_str(value)
                    .map_err(|err| invalid_argument(format!("Invalid integerValue: {err}")))?,
                JsonValue::Number(number) => number
                    .as_i64()
                    .ok_or_else(|| invalid_argument("Integer out of range"))?,
                _ => return Err(invalid_argument("integerValue must be a string or number")),
            };
            return Ok(WireValue::Integer(parsed));
        }
        if let Some(double_value) = object.get("doubleValue") {
            let parsed = match double_value {
                JsonValue::Number(number) => number
                    .as_f64()
                    .ok_or_else(|| invalid_argument("Invalid doubleValue"))?,
                JsonValue::String(value) => value
                    .parse::<f64>()
                    .map_err(|err| invalid_argument(format!("Invalid doubleValue: {err}")))?,
                _ => return Err(invalid_argument("doubleValue must be a number or string")),
            };
            return Ok(WireValue::Double(parsed));
        }
        if let Some(timestamp_value) = object.get("timestampValue") {
            let timestamp = timestamp_value
                .as_str()
                .ok_or_else(|| invalid_argument("timestampValue must be string"))?;
            let parsed = DateTime::parse_from_rfc3339(timestamp)
                .map_err(|err| invalid_argument(format!("Invalid timestamp: {err}")))?;
            return Ok(WireValue::Timestamp(parsed.with_timezone(&Utc)));
        }
        if let Some(string_value) = object.get("stringValue") {
            let string = string_value
                .as_str()
                .ok_or_else(|| invalid_argument("stringValue must be string"))?;
            return Ok(WireValue::String(string.to_string()));
        }
        if let Some(bytes_value) = object.get("bytesValue") {
            let encoded = bytes_value
                .as_str()
                .ok_or_else(|| invalid_argument("bytesValue must be base64 string"))?;
            let decoded = BASE64_STANDARD
                .decode(encoded)
                .map_err(|err| invalid_argument(format!("Invalid bytesValue: {err}")))?;
            return Ok(WireValue::Bytes(decoded));
        }
        if let Some(reference_value) = object.get("referenceValue") {
            let reference = reference_value
                .as_str()
                .ok_or_else(|| invalid_argument("referenceValue must be string"))?;
            return Ok(WireValue::Reference(reference.to_string()));
        }
        if let Some(geo_point) = object.get("geoPointValue") {
            // Proto3 JSON omits zero coordinates.
            let coordinate = |name: &str| -> FirestoreResult<f64> {
                match geo_point.get(name) {
                    None => Ok(0.0),
                    Some(value) => value
                        .as_f64()
                        .ok_or_else(|| invalid_argument(format!("geoPointValue.{name} must be a number"))),
                }
            };
            return Ok(WireValue::GeoPoint {
                latitude: coordinate("latitude")?,
                longitude: coordinate("longitude")?,
            });
        }
        if let Some(array_value) = object.get("arrayValue") {
            let values = match array_value.get("values").and_then(JsonValue::as_array) {
                Some(entries) => entries
                    .iter()
                    .map(WireValue::from_json)
                    .collect::<FirestoreResult<Vec<_>>>()?,
                None => Vec::new(),
            };
            return Ok(WireValue::Array(values));
        }
        if let Some(map_value) = object.get("mapValue") {
            let fields = match map_value.get("fields") {
                Some(fields) => decode_fields(fields)?,
                None => BTreeMap::new(),
            };
            return Ok(WireValue::Map(fields));
        }

        if !object.contains_key("nullValue") {
            log::warn!(
                "Unrecognised Firestore value {:?}; decoding as null",
                object.keys().collect::<Vec<_>>()
            );
        }
        Ok(WireValue::Null)
    }
}

/// Encodes a field map as the JSON object found under `fields` in documents and maps.
pub fn encode_fields(fields: &BTreeMap<String, WireValue>) -> JsonValue {
    let mut encoded = serde_json::Map::new();
    for (key, value) in fields {
        encoded.insert(key.clone(), value.to_json());
    }
    JsonValue::Object(encoded)
}

pub fn decode_fields(fields: &JsonValue) -> FirestoreResult<BTreeMap<String, WireValue>> {
    let object = fields
        .as_object()
        .ok_or_else(|| invalid_argument("Expected 'fields' to be an object"))?;
    let mut decoded = BTreeMap::new();
    for (key, value) in object {
        decoded.insert(key.clone(), WireValue::from_json(value)?);
    }
    Ok(decoded)
}

fn encode_double(value: f64) -> JsonValue {
    if value.is_nan() {
        JsonValue::from("NaN")
    } else if value.is_infinite() {
        JsonValue::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        json!(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn integers_travel_as_strings() {
        assert_eq!(WireValue::Integer(42).to_json(), json!({ "integerValue": "42" }));
        assert_eq!(
            WireValue::from_json(&json!({ "integerValue": "-7" })).unwrap(),
            WireValue::Integer(-7)
        );
        assert_eq!(
            WireValue::from_json(&json!({ "integerValue": 7 })).unwrap(),
            WireValue::Integer(7)
        );
    }

    #[test]
    fn non_finite_doubles_travel_as_strings() {
        assert_eq!(
            WireValue::Double(f64::INFINITY).to_json(),
            json!({ "doubleValue": "Infinity" })
        );
        assert_eq!(WireValue::Double(f64::NAN).to_json(), json!({ "doubleValue": "NaN" }));
        match WireValue::from_json(&json!({ "doubleValue": "NaN" })).unwrap() {
            WireValue::Double(value) => assert!(value.is_nan()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            WireValue::from_json(&json!({ "doubleValue": "-Infinity" })).unwrap(),
            WireValue::Double(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn timestamps_keep_nanoseconds() {
        let timestamp = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let encoded = WireValue::Timestamp(timestamp).to_json();
        assert_eq!(
            encoded,
            json!({ "timestampValue": "2023-11-14T22:13:20.123456789Z" })
        );
        assert_eq!(WireValue::from_json(&encoded).unwrap(), WireValue::Timestamp(timestamp));
    }

    #[test]
    fn bytes_use_standard_base64() {
        let encoded = WireValue::Bytes(vec![0xfb, 0xff, 0x01]).to_json();
        assert_eq!(encoded, json!({ "bytesValue": "+/8B" }));
    }

    #[test]
    fn nested_containers_decode() {
        let json = json!({
            "mapValue": {
                "fields": {
                    "tags": { "arrayValue": { "values": [{ "stringValue": "a" }, { "nullValue": null }] } },
                    "empty": { "arrayValue": {} },
                    "where": { "geoPointValue": { "latitude": 51.5 } }
                }
            }
        });
        let mut expected = BTreeMap::new();
        expected.insert(
            "tags".to_string(),
            WireValue::Array(vec![WireValue::String("a".into()), WireValue::Null]),
        );
        expected.insert("empty".to_string(), WireValue::Array(Vec::new()));
        expected.insert(
            "where".to_string(),
            WireValue::GeoPoint {
                latitude: 51.5,
                longitude: 0.0,
            },
        );
        assert_eq!(WireValue::from_json(&json).unwrap(), WireValue::Map(expected));
    }

    #[test]
    fn unknown_tags_decode_to_null() {
        assert_eq!(
            WireValue::from_json(&json!({ "vectorValue": [1, 2] })).unwrap(),
            WireValue::Null
        );
        assert!(WireValue::from_json(&json!("plain")).is_err());
        assert!(WireValue::from_json(&json!({ "booleanValue": "yes" })).is_err());
    }
}
