use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::value::heuristics::{is_reference, looks_binary};
use crate::firestore::value::native::NativeValue;
use crate::firestore::value::wire::{decode_fields, encode_fields, WireValue};

/// Classifies a native value into its wire form.
///
/// * integral finite numbers become integers, everything else numeric a double;
/// * strings shaped like a document resource name become references, strings with
///   control bytes become bytes (see [`super::heuristics`]), the rest stay strings;
/// * a map holding exactly numeric `latitude` and `longitude` becomes a geopoint.
pub fn wrap_value(value: &NativeValue) -> WireValue {
    match value {
        NativeValue::Null => WireValue::Null,
        NativeValue::Boolean(value) => WireValue::Boolean(*value),
        NativeValue::Integer(value) => WireValue::Integer(*value),
        NativeValue::Double(value) => wrap_number(*value),
        NativeValue::String(value) => wrap_string(value),
        NativeValue::Bytes(bytes) => WireValue::Bytes(bytes.clone()),
        NativeValue::Timestamp(timestamp) => WireValue::Timestamp(*timestamp),
        NativeValue::Array(values) => WireValue::Array(values.iter().map(wrap_value).collect()),
        NativeValue::Map(fields) => match geo_point(fields) {
            Some((latitude, longitude)) => WireValue::GeoPoint {
                latitude,
                longitude,
            },
            None => WireValue::Map(wrap_map(fields)),
        },
    }
}

/// Inverse of [`wrap_value`]. References come back as plain strings and geopoints as
/// two-key maps.
pub fn unwrap_value(value: &WireValue) -> NativeValue {
    match value {
        WireValue::Null => NativeValue::Null,
        WireValue::Boolean(value) => NativeValue::Boolean(*value),
        WireValue::Integer(value) => NativeValue::Integer(*value),
        WireValue::Double(value) => NativeValue::Double(*value),
        WireValue::String(value) | WireValue::Reference(value) => NativeValue::String(value.clone()),
        WireValue::Bytes(bytes) => NativeValue::Bytes(bytes.clone()),
        WireValue::Timestamp(timestamp) => NativeValue::Timestamp(*timestamp),
        WireValue::GeoPoint {
            latitude,
            longitude,
        } => NativeValue::geo_point(*latitude, *longitude),
        WireValue::Array(values) => NativeValue::Array(values.iter().map(unwrap_value).collect()),
        WireValue::Map(fields) => NativeValue::Map(unwrap_map(fields)),
    }
}

/// Builds a document body, `{"fields": {...}}`.
pub fn wrap_fields(fields: &BTreeMap<String, NativeValue>) -> JsonValue {
    json!({ "fields": encode_fields(&wrap_map(fields)) })
}

/// Decodes the `fields` object of a document body. A missing or null object yields an
/// empty map.
pub fn unwrap_fields(fields: &JsonValue) -> FirestoreResult<BTreeMap<String, NativeValue>> {
    if fields.is_null() {
        return Ok(BTreeMap::new());
    }
    if !fields.is_object() {
        return Err(invalid_argument("Document fields must be an object"));
    }
    Ok(unwrap_map(&decode_fields(fields)?))
}

fn wrap_map(fields: &BTreeMap<String, NativeValue>) -> BTreeMap<String, WireValue> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), wrap_value(value)))
        .collect()
}

fn unwrap_map(fields: &BTreeMap<String, WireValue>) -> BTreeMap<String, NativeValue> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), unwrap_value(value)))
        .collect()
}

fn wrap_number(value: f64) -> WireValue {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    let integral = value.is_finite() && value.fract() == 0.0;
    if integral && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        WireValue::Integer(value as i64)
    } else {
        WireValue::Double(value)
    }
}

fn wrap_string(value: &str) -> WireValue {
    if is_reference(value) {
        WireValue::Reference(value.to_string())
    } else if looks_binary(value) {
        WireValue::Bytes(value.as_bytes().to_vec())
    } else {
        WireValue::String(value.to_string())
    }
}

fn geo_point(fields: &BTreeMap<String, NativeValue>) -> Option<(f64, f64)> {
    if fields.len() != 2 {
        return None;
    }
    let latitude = fields.get("latitude")?.as_f64()?;
    let longitude = fields.get("longitude")?.as_f64()?;
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn map(entries: Vec<(&str, NativeValue)>) -> BTreeMap<String, NativeValue> {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    #[test]
    fn integral_numbers_become_integers() {
        assert_eq!(wrap_value(&NativeValue::Double(42.0)), WireValue::Integer(42));
        assert_eq!(wrap_value(&NativeValue::Double(-3.0)), WireValue::Integer(-3));
        assert_eq!(wrap_value(&NativeValue::Double(3.25)), WireValue::Double(3.25));
        assert_eq!(wrap_value(&NativeValue::Integer(7)), WireValue::Integer(7));
        assert_eq!(
            wrap_value(&NativeValue::Double(f64::INFINITY)),
            WireValue::Double(f64::INFINITY)
        );
        assert_eq!(wrap_value(&NativeValue::Double(1e300)), WireValue::Double(1e300));
    }

    #[test]
    fn integer_wire_json_matches_firestore() {
        assert_eq!(
            wrap_value(&NativeValue::Double(42.0)).to_json(),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            wrap_value(&NativeValue::Double(3.25)).to_json(),
            json!({ "doubleValue": 3.25 })
        );
    }

    #[test]
    fn strings_are_classified() {
        let reference = "projects/p/databases/(default)/documents/users/u1";
        assert_eq!(
            wrap_value(&NativeValue::from(reference)),
            WireValue::Reference(reference.to_string())
        );
        assert_eq!(
            wrap_value(&NativeValue::from("\u{0}\u{1}ab")),
            WireValue::Bytes(vec![0, 1, b'a', b'b'])
        );
        assert_eq!(
            wrap_value(&NativeValue::from("hello\nworld")),
            WireValue::String("hello\nworld".into())
        );
        assert_eq!(
            unwrap_value(&WireValue::Reference(reference.to_string())),
            NativeValue::from(reference)
        );
    }

    #[test]
    fn geopoints_need_exactly_two_numeric_keys() {
        let point = NativeValue::Map(map(vec![
            ("latitude", NativeValue::Integer(10)),
            ("longitude", NativeValue::Double(20.5)),
        ]));
        assert_eq!(
            wrap_value(&point),
            WireValue::GeoPoint {
                latitude: 10.0,
                longitude: 20.5
            }
        );
        assert_eq!(unwrap_value(&wrap_value(&point)), point);

        let extra = NativeValue::Map(map(vec![
            ("latitude", NativeValue::Integer(10)),
            ("longitude", NativeValue::Integer(20)),
            ("label", NativeValue::from("home")),
        ]));
        assert!(matches!(wrap_value(&extra), WireValue::Map(_)));

        let textual = NativeValue::Map(map(vec![
            ("latitude", NativeValue::from("north")),
            ("longitude", NativeValue::Integer(20)),
        ]));
        assert!(matches!(wrap_value(&textual), WireValue::Map(_)));
    }

    #[test]
    fn nested_values_round_trip() {
        let fields = map(vec![
            ("title", NativeValue::from("Hello")),
            ("votes", NativeValue::Integer(3)),
            ("ratio", NativeValue::Double(0.25)),
            ("published", NativeValue::Boolean(true)),
            ("deleted", NativeValue::Null),
            ("at", NativeValue::Timestamp(Utc.timestamp_opt(1_700_000_000, 42).unwrap())),
            ("payload", NativeValue::Bytes(vec![1, 2, 3])),
            (
                "tags",
                NativeValue::Array(vec![NativeValue::from("a"), NativeValue::Integer(2)]),
            ),
            (
                "author",
                NativeValue::Map(map(vec![("name", NativeValue::from("Ada"))])),
            ),
        ]);

        let body = wrap_fields(&fields);
        let decoded = unwrap_fields(&body["fields"]).unwrap();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn wrap_fields_produces_document_body() {
        let body = wrap_fields(&map(vec![("count", NativeValue::Double(2.0))]));
        assert_eq!(body, json!({ "fields": { "count": { "integerValue": "2" } } }));
    }

    #[test]
    fn unwrap_fields_tolerates_missing_fields() {
        assert!(unwrap_fields(&JsonValue::Null).unwrap().is_empty());
        assert!(unwrap_fields(&json!([])).is_err());
    }
}
