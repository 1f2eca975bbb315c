use serde_json::{json, Value as JsonValue};

use crate::firestore::error::{invalid_operator, FirestoreResult};
use crate::firestore::value::{wrap_value, NativeValue, WireValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldOperator {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ArrayContains,
}

impl FieldOperator {
    /// Maps the comparison symbols accepted by `where_`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" | "===" => Some(FieldOperator::Equal),
            "<" => Some(FieldOperator::LessThan),
            "<=" => Some(FieldOperator::LessThanOrEqual),
            ">" => Some(FieldOperator::GreaterThan),
            ">=" => Some(FieldOperator::GreaterThanOrEqual),
            "contains" => Some(FieldOperator::ArrayContains),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOperator::Equal => "EQUAL",
            FieldOperator::LessThan => "LESS_THAN",
            FieldOperator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            FieldOperator::GreaterThan => "GREATER_THAN",
            FieldOperator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            FieldOperator::ArrayContains => "ARRAY_CONTAINS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    IsNull,
    IsNan,
}

impl UnaryOperator {
    /// Case-insensitive match on `null` / `nan`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "null" => Some(UnaryOperator::IsNull),
            "nan" => Some(UnaryOperator::IsNan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::IsNull => "IS_NULL",
            UnaryOperator::IsNan => "IS_NAN",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Field {
        field: String,
        op: FieldOperator,
        value: WireValue,
    },
    Unary {
        field: String,
        op: UnaryOperator,
    },
    /// Conjunction of filters; the REST API offers no other composite here.
    And(Vec<Filter>),
}

impl Filter {
    /// Builds a filter from a `where_` triple.
    ///
    /// Comparing against null or NaN is only expressible as a unary filter, so those
    /// values turn any comparison operator into `IS_NULL` / `IS_NAN`.
    pub fn new(field: impl Into<String>, operator: &str, value: &NativeValue) -> FirestoreResult<Self> {
        let field = field.into();
        if let Some(op) = FieldOperator::from_symbol(operator) {
            if value.is_null() {
                return Ok(Filter::Unary {
                    field,
                    op: UnaryOperator::IsNull,
                });
            }
            if value.is_nan() {
                return Ok(Filter::Unary {
                    field,
                    op: UnaryOperator::IsNan,
                });
            }
            return Ok(Filter::Field {
                field,
                op,
                value: wrap_value(value),
            });
        }

        UnaryOperator::from_name(operator)
            .map(|op| Filter::Unary { field, op })
            .ok_or_else(|| invalid_operator(operator))
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Filter::Field { field, op, value } => json!({
                "fieldFilter": {
                    "field": field_reference(field),
                    "op": op.as_str(),
                    "value": value.to_json(),
                }
            }),
            Filter::Unary { field, op } => json!({
                "unaryFilter": {
                    "field": field_reference(field),
                    "op": op.as_str(),
                }
            }),
            Filter::And(filters) => json!({
                "compositeFilter": {
                    "op": "AND",
                    "filters": filters.iter().map(Filter::to_json).collect::<Vec<_>>(),
                }
            }),
        }
    }
}

pub(crate) fn field_reference(field: &str) -> JsonValue {
    json!({ "fieldPath": field })
}
