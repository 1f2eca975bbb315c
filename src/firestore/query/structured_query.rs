use serde_json::{json, Value as JsonValue};

use crate::firestore::query::filter::{field_reference, Filter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Anything starting with `dec` or `desc` (any case) is descending; everything else,
    /// including an empty string, is ascending.
    pub fn parse(direction: &str) -> Self {
        let upper = direction.to_ascii_uppercase();
        if upper.starts_with("DEC") || upper.starts_with("DESC") {
            Direction::Descending
        } else {
            Direction::Ascending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// Accumulated state of a query, rendered as a REST `StructuredQuery`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructuredQuery {
    pub from: Option<String>,
    pub select: Option<Vec<String>>,
    pub filter: Option<Filter>,
    pub order_by: Vec<Order>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl StructuredQuery {
    pub fn new(from: Option<String>) -> Self {
        Self {
            from: from.filter(|collection| !collection.is_empty()),
            ..Self::default()
        }
    }

    /// Adds a filter: the first is stored as is, the second promotes the pair to an AND
    /// composite and later ones are appended to it.
    pub fn add_filter(&mut self, filter: Filter) {
        self.filter = Some(match self.filter.take() {
            None => filter,
            Some(Filter::And(mut filters)) => {
                filters.push(filter);
                Filter::And(filters)
            }
            Some(existing) => Filter::And(vec![existing, filter]),
        });
    }

    pub fn to_json(&self) -> JsonValue {
        let mut structured = serde_json::Map::new();

        if let Some(collection) = &self.from {
            structured.insert("from".to_string(), json!([{ "collectionId": collection }]));
        }

        if let Some(fields) = &self.select {
            let field_entries: Vec<_> = fields.iter().map(|field| field_reference(field)).collect();
            structured.insert("select".to_string(), json!({ "fields": field_entries }));
        }

        if let Some(filter) = &self.filter {
            structured.insert("where".to_string(), filter.to_json());
        }

        if !self.order_by.is_empty() {
            let orders: Vec<_> = self
                .order_by
                .iter()
                .map(|order| {
                    json!({
                        "field": field_reference(&order.field),
                        "direction": order.direction.as_str(),
                    })
                })
                .collect();
            structured.insert("orderBy".to_string(), JsonValue::Array(orders));
        }

        if let Some(offset) = self.offset {
            structured.insert("offset".to_string(), json!(offset));
        }

        if let Some(limit) = self.limit {
            structured.insert("limit".to_string(), json!(limit));
        }

        JsonValue::Object(structured)
    }
}
