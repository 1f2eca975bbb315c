use std::fmt;

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::query::filter::Filter;
use crate::firestore::query::structured_query::{Direction, Order, StructuredQuery};
use crate::firestore::value::NativeValue;

/// Receives the finished query on [`QueryBuilder::execute`].
pub type QueryCallback<'a, R> = Box<dyn Fn(&StructuredQuery) -> FirestoreResult<R> + 'a>;

/// Chainable structured query bound to the callback that runs it.
///
/// ```
/// use firebase_rest_sdk::firestore::{QueryBuilder, StructuredQuery};
///
/// # fn main() -> Result<(), firebase_rest_sdk::firestore::FirestoreError> {
/// let query = QueryBuilder::new("posts", |query: &StructuredQuery| Ok(query.to_json()))
///     .select("title")
///     .where_("votes", ">=", 10)?
///     .order_by("votes", "desc")
///     .limit(5)?;
/// let rendered = query.execute()?;
/// assert_eq!(rendered["limit"], 5);
/// # Ok(())
/// # }
/// ```
pub struct QueryBuilder<'a, R> {
    query: StructuredQuery,
    callback: QueryCallback<'a, R>,
}

impl<'a, R> QueryBuilder<'a, R> {
    /// Starts a query over the collection id `from`; an empty id queries without a
    /// `from` clause.
    pub fn new<F>(from: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&StructuredQuery) -> FirestoreResult<R> + 'a,
    {
        Self {
            query: StructuredQuery::new(Some(from.into())),
            callback: Box::new(callback),
        }
    }

    /// Adds a projected field. A blank field projects the document name (`__name__`).
    pub fn select(mut self, field: &str) -> Self {
        let field = if field.trim().is_empty() { "__name__" } else { field };
        self.query
            .select
            .get_or_insert_with(Vec::new)
            .push(field.to_string());
        self
    }

    /// Adds a filter; repeated calls are combined with AND.
    ///
    /// `operator` is one of `==`, `===`, `<`, `<=`, `>`, `>=`, `contains`, or the unary
    /// names `null` / `nan`.
    pub fn where_(mut self, field: &str, operator: &str, value: impl Into<NativeValue>) -> FirestoreResult<Self> {
        let filter = Filter::new(field, operator, &value.into())?;
        self.query.add_filter(filter);
        Ok(self)
    }

    /// Adds a sort key; earlier calls take precedence.
    pub fn order_by(mut self, field: &str, direction: &str) -> Self {
        self.query.order_by.push(Order {
            field: field.to_string(),
            direction: Direction::parse(direction),
        });
        self
    }

    /// Skips the first `offset` results. Accepts a non-negative whole number, given as an
    /// integer or an integral double; fractional, negative and non-numeric values are
    /// `firestore/invalid-argument`.
    pub fn offset(mut self, offset: impl Into<NativeValue>) -> FirestoreResult<Self> {
        self.query.offset = Some(count_argument("Offset", offset.into())?);
        Ok(self)
    }

    /// Caps the result count. Same rules as [`QueryBuilder::offset`]: `limit(2.5)` and
    /// `limit(-1)` are rejected with `firestore/invalid-argument`.
    pub fn limit(mut self, limit: impl Into<NativeValue>) -> FirestoreResult<Self> {
        self.query.limit = Some(count_argument("Limit", limit.into())?);
        Ok(self)
    }

    pub fn structured_query(&self) -> &StructuredQuery {
        &self.query
    }

    /// Runs the callback with the current query. Each call runs it again.
    pub fn execute(&self) -> FirestoreResult<R> {
        (self.callback)(&self.query)
    }
}

impl<R> fmt::Debug for QueryBuilder<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

fn count_argument(name: &str, value: NativeValue) -> FirestoreResult<i64> {
    let number = match value {
        NativeValue::Integer(number) => Some(number),
        NativeValue::Double(number) if number.is_finite() && number.fract() == 0.0 => Some(number as i64),
        _ => None,
    };
    number
        .filter(|number| *number >= 0)
        .ok_or_else(|| invalid_argument(format!("{name} is not a valid number!")))
}
