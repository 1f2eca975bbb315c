mod builder;
mod filter;
mod structured_query;

pub use builder::{QueryBuilder, QueryCallback};
pub use filter::{FieldOperator, Filter, UnaryOperator};
pub use structured_query::{Direction, Order, StructuredQuery};
