//! Firestore over the v1 REST API.
//!
//! [`DocumentStore`] is the entry point: it addresses documents and collections by
//! slash-delimited paths, converts fields with the codec in [`value`] and builds queries
//! through [`QueryBuilder`].
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use firebase_rest_sdk::firestore::{DocumentStore, NativeValue};
//!
//! # fn main() -> Result<(), firebase_rest_sdk::firestore::FirestoreError> {
//! let store = DocumentStore::new("ya29.token", "my-project")?;
//! let mut fields = BTreeMap::new();
//! fields.insert("title".to_string(), NativeValue::from("Hello"));
//! store.create_document("posts/hello", &fields)?;
//!
//! let popular = store
//!     .query("posts")
//!     .where_("votes", ">", 10)?
//!     .order_by("votes", "desc")
//!     .execute()?;
//! println!("{} popular posts", popular.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod constants;
pub mod error;
pub mod model;
pub mod query;
pub mod value;

pub use api::{Document, DocumentStore};
pub use error::{FirestoreError, FirestoreErrorCode, FirestoreResult};
pub use model::{collection_from_path, document_from_path, split_path, ResourcePath};
pub use query::{Direction, FieldOperator, Filter, QueryBuilder, StructuredQuery, UnaryOperator};
pub use value::{unwrap_fields, unwrap_value, wrap_fields, wrap_value, NativeValue, WireValue};
