//! Conversion between host values and Firestore's tagged REST values.
//!
//! [`NativeValue`] is what callers read and write. [`WireValue`] mirrors the REST
//! `Value` message and knows its JSON shape. [`wrap_value`] and [`unwrap_value`] move
//! between the two, applying the number, string and geopoint classification rules.

mod codec;
pub mod heuristics;
mod native;
mod wire;

pub use codec::{unwrap_fields, unwrap_value, wrap_fields, wrap_value};
pub use native::NativeValue;
pub use wire::{decode_fields, encode_fields, WireValue};
