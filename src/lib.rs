//! Blocking REST client for Cloud Firestore and Firebase Remote Config, authenticated
//! with a Google service account.
//!
//! * [`auth`] signs service-account assertions and exchanges them for scoped tokens.
//! * [`firestore`] covers document CRUD, paginated listing and structured queries,
//!   translating between [`firestore::NativeValue`] and Firestore's tagged values.
//! * [`remote_config`] reads the Remote Config template.
//! * [`connection`] ties credentials and a project together and creates each store lazily.
//! * [`transport`] is the HTTP seam every store sends its requests through.
//!
//! Logging goes through the [`log`] facade; install any logger to see request traces.

pub mod auth;
pub mod connection;
pub mod firestore;
pub mod remote_config;
pub mod transport;

#[cfg(test)]
pub mod test_support;
