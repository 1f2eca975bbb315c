//! Remote Config template access through the v1 REST API.

pub mod constants;
pub mod error;
mod store;

pub use error::{RemoteConfigError, RemoteConfigErrorCode, RemoteConfigResult};
pub use store::ConfigStore;
