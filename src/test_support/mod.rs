//! Test utilities shared across crate-level unit tests.

mod transport;

use httpmock::MockServer;

pub use transport::RecordingTransport;

/// PKCS#8 RSA key used to sign assertions in tests.
pub const TEST_PRIVATE_KEY: &str = include_str!("fixtures/rsa_private.pem");

/// Public half of [`TEST_PRIVATE_KEY`].
pub const TEST_PUBLIC_KEY: &str = include_str!("fixtures/rsa_public.pem");

/// Start a fresh `httpmock::MockServer` instance for use in unit tests.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}
