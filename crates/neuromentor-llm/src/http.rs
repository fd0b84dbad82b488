//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create a shared HTTP client with the standard NeuroMentor configuration.
///
/// Config: 30s connect timeout, 60s request timeout, rustls TLS,
/// `neuromentor/{version}` user-agent, redirect limit 10.
#[must_use]
pub fn default_client() -> reqwest::Client {
    builder(Duration::from_secs(60))
        .build()
        .expect("default HTTP client construction must not fail")
}

/// Same as [`default_client`] with a caller-provided request timeout.
#[must_use]
pub fn client_with_timeout(timeout: Duration) -> reqwest::Client {
    builder(timeout)
        .build()
        .expect("HTTP client construction with timeout must not fail")
}

fn builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("neuromentor/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
}
