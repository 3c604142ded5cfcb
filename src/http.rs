//! Shared HTTP client factory.
//!
//! Each pipeline phase builds its own pooled client so connections are
//! released when the phase ends.

use crate::error::ProbeError;
use reqwest::Client;
use std::time::Duration;

/// Timeout for discovery calls (provider and model listings).
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single chat-completion probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause between two consecutive probes.
pub const PROBE_DELAY: Duration = Duration::from_millis(100);

/// Create a new HTTP client without a client-wide timeout.
/// Callers bound each call themselves.
pub fn create_client() -> Result<Client, ProbeError> {
    Client::builder()
        .build()
        .map_err(|e| ProbeError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// Create a new HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProbeError::Transport(format!("failed to create HTTP client: {}", e)))
}
