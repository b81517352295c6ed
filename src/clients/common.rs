//! Common utilities for gRPC clients.
//!
//! Provides shared channel configuration for the user directory and
//! analytics bindings.

use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use crate::error::{DomainError, DomainResult};

/// Configuration for gRPC clients.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// gRPC endpoint URL (e.g., "http://localhost:9090")
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9090".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl GrpcClientConfig {
    /// Create a new config with the given endpoint
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build a tonic Channel from this configuration
    pub async fn connect(&self) -> DomainResult<Channel> {
        if self.endpoint.trim().is_empty() {
            return Err(DomainError::validation().with_message("gRPC endpoint is required"));
        }

        let endpoint = Endpoint::from_shared(self.endpoint.clone())
            .map_err(|e| {
                DomainError::validation()
                    .with_detail(format!("invalid gRPC endpoint '{}': {e}", self.endpoint))
            })?
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout);

        debug!(endpoint = %self.endpoint, "Connecting to gRPC endpoint");

        endpoint.connect().await.map_err(|e| {
            DomainError::service_unavailable()
                .with_detail(format!("failed to connect to '{}': {e}", self.endpoint))
        })
    }
}
