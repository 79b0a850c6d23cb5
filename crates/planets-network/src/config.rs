//! Transport configuration

use std::time::Duration;

use crate::error::NetworkError;

/// Default idle timeout for connecting and for each wait on response data
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Default timeout for the whole call
pub const DEFAULT_RESOURCE_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeouts applied to the per-call transport client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bounds connecting and every idle wait for response bytes
    pub request_timeout: Duration,
    /// Bounds the entire call, from send to the last body byte
    pub resource_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            resource_timeout: DEFAULT_RESOURCE_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the resource timeout
    pub fn with_resource_timeout(mut self, timeout: Duration) -> Self {
        self.resource_timeout = timeout;
        self
    }

    /// Check the timeouts are usable
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.request_timeout.is_zero() || self.resource_timeout.is_zero() {
            return Err(NetworkError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        if self.resource_timeout < self.request_timeout {
            return Err(NetworkError::Config(format!(
                "resource timeout ({:?}) is shorter than request timeout ({:?})",
                self.resource_timeout, self.request_timeout
            )));
        }

        Ok(())
    }
}
