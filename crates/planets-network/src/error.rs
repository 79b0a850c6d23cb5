//! Network error types

use std::error::Error as StdError;

use thiserror::Error;

/// Errors a request can fail with
///
/// Decode failures are deliberately reported as a bare [`NetworkError::Decoding`];
/// the detail of what went wrong is only written to the log.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Neither a valid endpoint nor a valid raw URL was supplied
    #[error("Invalid request target")]
    InvalidTarget,
    /// The transport returned something that is not a usable HTTP response
    #[error("Invalid response")]
    InvalidResponse,
    /// HTTP status outside the 2xx range
    #[error("Server error ({status_code})")]
    ServerError {
        /// HTTP status code
        status_code: u16,
    },
    /// Response body could not be decoded into the requested type
    #[error("Decoding error")]
    Decoding,
    /// Request or resource timeout elapsed
    #[error("Request timeout")]
    Timeout,
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Invalid transport configuration
    #[error("Config error: {0}")]
    Config(String),
    /// Other transport error
    #[error("Transport error: {0}")]
    Transport(String),
}

impl NetworkError {
    /// HTTP status code carried by a [`NetworkError::ServerError`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetworkError::ServerError { status_code } => Some(*status_code),
            _ => None,
        }
    }

    /// Map an error raised while reading the response body
    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else {
            tracing::debug!("Could not read response body: {}", err);
            NetworkError::InvalidResponse
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_builder() {
            NetworkError::InvalidTarget
        } else if err.is_connect() {
            NetworkError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() || is_malformed_http(&err) {
            NetworkError::InvalidResponse
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}

/// Whether the peer answered with something the HTTP parser rejected
fn is_malformed_http(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            return hyper_err.is_parse() || hyper_err.is_parse_status();
        }
        source = cause.source();
    }
    false
}
