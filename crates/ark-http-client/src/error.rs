//! HTTP error types

use thiserror::Error;

/// Normalized HTTP error
///
/// Every failed call ends in exactly one of these once the retry is spent. The
/// display text tells a server answer (`Error Code: ...`) apart from a failure on
/// this side of the wire (`Error: ...`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// Server answered with a non-2xx status
    #[error("Error Code: {status}\nMessage: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, or the status reason when the body is empty
        message: String,
    },
    /// Connection error, no response was received
    #[error("Error: connection failed: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Error: request timed out")]
    Timeout,
    /// Request body could not be encoded or response body could not be decoded
    #[error("Error: serialization failed: {0}")]
    Serialization(String),
    /// Target URL is malformed
    #[error("Error: invalid url: {0}")]
    Url(String),
    /// Client build error
    #[error("Error: client build failed: {0}")]
    Build(String),
    /// Other client side error
    #[error("Error: {0}")]
    Other(String),
}

impl HttpError {
    /// True when no server response is involved
    pub fn is_client_side(&self) -> bool {
        !matches!(self, HttpError::Status { .. })
    }

    /// Status code of a server error response
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if let Some(status) = err.status() {
            HttpError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            HttpError::Connection(err.to_string())
        } else if err.is_decode() || err.is_body() {
            HttpError::Serialization(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for HttpError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        HttpError::Url(err.to_string())
    }
}
