//! HTTP response types

use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// HTTP Response type - generic over the body type R and error type E
/// This is the primary return type for all HTTP operations
pub type Response<R, E = HttpError> = Result<R, E>;

/// Fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl RawResponse {
    /// Create a response from its parts
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Response with a JSON body
    pub fn json_body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, Some("application/json".to_string()), body.into())
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// `Content-Type` of the response, if sent
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the response body as text
    pub fn text(&self) -> Response<String> {
        String::from_utf8(self.body.clone()).map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Get the response body as JSON
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` accept it.
    pub fn json<T: DeserializeOwned>(&self) -> Response<T> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null").map_err(HttpError::from);
        }
        serde_json::from_slice(&self.body).map_err(HttpError::from)
    }

    /// Borrow the response body
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Take the response body
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}
