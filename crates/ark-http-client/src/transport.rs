//! HTTP Transport trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::request::HttpRequest;
use crate::response::{RawResponse, Response};

/// Sends one resolved request over the wire
///
/// A transport performs a single attempt and returns the response whatever its
/// status; retry, timeout and status handling live in
/// [`HttpClient`](crate::HttpClient).
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send the request and read the whole response
    async fn send(&self, request: HttpRequest) -> Response<RawResponse>;
}
