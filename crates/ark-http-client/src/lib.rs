//! Request builder for the Ark Blog HTTP API
//!
//! Requests are described by [`RequestParameters`] (controller, action, query,
//! headers or a full endpoint) and issued through [`HttpClient`], which applies one
//! automatic retry, a timeout and a single normalized [`HttpError`] to every call.
//! The wire itself sits behind the [`Transport`] trait; [`ReqwestTransport`] is the
//! default implementation.
//!
//! # Example
//!
//! ```no_run
//! use ark_http_client::{HttpClient, RequestParameters, Response};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     title: String,
//! }
//!
//! async fn example() -> Response<Vec<Post>> {
//!     let client = HttpClient::new("https://blog.example.com/api");
//!     let params = RequestParameters::new("Post").with_action("GetTop");
//!     client.get(&params, Some("5")).await
//! }
//! ```

mod backends;
mod client;
mod error;
mod parameters;
mod request;
mod response;
mod transport;

pub use backends::ReqwestTransport;
pub use client::{CallPolicy, HttpClient, HttpClientBuilder, FILE_TIMEOUT, JSON_TIMEOUT};
pub use error::HttpError;
pub use parameters::{
    build_query_string, create_headers, Headers, RequestParameters, ResponseKind,
    APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE, MULTIPART_FORM_DATA,
};
pub use request::{FilePart, HttpRequest, Method, MultipartForm, RequestBody};
pub use response::{RawResponse, Response};
pub use transport::Transport;
