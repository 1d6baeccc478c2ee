//! reqwest-based Transport implementation

use async_trait::async_trait;
use reqwest::header;
use reqwest::multipart::{Form, Part};

use crate::error::HttpError;
use crate::request::{HttpRequest, Method, MultipartForm, RequestBody};
use crate::response::{RawResponse, Response};
use crate::transport::Transport;

/// reqwest-based transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default reqwest settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport from a configured reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn multipart_form(form: MultipartForm) -> Response<Form> {
    let mut part = Part::bytes(form.file.bytes);
    if let Some(file_name) = form.file.file_name {
        part = part.file_name(file_name);
    }
    if let Some(mime_type) = form.file.mime_type {
        part = part.mime_str(&mime_type).map_err(HttpError::from)?;
    }

    let mut multipart = Form::new().part(form.file_field, part);
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    Ok(multipart)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Response<RawResponse> {
        let url = reqwest::Url::parse(&request.url)?;
        let mut builder = self.inner.request(request.method.into(), url);

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(multipart_form(form)?),
        };

        let response = builder.send().await.map_err(HttpError::from)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(HttpError::from)?;

        tracing::trace!("Received {} byte response with status {}", body.len(), status);

        Ok(RawResponse::new(status, content_type, body.to_vec()))
    }
}
