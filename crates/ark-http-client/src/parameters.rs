//! Request descriptors and URL construction

use url::Url;

use crate::error::HttpError;

/// `Content-Type` header name
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Authorization` header name
pub const AUTHORIZATION: &str = "Authorization";
/// JSON media type
pub const APPLICATION_JSON: &str = "application/json";
/// Multipart media type, never set by hand: the transport owns the boundary
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Ordered request headers with case-insensitive names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.push((name, value.into()));
    }

    /// Builder form of [`Headers::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove a header, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let position = self
            .0
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(position).1)
    }

    /// Header value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no header is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the common header set
///
/// A `multipart/form-data` content type is dropped so the transport can set it
/// together with the boundary.
pub fn create_headers(content_type: Option<&str>, authorization: Option<&str>) -> Headers {
    let mut headers = Headers::new();
    if let Some(content_type) = content_type {
        if !content_type
            .to_ascii_lowercase()
            .starts_with(MULTIPART_FORM_DATA)
        {
            headers.insert(CONTENT_TYPE, content_type);
        }
    }
    if let Some(authorization) = authorization {
        headers.insert(AUTHORIZATION, authorization);
    }
    headers
}

/// Encode query pairs, skipping absent values
pub fn build_query_string<K, V, I>(params: I) -> Result<String, HttpError>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: ToString,
{
    let pairs: Vec<(String, String)> = params
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.into(), v.to_string())))
        .collect();
    Ok(serde_urlencoded::to_string(pairs)?)
}

/// How the response body is consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    /// Structured JSON
    #[default]
    Json,
    /// Opaque bytes
    Blob,
}

/// Logical description of a request target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    /// First path segment after the base URL
    pub controller: Option<String>,
    /// Sub-action segment after the controller
    pub action: Option<String>,
    /// Ordered query pairs
    pub query: Vec<(String, String)>,
    /// Headers sent with every attempt
    pub headers: Headers,
    /// Per-call base URL, overrides the client's
    pub base_url: Option<String>,
    /// Fully-qualified URL, wins over every other target field
    pub full_endpoint: Option<String>,
    /// Response body handling
    pub response_kind: ResponseKind,
}

impl RequestParameters {
    /// Target `{base}/{controller}`
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: Some(controller.into()),
            ..Default::default()
        }
    }

    /// Target a fully-qualified URL
    pub fn full_endpoint(url: impl Into<String>) -> Self {
        Self {
            full_endpoint: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the action segment
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Append a query pair
    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Replace the headers
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Set a single header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override the base URL for this call
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the response kind
    pub fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = kind;
        self
    }

    /// Resolve the URL for this request
    ///
    /// `{base}/{controller}[/{action}][/{id}][?{query}]`, absent or empty segments
    /// omitted. Route and id text is percent-encoded, so an id never adds path
    /// segments or a query of its own. A full endpoint is returned verbatim.
    pub fn url(&self, default_base_url: &str, id: Option<&str>) -> Result<String, HttpError> {
        if let Some(full_endpoint) = &self.full_endpoint {
            return Ok(full_endpoint.clone());
        }

        let base = self.base_url.as_deref().unwrap_or(default_base_url);
        let mut url = Url::parse(base)?;

        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| HttpError::Url(format!("{} cannot be a base", base)))?;
            path.pop_if_empty();

            // Controllers and actions may name nested routes such as `api/AppUser`
            let route = [self.controller.as_deref(), self.action.as_deref()];
            for piece in route
                .into_iter()
                .flatten()
                .flat_map(|segment| segment.split('/'))
                .filter(|piece| !piece.is_empty())
            {
                path.push(piece);
            }

            if let Some(id) = id.filter(|id| !id.trim_matches('/').is_empty()) {
                path.push(id);
            }
        }

        if !self.query.is_empty() {
            url.set_query(Some(&serde_urlencoded::to_string(&self.query)?));
        }

        Ok(url.to_string())
    }
}
