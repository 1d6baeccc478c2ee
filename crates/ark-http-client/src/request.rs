//! Resolved HTTP requests handed to a [`Transport`](crate::Transport)

use std::fmt;

use serde::Serialize;

use crate::error::HttpError;
use crate::parameters::Headers;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(method)
    }
}

/// File carried in a multipart upload
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// File name sent in the part's content disposition
    pub file_name: Option<String>,
    /// Media type of the file
    pub mime_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FilePart {
    /// File part from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Set the file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the media type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty file
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Multipart form: one file plus string fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    /// Form field name of the file
    pub file_field: String,
    /// The file
    pub file: FilePart,
    /// Extra string fields, in order
    pub fields: Vec<(String, String)>,
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Serialized JSON
    Json(Vec<u8>),
    /// Multipart form
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Serialize `body` as JSON
    pub fn json<B>(body: &B) -> Result<Self, HttpError>
    where
        B: Serialize + ?Sized,
    {
        Ok(RequestBody::Json(serde_json::to_vec(body)?))
    }

    /// True for multipart bodies
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// Fully resolved request, retried as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers
    pub headers: Headers,
    /// Body
    pub body: RequestBody,
}
