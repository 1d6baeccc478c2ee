//! HTTP client wrapper

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::backends::ReqwestTransport;
use crate::error::HttpError;
use crate::parameters::{RequestParameters, ResponseKind, APPLICATION_JSON, CONTENT_TYPE};
use crate::request::{FilePart, HttpRequest, Method, MultipartForm, RequestBody};
use crate::response::{RawResponse, Response};
use crate::transport::Transport;

/// Deadline for JSON operations
pub const JSON_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for file uploads and downloads
pub const FILE_TIMEOUT: Duration = Duration::from_secs(60);

/// Retry and timeout policy applied to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    /// Extra attempts after a failed one
    pub retries: u32,
    /// Deadline for JSON operations, retry included
    pub json_timeout: Duration,
    /// Deadline for uploads and downloads, retry included
    pub file_timeout: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            json_timeout: JSON_TIMEOUT,
            file_timeout: FILE_TIMEOUT,
        }
    }
}

/// HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    policy: CallPolicy,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: Arc::new(ReqwestTransport::new()),
            policy: CallPolicy::default(),
        }
    }

    /// Create a new HTTP client builder
    pub fn builder(base_url: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(base_url)
    }

    /// Create an HttpClient over a custom transport
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            policy: CallPolicy::default(),
        }
    }

    /// Default base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry and timeout policy
    pub fn policy(&self) -> CallPolicy {
        self.policy
    }

    /// Issue a request
    ///
    /// Resolves the URL, retries once on failure and bounds the whole call by the
    /// JSON or file deadline. Non-2xx answers become [`HttpError::Status`].
    #[instrument(skip(self, params, body), fields(controller = ?params.controller, action = ?params.action))]
    pub async fn execute(
        &self,
        method: Method,
        params: &RequestParameters,
        id: Option<&str>,
        body: RequestBody,
    ) -> Response<RawResponse> {
        let url = params.url(&self.base_url, id)?;

        let mut headers = params.headers.clone();
        match &body {
            RequestBody::Json(_) if headers.get(CONTENT_TYPE).is_none() => {
                headers.insert(CONTENT_TYPE, APPLICATION_JSON);
            }
            RequestBody::Multipart(_) => {
                headers.remove(CONTENT_TYPE);
            }
            _ => {}
        }

        let deadline = if body.is_multipart() || params.response_kind == ResponseKind::Blob {
            self.policy.file_timeout
        } else {
            self.policy.json_timeout
        };

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };

        tracing::debug!("{} {}", request.method, request.url);

        let result = match tokio::time::timeout(deadline, self.send_with_retry(request)).await {
            Ok(result) => result,
            Err(_) => Err(HttpError::Timeout),
        };

        if let Err(err) = &result {
            tracing::error!("{}", err);
        }

        result
    }

    async fn send_with_retry(&self, request: HttpRequest) -> Response<RawResponse> {
        let mut attempt = 0;
        loop {
            match self.send_once(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.policy.retries => {
                    attempt += 1;
                    tracing::debug!("Attempt {} failed, retrying: {}", attempt, err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, request: HttpRequest) -> Response<RawResponse> {
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let message = response
                .text()
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| status_reason(response.status()).to_string());
            return Err(HttpError::Status {
                status: response.status(),
                message,
            });
        }

        Ok(response)
    }

    /// GET, returns JSON deserialized to R
    pub async fn get<R>(&self, params: &RequestParameters, id: Option<&str>) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.execute(Method::Get, params, id, RequestBody::Empty)
            .await?
            .json()
    }

    /// POST with JSON body, returns JSON deserialized to R
    pub async fn post<B, R>(&self, params: &RequestParameters, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::Post, params, None, RequestBody::json(body)?)
            .await?
            .json()
    }

    /// PUT with JSON body, returns JSON deserialized to R
    pub async fn put<B, R>(&self, params: &RequestParameters, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::Put, params, None, RequestBody::json(body)?)
            .await?
            .json()
    }

    /// PATCH with JSON body, returns JSON deserialized to R
    pub async fn patch<B, R>(&self, params: &RequestParameters, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::Patch, params, None, RequestBody::json(body)?)
            .await?
            .json()
    }

    /// DELETE `{target}/{id}`, returns JSON deserialized to R
    pub async fn delete<R>(&self, params: &RequestParameters, id: &str) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.execute(Method::Delete, params, Some(id), RequestBody::Empty)
            .await?
            .json()
    }

    /// Multipart POST of `file` under `field_name` plus `extra_fields`
    pub async fn upload_file<R>(
        &self,
        params: &RequestParameters,
        file: FilePart,
        field_name: &str,
        extra_fields: Vec<(String, String)>,
    ) -> Response<R>
    where
        R: DeserializeOwned,
    {
        let form = MultipartForm {
            file_field: field_name.to_string(),
            file,
            fields: extra_fields,
        };

        self.execute(Method::Post, params, None, RequestBody::Multipart(form))
            .await?
            .json()
    }

    /// GET returning the body as opaque bytes
    pub async fn download_file(
        &self,
        params: &RequestParameters,
        id: Option<&str>,
    ) -> Response<Vec<u8>> {
        let params = params.clone().with_response_kind(ResponseKind::Blob);
        Ok(self
            .execute(Method::Get, &params, id, RequestBody::Empty)
            .await?
            .into_bytes())
    }
}

/// HTTP client builder for configuring policy, proxy and TLS settings
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    policy: CallPolicy,
    accept_invalid_certs: bool,
    proxy: Option<url::Url>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl HttpClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            policy: CallPolicy::default(),
            accept_invalid_certs: false,
            proxy: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Number of extra attempts after a failure
    pub fn retries(mut self, retries: u32) -> Self {
        self.policy.retries = retries;
        self
    }

    /// Deadline for JSON operations
    pub fn json_timeout(mut self, timeout: Duration) -> Self {
        self.policy.json_timeout = timeout;
        self
    }

    /// Deadline for uploads and downloads
    pub fn file_timeout(mut self, timeout: Duration) -> Self {
        self.policy.file_timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Route every request through a proxy
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(url);
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport; TLS, proxy and user agent settings are then ignored
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Response<HttpClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder()
                    .danger_accept_invalid_certs(self.accept_invalid_certs);

                if let Some(proxy_url) = self.proxy {
                    let proxy = reqwest::Proxy::all(proxy_url.as_str())
                        .map_err(|e| HttpError::Build(format!("Invalid proxy: {}", e)))?;
                    builder = builder.proxy(proxy);
                }

                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }

                let client = builder.build().map_err(HttpError::from)?;
                Arc::new(ReqwestTransport::from_reqwest(client))
            }
        };

        Ok(HttpClient {
            base_url: self.base_url,
            transport,
            policy: self.policy,
        })
    }
}

/// Canonical reason phrase for a status code
fn status_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown error")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::parameters::{create_headers, AUTHORIZATION};

    const BASE: &str = "http://blog.test/api";

    /// Transport answering from a script and recording what it was sent
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Response<RawResponse>>>,
        sent: Mutex<Vec<HttpRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Response<RawResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }

        fn delayed(delay: Duration, replies: Vec<Response<RawResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                delay: Some(delay),
                ..Default::default()
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Response<RawResponse> {
            self.sent.lock().expect("lock").push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::Other("script exhausted".to_string())))
        }
    }

    fn ok_json(body: &str) -> Response<RawResponse> {
        Ok(RawResponse::json_body(200, body))
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transport_failure() {
        let transport = ScriptedTransport::new(vec![
            Err(HttpError::Connection("reset".to_string())),
            ok_json(r#"[{"tagName":"rust"}]"#),
        ]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let params = RequestParameters::new("Tag").with_action("GetTags");
        let tags: serde_json::Value = client.get(&params, None).await.expect("retry succeeds");

        assert_eq!(tags[0]["tagName"], "rust");
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_error() {
        let transport = ScriptedTransport::new(vec![
            Ok(RawResponse::new(502, None, b"Bad Gateway".to_vec())),
            ok_json(r#"{"succeeded":true}"#),
        ]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let result: serde_json::Value = client
            .post(&RequestParameters::new("Post").with_action("Upload"), &())
            .await
            .expect("retry succeeds");

        assert_eq!(result["succeeded"], true);
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_two_failures_yield_one_normalized_error() {
        let transport = ScriptedTransport::new(vec![
            Err(HttpError::Connection("refused".to_string())),
            Ok(RawResponse::new(500, None, b"Internal Server Error".to_vec())),
            ok_json("{}"),
        ]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let result: Response<serde_json::Value> =
            client.get(&RequestParameters::new("Post"), Some("1")).await;

        assert_eq!(
            result,
            Err(HttpError::Status {
                status: 500,
                message: "Internal Server Error".to_string()
            })
        );
        assert_eq!(transport.sent().len(), 2, "exactly one retry");
    }

    #[tokio::test]
    async fn test_empty_error_body_falls_back_to_reason() {
        let transport = ScriptedTransport::new(vec![
            Ok(RawResponse::new(404, None, Vec::new())),
            Ok(RawResponse::new(404, None, b"  \n".to_vec())),
        ]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let err = client
            .get::<serde_json::Value>(&RequestParameters::new("Post"), Some("404"))
            .await
            .expect_err("not found");

        assert_eq!(
            err,
            HttpError::Status {
                status: 404,
                message: "Not Found".to_string()
            }
        );
        assert_eq!(err.to_string(), "Error Code: 404\nMessage: Not Found");
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(503), "Service Unavailable");
        assert_eq!(status_reason(599), "Unknown error");
        assert_eq!(status_reason(1000), "Unknown error");
    }

    #[tokio::test]
    async fn test_zero_retries_sends_once() {
        let transport = ScriptedTransport::new(vec![
            Err(HttpError::Connection("refused".to_string())),
            ok_json("{}"),
        ]);
        let client = HttpClient::builder(BASE)
            .retries(0)
            .transport(transport.clone())
            .build()
            .expect("valid client");

        let result: Response<serde_json::Value> =
            client.get(&RequestParameters::new("Post"), None).await;

        assert!(matches!(result, Err(HttpError::Connection(_))));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_json_call_times_out() {
        let transport = ScriptedTransport::delayed(Duration::from_secs(31), vec![ok_json("{}")]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let result: Response<serde_json::Value> =
            client.get(&RequestParameters::new("Post"), None).await;

        assert_eq!(result, Err(HttpError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_covers_the_retry() {
        let transport = ScriptedTransport::delayed(
            Duration::from_secs(20),
            vec![
                Err(HttpError::Connection("reset".to_string())),
                ok_json("{}"),
            ],
        );
        let client = HttpClient::with_transport(BASE, transport.clone());

        let result: Response<serde_json::Value> =
            client.get(&RequestParameters::new("Post"), None).await;

        assert_eq!(result, Err(HttpError::Timeout));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_uses_file_deadline() {
        let transport = ScriptedTransport::delayed(
            Duration::from_secs(45),
            vec![ok_json(r#"{"pathOrContainer":"images/a.png"}"#)],
        );
        let client = HttpClient::with_transport(BASE, transport.clone());

        let params = RequestParameters::new("Post")
            .with_action("UploadImage")
            .with_headers(create_headers(Some("application/json"), Some("Bearer t")));
        let file = FilePart::new(b"png".to_vec()).with_file_name("a.png");
        let response: serde_json::Value = client
            .upload_file(
                &params,
                file,
                "File",
                vec![("IsFeaturedImage".to_string(), "true".to_string())],
            )
            .await
            .expect("upload within 60s");

        assert_eq!(response["pathOrContainer"], "images/a.png");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://blog.test/api/Post/UploadImage");
        assert_eq!(sent[0].headers.get(CONTENT_TYPE), None);
        assert_eq!(sent[0].headers.get(AUTHORIZATION), Some("Bearer t"));
        match &sent[0].body {
            RequestBody::Multipart(form) => {
                assert_eq!(form.file_field, "File");
                assert_eq!(form.file.file_name.as_deref(), Some("a.png"));
                assert_eq!(form.fields.len(), 1);
            }
            other => panic!("Expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_uses_file_deadline_and_returns_bytes() {
        let bytes = vec![0u8, 159, 146, 150];
        let transport = ScriptedTransport::delayed(
            Duration::from_secs(45),
            vec![Ok(RawResponse::new(
                200,
                Some("application/octet-stream".to_string()),
                bytes.clone(),
            ))],
        );
        let client = HttpClient::with_transport(BASE, transport.clone());

        let params = RequestParameters::new("users")
            .with_action("documents")
            .with_query_pair("userId", "u1");
        let downloaded = client
            .download_file(&params, Some("doc-9"))
            .await
            .expect("download within 60s");

        assert_eq!(downloaded, bytes);
        assert_eq!(
            transport.sent()[0].url,
            "http://blog.test/api/users/documents/doc-9?userId=u1"
        );
    }

    #[tokio::test]
    async fn test_json_body_sets_content_type() {
        let transport = ScriptedTransport::new(vec![ok_json(r#"{"id":3}"#)]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let _: serde_json::Value = client
            .put(
                &RequestParameters::new("Post").with_action("Update"),
                &serde_json::json!({"id": 3, "title": "t"}),
            )
            .await
            .expect("put succeeds");

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].headers.get(CONTENT_TYPE), Some(APPLICATION_JSON));
        assert_eq!(
            sent[0].body,
            RequestBody::Json(br#"{"id":3,"title":"t"}"#.to_vec())
        );
    }

    #[tokio::test]
    async fn test_delete_appends_id_and_accepts_empty_body() {
        let transport = ScriptedTransport::new(vec![Ok(RawResponse::new(204, None, Vec::new()))]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let _: () = client
            .delete(&RequestParameters::new("Post"), "42")
            .await
            .expect("delete succeeds");

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[0].url, "http://blog.test/api/Post/42");
    }

    #[tokio::test]
    async fn test_decode_failure_is_not_retried() {
        let transport = ScriptedTransport::new(vec![ok_json("not json"), ok_json("{}")]);
        let client = HttpClient::with_transport(BASE, transport.clone());

        let result: Response<serde_json::Value> =
            client.get(&RequestParameters::new("Post"), None).await;

        assert!(matches!(result, Err(HttpError::Serialization(_))));
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn test_builder_defaults() {
        let client = HttpClient::builder(BASE).build().expect("valid client");
        assert_eq!(client.base_url(), BASE);
        assert_eq!(client.policy(), CallPolicy::default());
        assert_eq!(client.policy().json_timeout, Duration::from_secs(30));
        assert_eq!(client.policy().file_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_chained_config() {
        let proxy_url = url::Url::parse("http://localhost:8080").expect("Valid proxy URL");
        let result = HttpClient::builder(BASE)
            .danger_accept_invalid_certs(true)
            .proxy(proxy_url)
            .user_agent("ark-blog/test")
            .json_timeout(Duration::from_secs(5))
            .build();
        let client = result.expect("valid client");
        assert_eq!(client.policy().json_timeout, Duration::from_secs(5));
    }
}
