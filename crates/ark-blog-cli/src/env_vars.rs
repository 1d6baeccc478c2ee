//! Environment variable overrides

use std::env;

use crate::config::{Api, Http, Settings};

/// API base URL
pub const ENV_API_URL: &str = "ARK_BLOG_API_URL";
/// Asset base URL
pub const ENV_ASSET_URL: &str = "ARK_BLOG_ASSET_URL";
/// Extra attempts after a failed call
pub const ENV_RETRIES: &str = "ARK_BLOG_RETRIES";
/// JSON deadline in seconds
pub const ENV_JSON_TIMEOUT: &str = "ARK_BLOG_JSON_TIMEOUT";
/// File deadline in seconds
pub const ENV_FILE_TIMEOUT: &str = "ARK_BLOG_FILE_TIMEOUT";
/// Proxy URL
pub const ENV_PROXY: &str = "ARK_BLOG_PROXY";
/// Skip TLS certificate checks
pub const ENV_ACCEPT_INVALID_CERTS: &str = "ARK_BLOG_ACCEPT_INVALID_CERTS";

impl Settings {
    /// Apply `ARK_BLOG_*` overrides
    pub fn from_env(mut self) -> Self {
        self.api = self.api.from_env();
        self.http = self.http.from_env();
        self
    }
}

impl Api {
    /// Apply API overrides
    pub fn from_env(mut self) -> Self {
        if let Ok(url) = env::var(ENV_API_URL) {
            self.base_url = url;
        }

        if let Ok(url) = env::var(ENV_ASSET_URL) {
            self.asset_base_url = url;
        }

        self
    }
}

impl Http {
    /// Apply transport overrides, unparsable values are ignored
    pub fn from_env(mut self) -> Self {
        if let Ok(retries_str) = env::var(ENV_RETRIES) {
            match retries_str.parse() {
                Ok(retries) => self.retries = retries,
                Err(_) => tracing::warn!(
                    "Invalid {} '{}', keeping {}",
                    ENV_RETRIES,
                    retries_str,
                    self.retries
                ),
            }
        }

        if let Ok(timeout_str) = env::var(ENV_JSON_TIMEOUT) {
            if let Ok(secs) = timeout_str.parse() {
                self.json_timeout_secs = secs;
            }
        }

        if let Ok(timeout_str) = env::var(ENV_FILE_TIMEOUT) {
            if let Ok(secs) = timeout_str.parse() {
                self.file_timeout_secs = secs;
            }
        }

        if let Ok(proxy) = env::var(ENV_PROXY) {
            self.proxy = Some(proxy).filter(|proxy| !proxy.is_empty());
        }

        if let Ok(accept_str) = env::var(ENV_ACCEPT_INVALID_CERTS) {
            if let Ok(accept) = accept_str.parse() {
                self.accept_invalid_certs = accept;
            }
        }

        self
    }
}
