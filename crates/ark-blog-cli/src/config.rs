//! Settings for the terminal client
//!
//! Defaults are layered under an optional TOML file, then `ARK_BLOG_*`
//! environment variables are applied by [`Settings::from_env`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

/// Name of the settings file looked up in the work dir
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Backend location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    /// Base URL every route is joined onto
    pub base_url: String,
    /// Base URL image paths are resolved against
    pub asset_base_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5055".to_string(),
            asset_base_url: "http://localhost:5055/".to_string(),
        }
    }
}

/// Transport tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Http {
    /// Extra attempts after a failed call
    pub retries: u32,
    /// Deadline for JSON calls, in seconds
    pub json_timeout_secs: u64,
    /// Deadline for uploads and downloads, in seconds
    pub file_timeout_secs: u64,
    /// Proxy every request goes through
    pub proxy: Option<String>,
    /// Skip TLS certificate checks
    pub accept_invalid_certs: bool,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            retries: 1,
            json_timeout_secs: ark_http_client::JSON_TIMEOUT.as_secs(),
            file_timeout_secs: ark_http_client::FILE_TIMEOUT.as_secs(),
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

impl Http {
    /// JSON deadline as a [`Duration`]
    pub fn json_timeout(&self) -> Duration {
        Duration::from_secs(self.json_timeout_secs)
    }

    /// File deadline as a [`Duration`]
    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }
}

/// Client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend location
    #[serde(default)]
    pub api: Api,
    /// Transport tuning
    #[serde(default)]
    pub http: Http,
}

impl Settings {
    /// Load settings
    ///
    /// An explicit `config_file` must exist. Without one, `config.toml` in
    /// `work_dir` is read when present and defaults are used otherwise.
    pub fn new<P>(work_dir: &Path, config_file: Option<P>) -> Result<Self, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let default_settings = Self::default();

        let file = match config_file {
            Some(path) => File::from(path.into()).required(true),
            None => File::from(work_dir.join(CONFIG_FILE_NAME)).required(false),
        };

        let config = Config::builder()
            // use defaults
            .add_source(Config::try_from(&default_settings)?)
            // override with file contents
            .add_source(file)
            .build()?;

        config.try_deserialize()
    }
}
