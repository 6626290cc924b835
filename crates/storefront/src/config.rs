//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FITSUPP_API_BASE_URL` - Base URL of the store backend API
//!   (e.g., `http://127.0.0.1:8000/api/`)
//!
//! ## Optional
//! - `FITSUPP_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `FITSUPP_DOWNLOAD_DIR` - Directory for saved invoices (default: `downloads`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Directory where fetched invoices are saved.
    pub download_dir: PathBuf,
}

/// Store backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for all backend endpoints. Always stored with a trailing
    /// slash so relative endpoint paths join underneath it.
    pub base_url: Url,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("FITSUPP_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FITSUPP_API_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout_secs = get_env_or_default("FITSUPP_HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FITSUPP_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let download_dir = PathBuf::from(get_env_or_default("FITSUPP_DOWNLOAD_DIR", "downloads"));

        Ok(Self {
            api: ApiConfig::new(base_url, Duration::from_secs(timeout_secs))?,
            download_dir,
        })
    }
}

impl ApiConfig {
    /// Create an API configuration, validating and normalizing the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not http(s) or
    /// cannot serve as a base.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "unsupported scheme {:?} in {base_url}",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: ensure_trailing_slash(base_url),
            timeout,
        })
    }
}

/// Normalize a URL so its path ends with `/`.
///
/// Required for `Url::join` to treat the final path segment as a directory:
/// `http://host/api` + `products/` would otherwise resolve to
/// `http://host/products/`.
pub(crate) fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
