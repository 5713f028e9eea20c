//! Catalog API client configuration.
//!
//! One base URL serves both the vocabulary and the entity endpoints.
//! Defaults point to production. Override via environment variables or
//! explicit construction for staging and tests.

use url::Url;
use zeroize::Zeroizing;

/// Default catalog base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://catalog.credef.dev";

/// Configuration for connecting to the catalog.
///
/// The `Debug` implementation redacts `api_token`.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL of the catalog service.
    pub base_url: Url,
    /// Bearer token, zeroed on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CatalogApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CREDEF_CATALOG_URL` (default: `https://catalog.credef.dev`)
    /// - `CREDEF_CATALOG_TOKEN` (required)
    /// - `CREDEF_CATALOG_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token =
            std::env::var("CREDEF_CATALOG_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        Ok(Self {
            base_url: env_url("CREDEF_CATALOG_URL", DEFAULT_CATALOG_URL)?,
            api_token: Zeroizing::new(api_token),
            timeout_secs: std::env::var("CREDEF_CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Point at a local mock server (for testing).
    pub fn local_mock(port: u16, token: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CREDEF_CATALOG_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
}
