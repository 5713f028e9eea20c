//! # credef-catalog-client: Typed Rust client for the credential catalog
//!
//! Two collaborators of the schema editor live behind the catalog API:
//! - **Vocabulary**: catalogued properties offered for import, grouped by
//!   classification. [`VocabularyClient`] implements
//!   [`credef_schema::VocabularySource`].
//! - **Issuers**: active entities tagged as credential issuers.
//!
//! ## API Path Convention
//!
//! Every endpoint lives under `{base_url}/catalog/api/v1/{resource}`. A base
//! path is kept whether or not it ends in `/`. For
//! example `https://catalog.credef.dev/catalog/api/v1/entities`.

pub mod config;
pub mod error;
pub mod issuers;
pub(crate) mod retry;
pub mod vocabulary;

pub use config::{CatalogApiConfig, ConfigError};
pub use error::CatalogApiError;
pub use issuers::{EntityStatus, Issuer, IssuerClient};
pub use vocabulary::{VocabularyClient, VocabularyProperty};

use std::time::Duration;

use url::Url;

use credef_schema::{VocabularyCandidate, VocabularySource};

/// Context path and version prefix shared by every endpoint.
pub(crate) const API_PREFIX: &str = "catalog/api/v1";

/// Resolve `{base}/catalog/api/v1/{resource}`. The base is treated as a
/// directory whether or not its path ends in `/`.
pub(crate) fn api_url(base: &Url, resource: &str) -> Result<Url, ConfigError> {
    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.join(&format!("{API_PREFIX}/{resource}"))
        .map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))
}

/// Top-level catalog client. Holds one sub-client per resource.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    vocabulary: VocabularyClient,
    issuers: IssuerClient,
}

impl CatalogClient {
    /// Create a client from configuration.
    pub fn new(config: CatalogApiConfig) -> Result<Self, CatalogApiError> {
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.as_str()
        ))
        .map_err(|_| CatalogApiError::Config(ConfigError::InvalidToken))?;
        auth.set_sensitive(true);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            vocabulary: VocabularyClient::new(http.clone(), &config.base_url)?,
            issuers: IssuerClient::new(http, &config.base_url)?,
        })
    }

    /// Access the vocabulary client.
    pub fn vocabulary(&self) -> &VocabularyClient {
        &self.vocabulary
    }

    /// Access the issuer client.
    pub fn issuers(&self) -> &IssuerClient {
        &self.issuers
    }
}

impl VocabularySource for CatalogClient {
    type Error = CatalogApiError;

    async fn fetch_candidates(
        &self,
        classification: &str,
    ) -> Result<Vec<VocabularyCandidate>, Self::Error> {
        self.vocabulary.fetch_candidates(classification).await
    }
}
