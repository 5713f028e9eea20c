//! Vocabulary endpoint: catalogued properties offered for import.
//!
//! `GET {base}/catalog/api/v1/vocabulary/properties?classification={name}`
//! returns a JSON array of [`VocabularyProperty`]. The client implements
//! [`VocabularySource`], so an editor can import straight from the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use credef_schema::{Constraints, VocabularyCandidate, VocabularySource};

use crate::config::ConfigError;
use crate::error::CatalogApiError;

/// A vocabulary property as the catalog returns it.
///
/// Unknown fields are ignored so the catalog can grow its schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyProperty {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Catalogue value type, e.g. `currency`, `date`, `array-of-string`.
    pub value_type: String,
    #[serde(default)]
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VocabularyProperty> for VocabularyCandidate {
    fn from(p: VocabularyProperty) -> Self {
        VocabularyCandidate {
            id: p.id,
            name: p.name,
            display_name: p.display_name,
            description: p.description,
            value_type: p.value_type,
            constraints: p.constraints,
        }
    }
}

/// Client for the catalog vocabulary endpoints.
#[derive(Debug, Clone)]
pub struct VocabularyClient {
    http: reqwest::Client,
    properties_url: url::Url,
}

impl VocabularyClient {
    pub(crate) fn new(http: reqwest::Client, base_url: &url::Url) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            properties_url: crate::api_url(base_url, "vocabulary/properties")?,
        })
    }

    /// List the properties catalogued under a classification.
    ///
    /// Calls `GET {base_url}/catalog/api/v1/vocabulary/properties`.
    pub async fn list_properties(
        &self,
        classification: &str,
    ) -> Result<Vec<VocabularyProperty>, CatalogApiError> {
        let endpoint = "GET /vocabulary/properties";

        let resp = crate::retry::retry_send(endpoint, || {
            self.http
                .get(self.properties_url.clone())
                .query(&[("classification", classification)])
                .send()
        })
        .await
        .map_err(|e| CatalogApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogApiError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let properties: Vec<VocabularyProperty> =
            resp.json().await.map_err(|e| CatalogApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        tracing::debug!(classification, count = properties.len(), "vocabulary listed");
        Ok(properties)
    }
}

impl VocabularySource for VocabularyClient {
    type Error = CatalogApiError;

    async fn fetch_candidates(
        &self,
        classification: &str,
    ) -> Result<Vec<VocabularyCandidate>, Self::Error> {
        let properties = self.list_properties(classification).await?;
        Ok(properties.into_iter().map(VocabularyCandidate::from).collect())
    }
}
