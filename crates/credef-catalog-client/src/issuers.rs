//! Entity endpoint, restricted to active issuers.
//!
//! Issuers are looked up while editing schema metadata. They play no part
//! in compilation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;
use crate::error::CatalogApiError;

/// Entity status as the catalog reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    Active,
    Inactive,
    Suspended,
    /// Forward-compatible catch-all.
    #[serde(other)]
    Unknown,
}

/// An entity tagged as a credential issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub decentralized_identifier: Option<String>,
    #[serde(default)]
    pub status: Option<EntityStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Client for the catalog entity endpoints.
#[derive(Debug, Clone)]
pub struct IssuerClient {
    http: reqwest::Client,
    entities_url: url::Url,
}

impl IssuerClient {
    pub(crate) fn new(http: reqwest::Client, base_url: &url::Url) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            entities_url: crate::api_url(base_url, "entities")?,
        })
    }

    /// List active issuers.
    ///
    /// Calls `GET {base_url}/catalog/api/v1/entities?tag=issuer&status=ACTIVE`.
    /// Entries the catalog reports with any other status are dropped.
    pub async fn list_active(&self) -> Result<Vec<Issuer>, CatalogApiError> {
        let endpoint = "GET /entities";

        let resp = crate::retry::retry_send(endpoint, || {
            self.http
                .get(self.entities_url.clone())
                .query(&[("tag", "issuer"), ("status", "ACTIVE")])
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

        let issuers: Vec<Issuer> =
            resp.json().await.map_err(|e| CatalogApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        Ok(issuers
            .into_iter()
            .filter(|i| i.status.map_or(true, |s| s == EntityStatus::Active))
            .collect())
    }
}
