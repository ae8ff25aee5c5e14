//! HTTP record store client
//!
//! Thin reqwest client over the store's REST surface:
//!
//! - `GET  /entities?status=approved` — eligible site records
//! - `GET  /entities/{id}/ratings`    — posted star values for one site
//! - `POST /reviews`                  — create a review
//! - `PATCH /entities/{id}`           — rewrite the ledger field
//!
//! Non-success statuses map to `SowerError::StoreStatus` with the response
//! body attached, so run logs carry whatever the store said.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::types::{Result, SowerError};

use super::records::{EntityRecord, NewReview};
use super::RecordStore;

/// Configuration for the HTTP record store client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the record store API
    pub base_url: String,
    /// Bearer token, if the store requires one
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            api_key: None,
            timeout_ms: 30_000,
        }
    }
}

/// reqwest-backed implementation of [`RecordStore`]
pub struct HttpRecordStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl HttpRecordStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, client })
    }

    /// Create with default configuration against `base_url`.
    pub fn with_defaults(base_url: String) -> Result<Self> {
        Self::new(StoreConfig {
            base_url,
            ..Default::default()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SowerError::StoreStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreateReviewResponse {
    id: String,
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_eligible_entities(&self) -> Result<Vec<EntityRecord>> {
        let response = self
            .authorized(self.client.get(self.url("/entities")))
            .query(&[("status", "approved")])
            .send()
            .await?;

        let entities: Vec<EntityRecord> = self.check(response).await?.json().await?;
        debug!(count = entities.len(), "Listed eligible entities");
        Ok(entities)
    }

    async fn list_ratings_for_entity(&self, entity_id: &str) -> Result<Vec<u8>> {
        let response = self
            .authorized(
                self.client
                    .get(self.url(&format!("/entities/{}/ratings", entity_id))),
            )
            .send()
            .await?;

        Ok(self.check(response).await?.json().await?)
    }

    async fn create_review(&self, review: &NewReview) -> Result<String> {
        let response = self
            .authorized(self.client.post(self.url("/reviews")))
            .json(review)
            .send()
            .await?;

        let created: CreateReviewResponse = self.check(response).await?.json().await?;
        debug!(entity = %review.entity_id, review_id = %created.id, "Review created");
        Ok(created.id)
    }

    async fn update_ledger_field(&self, entity_id: &str, ledger: &str) -> Result<()> {
        let response = self
            .authorized(
                self.client
                    .patch(self.url(&format!("/entities/{}", entity_id))),
            )
            .json(&json!({ "ledger": ledger }))
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url, "http://localhost:8090");
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let store = HttpRecordStore::new(StoreConfig {
            base_url: "http://store.local/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(store.url("/entities"), "http://store.local/entities");
    }
}
