//! Client interfaces to the guide API
//!
//! The viewer and the mapping editor talk to the backend only through
//! [`ScheduleClient`] and [`RuleClient`], so both can run against the HTTP
//! API, an in-process service, or a test fake.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::api::GuideService;
use crate::error::{ClientError, RuleError};
use crate::location::LocationKey;
use crate::models::{Game, MappingRule, NewRule, RuleId, RulePatch};

#[async_trait]
pub trait ScheduleClient: Send + Sync {
    async fn fetch_schedule(&self, location: Option<&LocationKey>) -> Result<Vec<Game>, ClientError>;
}

#[async_trait]
pub trait RuleClient: Send + Sync {
    async fn list_rules(&self) -> Result<Vec<MappingRule>, ClientError>;
    async fn create_rule(&self, rule: &NewRule) -> Result<MappingRule, ClientError>;
    async fn update_rule(&self, id: RuleId, patch: &RulePatch) -> Result<MappingRule, ClientError>;
    async fn delete_rule(&self, id: RuleId) -> Result<(), ClientError>;
}

// ============================================================================
// HTTP client
// ============================================================================

#[derive(Clone)]
pub struct HttpGuideClient {
    http: Client,
    base_url: String,
}

impl HttpGuideClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(resp: Response) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string()),
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        Ok(Self::check(resp).await?.json().await?)
    }
}

#[async_trait]
impl ScheduleClient for HttpGuideClient {
    async fn fetch_schedule(&self, location: Option<&LocationKey>) -> Result<Vec<Game>, ClientError> {
        let mut req = self.http.get(self.url("/api/games"));
        if let Some(key) = location.filter(|k| !k.is_default()) {
            req = req.query(&[("zip", key.as_str())]);
        }
        debug!(location = ?location, "fetching schedule");
        Self::json(req.send().await?).await
    }
}

#[async_trait]
impl RuleClient for HttpGuideClient {
    async fn list_rules(&self) -> Result<Vec<MappingRule>, ClientError> {
        Self::json(self.http.get(self.url("/api/admin/dma-map")).send().await?).await
    }

    async fn create_rule(&self, rule: &NewRule) -> Result<MappingRule, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/admin/dma-map"))
            .json(rule)
            .send()
            .await?;
        Self::json(resp).await
    }

    async fn update_rule(&self, id: RuleId, patch: &RulePatch) -> Result<MappingRule, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/api/admin/dma-map/{}", id)))
            .json(patch)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RuleError::UnknownId(id).into());
        }
        Self::json(resp).await
    }

    async fn delete_rule(&self, id: RuleId) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/admin/dma-map/{}", id)))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RuleError::UnknownId(id).into());
        }
        Self::check(resp).await?;
        Ok(())
    }
}

// ============================================================================
// In-process client
// ============================================================================

/// Calls a [`GuideService`] directly, without HTTP
#[derive(Clone)]
pub struct LocalGuideClient {
    service: Arc<GuideService>,
}

impl LocalGuideClient {
    pub fn new(service: Arc<GuideService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ScheduleClient for LocalGuideClient {
    async fn fetch_schedule(&self, location: Option<&LocationKey>) -> Result<Vec<Game>, ClientError> {
        Ok(self.service.games(location).await)
    }
}

#[async_trait]
impl RuleClient for LocalGuideClient {
    async fn list_rules(&self) -> Result<Vec<MappingRule>, ClientError> {
        Ok(self.service.list_rules().await)
    }

    async fn create_rule(&self, rule: &NewRule) -> Result<MappingRule, ClientError> {
        Ok(self.service.create_rule(rule.clone()).await?)
    }

    async fn update_rule(&self, id: RuleId, patch: &RulePatch) -> Result<MappingRule, ClientError> {
        Ok(self.service.update_rule(id, patch.clone()).await?)
    }

    async fn delete_rule(&self, id: RuleId) -> Result<(), ClientError> {
        self.service.delete_rule(id).await?;
        Ok(())
    }
}
