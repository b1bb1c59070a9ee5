//! Google REST implementation of the API traits

use std::sync::Arc;

use async_trait::async_trait;
use dv360_config::Config;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::auth::{ServiceAccountTokens, TokenSource};
use crate::models::{CreatedQuery, EntityKind, EntityPage, ListParams, Query, Report};
use crate::{ClientError, EntityApi, ReportFetcher, ReportingApi, Result};

pub const BID_MANAGER_SCOPE: &str = "https://www.googleapis.com/auth/doubleclickbidmanager";
pub const DISPLAY_VIDEO_SCOPE: &str = "https://www.googleapis.com/auth/display-video";

/// API base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub bid_manager: String,
    pub display_video: String,
}

impl Endpoints {
    /// Point both APIs at one host (mock servers, proxies)
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            bid_manager: format!("{}/v2", base),
            display_video: format!("{}/v4", base),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bid_manager: "https://doubleclickbidmanager.googleapis.com/v2".to_string(),
            display_video: "https://displayvideo.googleapis.com/v4".to_string(),
        }
    }
}

/// Authenticated client for Bid Manager and Display & Video 360
pub struct GoogleApiClient {
    http: Client,
    tokens: Arc<dyn TokenSource>,
    endpoints: Endpoints,
}

impl GoogleApiClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: Client::new(),
            tokens,
            endpoints: Endpoints::default(),
        }
    }

    /// Build from service-account credentials
    pub fn from_config(config: &Config) -> Result<Self> {
        let tokens = ServiceAccountTokens::from_config(config)?;
        Ok(Self::new(Arc::new(tokens)))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send_json(&self, request: RequestBuilder, scope: &str) -> Result<Value> {
        let token = self.tokens.access_token(&[scope]).await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn list(&self, url: String, params: &ListParams, collection: &str) -> Result<EntityPage> {
        let request = self.http.get(&url).query(&params.to_query());
        let response = self.send_json(request, DISPLAY_VIDEO_SCOPE).await?;
        let page = EntityPage::from_response(&response, collection);
        debug!("◆ {} {} FROM {}", page.items.len(), collection, url);
        Ok(page)
    }
}

/// Turn a non-2xx response into an error, preferring Google's error message
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("UNKNOWN ERROR")
                .to_string()
        });

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ReportingApi for GoogleApiClient {
    async fn create_query(&self, query: &Query) -> Result<String> {
        let url = format!("{}/queries", self.endpoints.bid_manager);
        trace!("◆ CREATING QUERY AT {}", url);

        let request = self.http.post(&url).json(query);
        let response = self.send_json(request, BID_MANAGER_SCOPE).await?;
        let created: CreatedQuery = serde_json::from_value(response)?;
        Ok(created.query_id)
    }

    async fn run_query(&self, query_id: &str, synchronous: bool) -> Result<Report> {
        let url = format!("{}/queries/{}:run", self.endpoints.bid_manager, query_id);
        trace!("◆ RUNNING QUERY {} (synchronous: {})", query_id, synchronous);

        let request = self
            .http
            .post(&url)
            .query(&[("synchronous", synchronous.to_string())])
            .json(&json!({}));
        let response = self.send_json(request, BID_MANAGER_SCOPE).await?;
        Ok(serde_json::from_value(response)?)
    }
}

#[async_trait]
impl ReportFetcher for GoogleApiClient {
    /// Result locations are pre-signed URLs, so no bearer token is sent
    async fn fetch_text(&self, location: &str) -> Result<String> {
        let response = self.http.get(location).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if !status.is_success() {
            return Err(api_error(status, &String::from_utf8_lossy(&body)));
        }
        Ok(String::from_utf8(body)?)
    }
}

#[async_trait]
impl EntityApi for GoogleApiClient {
    async fn list_advertisers(
        &self,
        partner_id: &str,
        params: &ListParams,
    ) -> Result<EntityPage> {
        let url = format!("{}/advertisers", self.endpoints.display_video);
        let mut query = vec![("partnerId", partner_id.to_string())];
        query.extend(params.to_query());

        let request = self.http.get(&url).query(&query);
        let response = self.send_json(request, DISPLAY_VIDEO_SCOPE).await?;
        Ok(EntityPage::from_response(&response, "advertisers"))
    }

    async fn list_children(
        &self,
        advertiser_id: &str,
        kind: EntityKind,
        params: &ListParams,
    ) -> Result<EntityPage> {
        let url = format!(
            "{}/advertisers/{}/{}",
            self.endpoints.display_video,
            advertiser_id,
            kind.collection()
        );
        self.list(url, params, kind.collection()).await
    }

    async fn get_child(&self, advertiser_id: &str, kind: EntityKind, id: &str) -> Result<Value> {
        let url = format!(
            "{}/advertisers/{}/{}/{}",
            self.endpoints.display_video,
            advertiser_id,
            kind.collection(),
            id
        );
        let request = self.http.get(&url);
        self.send_json(request, DISPLAY_VIDEO_SCOPE).await
    }
}
