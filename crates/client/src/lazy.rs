//! Shared client built once on first use

use async_trait::async_trait;
use dv360_config::Config;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::info;

use crate::google::{Endpoints, GoogleApiClient};
use crate::models::{EntityKind, EntityPage, ListParams, Query, Report};
use crate::{ClientError, EntityApi, ReportFetcher, ReportingApi, Result};

/// Authenticated client handle, constructed at most once
///
/// Concurrent first calls race on the `OnceCell`; exactly one of them builds
/// the client and the others wait for it. A failed construction leaves the
/// cell empty, so a later call retries with the same configuration.
pub struct LazyClient {
    config: Config,
    endpoints: Endpoints,
    client: OnceCell<GoogleApiClient>,
}

impl LazyClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            endpoints: Endpoints::default(),
            client: OnceCell::new(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Build the client now, validating the credentials
    pub async fn initialize(&self) -> Result<&GoogleApiClient> {
        self.client
            .get_or_try_init(|| async {
                info!("◆ AUTHENTICATING WITH SERVICE ACCOUNT CREDENTIALS");
                let client = GoogleApiClient::from_config(&self.config)?
                    .with_endpoints(self.endpoints.clone());
                info!("◆ DV360 API CLIENT INITIALIZED");
                Ok::<_, ClientError>(client)
            })
            .await
    }
}

#[async_trait]
impl ReportingApi for LazyClient {
    async fn create_query(&self, query: &Query) -> Result<String> {
        self.initialize().await?.create_query(query).await
    }

    async fn run_query(&self, query_id: &str, synchronous: bool) -> Result<Report> {
        self.initialize().await?.run_query(query_id, synchronous).await
    }
}

#[async_trait]
impl ReportFetcher for LazyClient {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        self.initialize().await?.fetch_text(location).await
    }
}

#[async_trait]
impl EntityApi for LazyClient {
    async fn list_advertisers(
        &self,
        partner_id: &str,
        params: &ListParams,
    ) -> Result<EntityPage> {
        self.initialize()
            .await?
            .list_advertisers(partner_id, params)
            .await
    }

    async fn list_children(
        &self,
        advertiser_id: &str,
        kind: EntityKind,
        params: &ListParams,
    ) -> Result<EntityPage> {
        self.initialize()
            .await?
            .list_children(advertiser_id, kind, params)
            .await
    }

    async fn get_child(&self, advertiser_id: &str, kind: EntityKind, id: &str) -> Result<Value> {
        self.initialize()
            .await?
            .get_child(advertiser_id, kind, id)
            .await
    }
}
