//! Display & Video 360 API access
//!
//! Reporting (Bid Manager v2) and entity management (Display & Video 360 v4)
//! behind small async traits, so tool code can be driven by the real Google
//! client or by a test double.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod auth;
pub mod google;
pub mod lazy;
pub mod models;

pub use auth::{ServiceAccountTokens, StaticToken, TokenSource};
pub use google::{Endpoints, GoogleApiClient, BID_MANAGER_SCOPE, DISPLAY_VIDEO_SCOPE};
pub use lazy::LazyClient;
pub use models::{
    CreatedQuery, DataRange, DateParts, EntityKind, EntityPage, FilterPair, FilterType,
    ListParams, Query, QueryMetadata, QueryParams, QuerySchedule, Report, ReportKey,
    ReportMetadata, ReportStatus,
};

/// API client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    Config(#[from] dv360_config::ConfigError),
}

impl ClientError {
    /// HTTP status of a remote rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Bid Manager query lifecycle
#[async_trait]
pub trait ReportingApi: Send + Sync {
    /// Create a query and return its id
    async fn create_query(&self, query: &Query) -> Result<String>;

    /// Run a query; with `synchronous` the call returns once the report is
    /// in a terminal state
    async fn run_query(&self, query_id: &str, synchronous: bool) -> Result<Report>;
}

/// Retrieval of a finished report file
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Display & Video 360 entity reads
#[async_trait]
pub trait EntityApi: Send + Sync {
    async fn list_advertisers(&self, partner_id: &str, params: &ListParams)
        -> Result<EntityPage>;

    async fn list_children(
        &self,
        advertiser_id: &str,
        kind: EntityKind,
        params: &ListParams,
    ) -> Result<EntityPage>;

    async fn get_child(&self, advertiser_id: &str, kind: EntityKind, id: &str) -> Result<Value>;
}
