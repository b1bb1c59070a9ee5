//! Wire models for the Bid Manager and Display & Video 360 APIs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{ClientError, Result};

pub const RANGE_CUSTOM_DATES: &str = "CUSTOM_DATES";
pub const FORMAT_CSV: &str = "CSV";
pub const REPORT_TYPE_STANDARD: &str = "STANDARD";
pub const FREQUENCY_ONE_TIME: &str = "ONE_TIME";
pub const STATE_FAILED: &str = "FAILED";

/// Report filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    #[serde(rename = "FILTER_ADVERTISER")]
    Advertiser,
    /// Campaigns are "media plans" in the reporting vocabulary
    #[serde(rename = "FILTER_MEDIA_PLAN")]
    Campaign,
    #[serde(rename = "FILTER_INSERTION_ORDER")]
    InsertionOrder,
    #[serde(rename = "FILTER_LINE_ITEM")]
    LineItem,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Advertiser => "FILTER_ADVERTISER",
            FilterType::Campaign => "FILTER_MEDIA_PLAN",
            FilterType::InsertionOrder => "FILTER_INSERTION_ORDER",
            FilterType::LineItem => "FILTER_LINE_ITEM",
        }
    }
}

/// One `{type, value}` report filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPair {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub value: String,
}

impl FilterPair {
    pub fn new(filter_type: FilterType, value: impl Into<String>) -> Self {
        Self {
            filter_type,
            value: value.into(),
        }
    }
}

/// Calendar date split into its textual parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: String,
    pub month: String,
    pub day: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRange {
    pub range: String,
    pub custom_start_date: DateParts,
    pub custom_end_date: DateParts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub title: String,
    pub data_range: DataRange,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(rename = "type")]
    pub report_type: String,
    pub group_bys: Vec<String>,
    pub filters: Vec<FilterPair>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySchedule {
    pub frequency: String,
}

/// Query creation body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub metadata: QueryMetadata,
    pub params: QueryParams,
    pub schedule: QuerySchedule,
}

impl Query {
    /// One-time standard report over a custom date range, delivered as CSV
    pub fn one_time_csv(
        title: impl Into<String>,
        start: DateParts,
        end: DateParts,
        group_bys: Vec<String>,
        filters: Vec<FilterPair>,
        metrics: Vec<String>,
    ) -> Self {
        Self {
            metadata: QueryMetadata {
                title: title.into(),
                data_range: DataRange {
                    range: RANGE_CUSTOM_DATES.to_string(),
                    custom_start_date: start,
                    custom_end_date: end,
                },
                format: FORMAT_CSV.to_string(),
            },
            params: QueryParams {
                report_type: REPORT_TYPE_STANDARD.to_string(),
                group_bys,
                filters,
                metrics,
            },
            schedule: QuerySchedule {
                frequency: FREQUENCY_ONE_TIME.to_string(),
            },
        }
    }
}

/// Query creation response (only the id matters here)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuery {
    #[serde(deserialize_with = "id_string")]
    pub query_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportKey {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub query_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub report_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub google_cloud_storage_path: Option<String>,
}

/// Result of running a query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub key: Option<ReportKey>,
    #[serde(default)]
    pub metadata: Option<ReportMetadata>,
}

impl Report {
    pub fn state(&self) -> Result<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.status.as_ref())
            .and_then(|s| s.state.as_deref())
            .ok_or(ClientError::MissingField("metadata.status.state"))
    }

    pub fn is_failed(&self) -> Result<bool> {
        Ok(self.state()? == STATE_FAILED)
    }

    /// Failure text reported by the engine
    pub fn failure_message(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.status.as_ref())
            .and_then(|s| s.message.as_deref())
            .unwrap_or("Unknown error")
    }

    pub fn report_id(&self) -> Result<&str> {
        self.key
            .as_ref()
            .and_then(|k| k.report_id.as_deref())
            .ok_or(ClientError::MissingField("key.reportId"))
    }

    /// Download location of the finished file
    pub fn result_location(&self) -> Result<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.google_cloud_storage_path.as_deref())
            .ok_or(ClientError::MissingField("metadata.googleCloudStoragePath"))
    }
}

/// Advertiser-owned entity collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Campaign,
    InsertionOrder,
    LineItem,
    Creative,
}

impl EntityKind {
    /// REST collection segment, also the list response key
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "campaigns",
            EntityKind::InsertionOrder => "insertionOrders",
            EntityKind::LineItem => "lineItems",
            EntityKind::Creative => "creatives",
        }
    }

    /// Human-readable singular noun
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "campaign",
            EntityKind::InsertionOrder => "insertion order",
            EntityKind::LineItem => "line item",
            EntityKind::Creative => "creative",
        }
    }
}

/// Paging and filtering for list calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page_size: u32,
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub page_token: Option<String>,
}

impl ListParams {
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
            filter: None,
            order_by: None,
            page_token: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn with_order_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = order_by.filter(|o| !o.is_empty());
        self
    }

    pub fn with_page_token(mut self, page_token: Option<String>) -> Self {
        self.page_token = page_token.filter(|t| !t.is_empty());
        self
    }

    /// Query-string pairs in API naming
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("pageSize", self.page_size.to_string())];
        if let Some(filter) = &self.filter {
            query.push(("filter", filter.clone()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("orderBy", order_by.clone()));
        }
        if let Some(token) = &self.page_token {
            query.push(("pageToken", token.clone()));
        }
        query
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(Self::MAX_PAGE_SIZE)
    }
}

/// One page of raw entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPage {
    pub items: Vec<Value>,
    pub next_page_token: Option<String>,
}

impl EntityPage {
    /// Pull the named collection and the continuation token out of a list response
    pub fn from_response(response: &Value, collection: &str) -> Self {
        let items = response
            .get(collection)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let next_page_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Self {
            items,
            next_page_token,
        }
    }
}

// int64 ids arrive as JSON strings, but tolerate bare numbers too
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected an id, found {}",
            other
        ))),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected an id, found {}",
            other
        ))),
    }
}
