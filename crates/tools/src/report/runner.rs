//! Report orchestration: prepare, submit, run, decode

use std::sync::Arc;

use dv360_client::{ClientError, FilterPair, Query, ReportFetcher, ReportingApi};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::dates::{format_date, DateFormatError};
use super::decode::{fetch_report, DecodeError, ReportRow};
use super::fields::normalize_fields;
use super::filters::IdFilters;
use crate::input::ListInput;

pub const DEFAULT_REPORT_NAME: &str = "MCP Report";

/// Everything a caller supplies for one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: ListInput,
    pub metrics: ListInput,
    pub filters: IdFilters,
    pub report_name: Option<String>,
}

impl ReportRequest {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        dimensions: impl Into<ListInput>,
        metrics: impl Into<ListInput>,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            dimensions: dimensions.into(),
            metrics: metrics.into(),
            filters: IdFilters::default(),
            report_name: None,
        }
    }

    pub fn with_filters(mut self, filters: IdFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = Some(name.into());
        self
    }
}

/// Faults that end a run before a result is assembled
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Date(#[from] DateFormatError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// Context echoed back with a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetadata {
    pub query_id: String,
    pub report_id: String,
    pub date_range: DateRange,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub filters: Vec<FilterPair>,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSuccess {
    pub success: bool,
    pub data: Vec<ReportRow>,
    pub metadata: RunMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFailure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

impl ReportFailure {
    fn new(error: impl Into<String>, query_id: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            query_id,
        }
    }
}

/// Terminal result of a run; never an error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Success(ReportSuccess),
    Failure(ReportFailure),
}

impl ReportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReportOutcome::Success(_))
    }
}

/// Runs reports against the reporting API, one query submission per call
#[derive(Clone)]
pub struct ReportRunner {
    reporting: Arc<dyn ReportingApi>,
    fetcher: Arc<dyn ReportFetcher>,
}

impl ReportRunner {
    pub fn new(reporting: Arc<dyn ReportingApi>, fetcher: Arc<dyn ReportFetcher>) -> Self {
        Self { reporting, fetcher }
    }

    /// Run a report to completion. Every fault becomes a failure outcome.
    pub async fn run(&self, request: ReportRequest) -> ReportOutcome {
        match self.execute(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error running report: {}", e);
                ReportOutcome::Failure(ReportFailure::new(e.to_string(), None))
            }
        }
    }

    async fn execute(&self, request: ReportRequest) -> Result<ReportOutcome, ReportError> {
        let start = format_date(&request.start_date)?;
        let end = format_date(&request.end_date)?;
        let (dimensions, metrics) = normalize_fields(request.dimensions, request.metrics);
        let filters = request.filters.build();

        if filters.is_empty() {
            warn!("No filters specified. Report will include all data (may be very large).");
        }

        let title = request
            .report_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());

        info!("Creating query: {}", title);
        let query = Query::one_time_csv(
            title,
            start,
            end,
            dimensions.clone(),
            filters.clone(),
            metrics.clone(),
        );
        let query_id = self.reporting.create_query(&query).await?;

        info!("Query {} created. Running synchronously...", query_id);
        let report = self.reporting.run_query(&query_id, true).await?;

        if report.is_failed()? {
            let message = report.failure_message();
            error!("Report for query {} failed: {}", query_id, message);
            return Ok(ReportOutcome::Failure(ReportFailure::new(
                format!("Report generation failed: {}", message),
                Some(query_id),
            )));
        }

        let report_id = report.report_id()?.to_string();
        info!("Report {} generated successfully", report_id);

        let decoded = fetch_report(self.fetcher.as_ref(), report.result_location()?).await?;
        info!("Report {} decoded: {} rows", report_id, decoded.row_count);

        Ok(ReportOutcome::Success(ReportSuccess {
            success: true,
            metadata: RunMetadata {
                query_id,
                report_id,
                date_range: DateRange {
                    start_date: request.start_date,
                    end_date: request.end_date,
                },
                dimensions,
                metrics,
                filters,
                row_count: decoded.row_count,
            },
            data: decoded.rows,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder_defaults() {
        let request = ReportRequest::new("2025-01-01", "2025-01-31", "FILTER_DATE", "METRIC_CLICKS");
        assert_eq!(request.filters, IdFilters::default());
        assert!(request.report_name.is_none());

        let named = request.with_report_name("Weekly");
        assert_eq!(named.report_name.as_deref(), Some("Weekly"));
    }

    #[test]
    fn test_failure_serialization() {
        let outcome = ReportOutcome::Failure(ReportFailure::new("boom", None));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "error": "boom"})
        );

        let outcome = ReportOutcome::Failure(ReportFailure::new("boom", Some("9".to_string())));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "error": "boom", "query_id": "9"})
        );
    }

    #[test]
    fn test_report_error_is_transparent() {
        let err: ReportError = format_date("bad").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid date 'bad'"));

        let err: ReportError = ClientError::MissingField("key.reportId").into();
        assert_eq!(err.to_string(), "response is missing 'key.reportId'");
    }
}
