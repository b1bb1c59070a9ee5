//! Tool input schemas

use dv360_client::ListParams;
use dv360_tools::{IdFilters, ListInput, ReportRequest};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Deserialize, JsonSchema)]
pub struct RunReportInput {
    /// Start date in YYYY-MM-DD format (e.g. 2025-01-01)
    pub start_date: String,
    /// End date in YYYY-MM-DD format (e.g. 2025-01-31)
    pub end_date: String,
    /// Dimensions to group by (list or comma-separated string), e.g. FILTER_DATE
    pub dimensions: ListInput,
    /// Metrics to retrieve (list or comma-separated string), e.g. METRIC_IMPRESSIONS
    pub metrics: ListInput,
    /// Advertiser ID(s) to filter by
    pub advertiser_ids: Option<ListInput>,
    /// Campaign ID(s) to filter by
    pub campaign_ids: Option<ListInput>,
    /// Insertion order ID(s) to filter by
    pub insertion_order_ids: Option<ListInput>,
    /// Line item ID(s) to filter by
    pub line_item_ids: Option<ListInput>,
    /// Name for the report (default: MCP Report)
    pub report_name: Option<String>,
}

impl From<RunReportInput> for ReportRequest {
    fn from(input: RunReportInput) -> Self {
        let filters = IdFilters {
            advertiser_ids: input.advertiser_ids,
            campaign_ids: input.campaign_ids,
            insertion_order_ids: input.insertion_order_ids,
            line_item_ids: input.line_item_ids,
        };
        let request = ReportRequest::new(
            input.start_date,
            input.end_date,
            input.dimensions,
            input.metrics,
        )
        .with_filters(filters);
        match input.report_name {
            Some(name) => request.with_report_name(name),
            None => request,
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct ListAdvertisersInput {
    /// Partner ID (default: DV360_PARTNER_ID)
    pub partner_id: Option<String>,
    /// Advertisers per page (default: 100, max: 100)
    pub page_size: Option<u32>,
    /// Sort field, e.g. displayName or "displayName desc"
    pub order_by: Option<String>,
    /// next_page_token from a previous call
    pub page_token: Option<String>,
}

impl ListAdvertisersInput {
    pub fn params(&self) -> ListParams {
        page_params(self.page_size)
            .with_order_by(self.order_by.clone())
            .with_page_token(self.page_token.clone())
    }
}

/// Shared input of the campaign, insertion order, line item and creative
/// list tools
#[derive(Deserialize, JsonSchema)]
pub struct ListChildrenInput {
    /// Advertiser ID whose entities to list
    pub advertiser_id: String,
    /// Results per page (default: 100, max: 100)
    pub page_size: Option<u32>,
    /// Filter expression, e.g. entityStatus="ENTITY_STATUS_ACTIVE"
    pub filter: Option<String>,
    /// Sort field, e.g. displayName or "updateTime desc"
    pub order_by: Option<String>,
    /// next_page_token from a previous call
    pub page_token: Option<String>,
}

impl ListChildrenInput {
    pub fn params(&self) -> ListParams {
        page_params(self.page_size)
            .with_filter(self.filter.clone())
            .with_order_by(self.order_by.clone())
            .with_page_token(self.page_token.clone())
    }
}

fn page_params(page_size: Option<u32>) -> ListParams {
    ListParams::new(page_size.unwrap_or(ListParams::MAX_PAGE_SIZE))
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCampaignInput {
    /// Advertiser ID that owns the campaign
    pub advertiser_id: String,
    /// Campaign ID to retrieve
    pub campaign_id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetInsertionOrderInput {
    /// Advertiser ID that owns the insertion order
    pub advertiser_id: String,
    /// Insertion order ID to retrieve
    pub insertion_order_id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetLineItemInput {
    /// Advertiser ID that owns the line item
    pub advertiser_id: String,
    /// Line item ID to retrieve
    pub line_item_id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCreativeInput {
    /// Advertiser ID that owns the creative
    pub advertiser_id: String,
    /// Creative ID to retrieve
    pub creative_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_report_input_accepts_both_shapes() {
        let input: RunReportInput = serde_json::from_value(json!({
            "start_date": "2025-01-01",
            "end_date": "2025-01-31",
            "dimensions": ["FILTER_DATE"],
            "metrics": "METRIC_IMPRESSIONS, METRIC_CLICKS",
            "campaign_ids": "1,2"
        }))
        .unwrap();

        let request = ReportRequest::from(input);
        assert_eq!(request.report_name, None);
        assert_eq!(request.filters.campaign_ids, Some(ListInput::from("1,2")));
        assert_eq!(request.filters.advertiser_ids, None);
        assert_eq!(
            request.metrics.into_items(),
            vec!["METRIC_IMPRESSIONS", "METRIC_CLICKS"]
        );
    }

    #[test]
    fn test_list_children_params() {
        let input: ListChildrenInput = serde_json::from_value(json!({
            "advertiser_id": "7",
            "page_size": 500,
            "filter": "",
            "order_by": "displayName"
        }))
        .unwrap();

        let params = input.params();
        assert_eq!(params.page_size, 100);
        assert_eq!(params.filter, None);
        assert_eq!(params.order_by.as_deref(), Some("displayName"));
    }

    #[test]
    fn test_list_advertisers_defaults() {
        let input: ListAdvertisersInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.partner_id.is_none());
        assert_eq!(input.params(), ListParams::default());
    }

    #[test]
    fn test_id_fields_are_described_in_schema() {
        let schema = serde_json::to_value(schemars::schema_for!(GetLineItemInput)).unwrap();
        let properties = &schema["properties"];
        assert_eq!(
            properties["advertiser_id"]["description"],
            json!("Advertiser ID that owns the line item")
        );
        assert_eq!(
            properties["line_item_id"]["description"],
            json!("Line item ID to retrieve")
        );

        let schema = serde_json::to_value(schemars::schema_for!(ListChildrenInput)).unwrap();
        assert!(schema["properties"]["advertiser_id"]["description"].is_string());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result = serde_json::from_value::<GetCampaignInput>(json!({"advertiser_id": "1"}));
        assert!(result.is_err());
    }
}
