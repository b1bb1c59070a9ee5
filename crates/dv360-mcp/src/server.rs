//! MCP tool server
//!
//! Each tool answers with a JSON text block. Failures reported by a tool
//! (`success: false`) are ordinary tool results, not protocol errors.

use std::sync::Arc;

use dv360_client::{EntityKind, LazyClient};
use dv360_tools::{EntityTools, ReportRunner, ToolResult};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use crate::types::*;

type McpError = rmcp::model::ErrorData;

#[derive(Clone)]
pub struct McpServer {
    reports: ReportRunner,
    entities: EntityTools,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(reports: ReportRunner, entities: EntityTools) -> Self {
        Self {
            reports,
            entities,
            tool_router: Self::tool_router(),
        }
    }

    /// Server backed by one shared lazily-built client
    pub fn from_client(client: Arc<LazyClient>) -> Self {
        let partner_id = client.config().partner_id.clone();
        Self::new(
            ReportRunner::new(client.clone(), client.clone()),
            EntityTools::new(client, partner_id),
        )
    }

    async fn list_children(&self, kind: EntityKind, input: ListChildrenInput) -> ToolResult {
        let params = input.params();
        self.entities
            .list_children(kind, &input.advertiser_id, params)
            .await
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "DV360 Reporting API".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"Display & Video 360 reporting and entity lookups.

WORKFLOW:
1. list_advertisers to find advertiser IDs (uses DV360_PARTNER_ID unless partner_id is given)
2. list_campaigns / list_insertion_orders / list_line_items / list_creatives for an advertiser
3. run_report for performance data over a date range, filtered by any of those IDs

COMMON DIMENSIONS (groupBys):
- FILTER_DATE, FILTER_WEEK, FILTER_MONTH
- FILTER_ADVERTISER, FILTER_ADVERTISER_NAME, FILTER_ADVERTISER_CURRENCY
- FILTER_MEDIA_PLAN (campaign), FILTER_MEDIA_PLAN_NAME
- FILTER_INSERTION_ORDER, FILTER_INSERTION_ORDER_NAME
- FILTER_LINE_ITEM, FILTER_LINE_ITEM_NAME
- FILTER_CREATIVE, FILTER_COUNTRY, FILTER_DEVICE_TYPE
- FILTER_FLOODLIGHT_ACTIVITY_ID, FILTER_FLOODLIGHT_ACTIVITY

COMMON METRICS:
- METRIC_IMPRESSIONS, METRIC_CLICKS, METRIC_CTR
- METRIC_MEDIA_COST_ADVERTISER, METRIC_REVENUE_ADVERTISER
- METRIC_TOTAL_CONVERSIONS, METRIC_POST_CLICK_CONVERSIONS, METRIC_POST_VIEW_CONVERSIONS

NOTES:
- Floodlight dimensions only work with conversion metrics, not impressions, clicks or costs.
- METRIC_REVENUE_ADVERTISER needs FILTER_ADVERTISER_CURRENCY as a dimension.
- Reports without ID filters cover the whole partner and can be very large.
- Full list: https://developers.google.com/bid-manager/reference/rest/v2/filters-metrics"#;

#[tool_router]
impl McpServer {
    #[tool(
        description = "Run a DV360 report over a date range and return its rows as JSON. Creates a one-time query, runs it synchronously and decodes the CSV result."
    )]
    async fn run_report(
        &self,
        Parameters(input): Parameters<RunReportInput>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.reports.run(input.into()).await;
        ok_json(&outcome)
    }

    #[tool(description = "List advertisers under a partner.")]
    async fn list_advertisers(
        &self,
        Parameters(input): Parameters<ListAdvertisersInput>,
    ) -> Result<CallToolResult, McpError> {
        let params = input.params();
        let result = self
            .entities
            .list_advertisers(input.partner_id, params)
            .await;
        tool_json(result)
    }

    #[tool(description = "List campaigns for an advertiser.")]
    async fn list_campaigns(
        &self,
        Parameters(input): Parameters<ListChildrenInput>,
    ) -> Result<CallToolResult, McpError> {
        tool_json(self.list_children(EntityKind::Campaign, input).await)
    }

    #[tool(description = "Get full details of one campaign.")]
    async fn get_campaign(
        &self,
        Parameters(input): Parameters<GetCampaignInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .entities
            .get_child(EntityKind::Campaign, &input.advertiser_id, &input.campaign_id)
            .await;
        tool_json(result)
    }

    #[tool(description = "List insertion orders for an advertiser, with pacing and budget.")]
    async fn list_insertion_orders(
        &self,
        Parameters(input): Parameters<ListChildrenInput>,
    ) -> Result<CallToolResult, McpError> {
        tool_json(self.list_children(EntityKind::InsertionOrder, input).await)
    }

    #[tool(description = "Get full details of one insertion order.")]
    async fn get_insertion_order(
        &self,
        Parameters(input): Parameters<GetInsertionOrderInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .entities
            .get_child(
                EntityKind::InsertionOrder,
                &input.advertiser_id,
                &input.insertion_order_id,
            )
            .await;
        tool_json(result)
    }

    #[tool(description = "List line items for an advertiser, with flight, budget and bid strategy.")]
    async fn list_line_items(
        &self,
        Parameters(input): Parameters<ListChildrenInput>,
    ) -> Result<CallToolResult, McpError> {
        tool_json(self.list_children(EntityKind::LineItem, input).await)
    }

    #[tool(description = "Get full details of one line item, including targeting.")]
    async fn get_line_item(
        &self,
        Parameters(input): Parameters<GetLineItemInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .entities
            .get_child(EntityKind::LineItem, &input.advertiser_id, &input.line_item_id)
            .await;
        tool_json(result)
    }

    #[tool(description = "List creatives for an advertiser.")]
    async fn list_creatives(
        &self,
        Parameters(input): Parameters<ListChildrenInput>,
    ) -> Result<CallToolResult, McpError> {
        tool_json(self.list_children(EntityKind::Creative, input).await)
    }

    #[tool(description = "Get full details of one creative.")]
    async fn get_creative(
        &self,
        Parameters(input): Parameters<GetCreativeInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .entities
            .get_child(EntityKind::Creative, &input.advertiser_id, &input.creative_id)
            .await;
        tool_json(result)
    }
}

fn tool_json(result: ToolResult) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => ok_json(&value),
        Err(failure) => ok_json(&failure),
    }
}

fn ok_json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(value).map_err(mcp_err)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn mcp_err(e: impl std::fmt::Display) -> McpError {
    tracing::debug!(error = %e, "MCP tool error");
    McpError::internal_error(e.to_string(), None)
}
