//! Entity lookups for advertisers and the objects they own
//!
//! List operations project each raw entity onto a fixed set of snake_case
//! fields; get operations return the entity untouched. Remote errors are
//! turned into [`ToolFailure`]s with a hint picked by [`Hints`].

use std::sync::Arc;

use dv360_client::{EntityApi, EntityKind, ListParams};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::hints::{Hints, ToolFailure, ToolResult};

/// Value used when the source field is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    Null,
    Object,
    Array,
}

impl Fallback {
    fn value(self) -> Value {
        match self {
            Fallback::Null => Value::Null,
            Fallback::Object => Value::Object(Map::new()),
            Fallback::Array => Value::Array(Vec::new()),
        }
    }
}

/// `(output key, API key, fallback)`
type Field = (&'static str, &'static str, Fallback);

const ADVERTISER_FIELDS: &[Field] = &[
    ("advertiser_id", "advertiserId", Fallback::Null),
    ("advertiser_name", "displayName", Fallback::Null),
    ("partner_id", "partnerId", Fallback::Null),
    ("entity_status", "entityStatus", Fallback::Null),
    ("update_time", "updateTime", Fallback::Null),
];

const CAMPAIGN_FIELDS: &[Field] = &[
    ("campaign_id", "campaignId", Fallback::Null),
    ("campaign_name", "displayName", Fallback::Null),
    ("advertiser_id", "advertiserId", Fallback::Null),
    ("entity_status", "entityStatus", Fallback::Null),
    ("update_time", "updateTime", Fallback::Null),
    ("campaign_goal", "campaignGoal", Fallback::Object),
    ("campaign_flight", "campaignFlight", Fallback::Object),
    ("frequency_cap", "frequencyCap", Fallback::Object),
];

const INSERTION_ORDER_FIELDS: &[Field] = &[
    ("insertion_order_id", "insertionOrderId", Fallback::Null),
    ("insertion_order_name", "displayName", Fallback::Null),
    ("advertiser_id", "advertiserId", Fallback::Null),
    ("campaign_id", "campaignId", Fallback::Null),
    ("entity_status", "entityStatus", Fallback::Null),
    ("update_time", "updateTime", Fallback::Null),
    ("pacing", "pacing", Fallback::Object),
    ("frequency_cap", "frequencyCap", Fallback::Object),
    ("budget", "budget", Fallback::Object),
    ("insertion_order_type", "insertionOrderType", Fallback::Null),
];

const LINE_ITEM_FIELDS: &[Field] = &[
    ("line_item_id", "lineItemId", Fallback::Null),
    ("line_item_name", "displayName", Fallback::Null),
    ("advertiser_id", "advertiserId", Fallback::Null),
    ("campaign_id", "campaignId", Fallback::Null),
    ("insertion_order_id", "insertionOrderId", Fallback::Null),
    ("entity_status", "entityStatus", Fallback::Null),
    ("line_item_type", "lineItemType", Fallback::Null),
    ("update_time", "updateTime", Fallback::Null),
    ("flight", "flight", Fallback::Object),
    ("budget", "budget", Fallback::Object),
    ("pacing", "pacing", Fallback::Object),
    ("frequency_cap", "frequencyCap", Fallback::Object),
    ("bid_strategy", "bidStrategy", Fallback::Object),
];

const CREATIVE_FIELDS: &[Field] = &[
    ("creative_id", "creativeId", Fallback::Null),
    ("creative_name", "displayName", Fallback::Null),
    ("advertiser_id", "advertiserId", Fallback::Null),
    ("creative_type", "creativeType", Fallback::Null),
    ("entity_status", "entityStatus", Fallback::Null),
    ("update_time", "updateTime", Fallback::Null),
    ("dimensions", "dimensions", Fallback::Object),
    ("creative_attributes", "creativeAttributes", Fallback::Array),
    ("hosting_source", "hostingSource", Fallback::Null),
];

fn fields_for(kind: EntityKind) -> &'static [Field] {
    match kind {
        EntityKind::Campaign => CAMPAIGN_FIELDS,
        EntityKind::InsertionOrder => INSERTION_ORDER_FIELDS,
        EntityKind::LineItem => LINE_ITEM_FIELDS,
        EntityKind::Creative => CREATIVE_FIELDS,
    }
}

fn project(entity: &Value, fields: &[Field]) -> Value {
    let projected: Map<String, Value> = fields
        .iter()
        .map(|(key, source, fallback)| {
            let value = entity
                .get(source)
                .cloned()
                .unwrap_or_else(|| fallback.value());
            (key.to_string(), value)
        })
        .collect();
    Value::Object(projected)
}

/// Response key for one entity, e.g. `insertion_order`
fn singular_key(kind: EntityKind) -> String {
    kind.noun().replace(' ', "_")
}

fn plural_key(kind: EntityKind) -> String {
    format!("{}s", singular_key(kind))
}

fn capitalized(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Entity tools over an [`EntityApi`]
#[derive(Clone)]
pub struct EntityTools {
    api: Arc<dyn EntityApi>,
    default_partner_id: Option<String>,
}

impl EntityTools {
    pub fn new(api: Arc<dyn EntityApi>, default_partner_id: Option<String>) -> Self {
        Self {
            api,
            default_partner_id: default_partner_id.filter(|p| !p.is_empty()),
        }
    }

    pub fn default_partner_id(&self) -> Option<&str> {
        self.default_partner_id.as_deref()
    }

    /// Advertisers under a partner, falling back to the configured partner
    pub async fn list_advertisers(
        &self,
        partner_id: Option<String>,
        params: ListParams,
    ) -> ToolResult {
        let partner_id = match partner_id
            .filter(|p| !p.is_empty())
            .or_else(|| self.default_partner_id.clone())
        {
            Some(partner_id) => partner_id,
            None => {
                return Err(ToolFailure::new(
                    "No partner_id provided and DV360_PARTNER_ID not set in .env file",
                )
                .with_message(
                    "Either provide partner_id parameter or set DV360_PARTNER_ID in your .env file",
                ))
            }
        };

        info!("Listing advertisers for partner {}...", partner_id);
        let page = self
            .api
            .list_advertisers(&partner_id, &params)
            .await
            .map_err(|e| {
                error!("Error listing advertisers: {}", e);
                Hints::new(
                    "Permission denied. Ensure your service account has Display & Video 360 API access and is linked to the partner account.",
                    format!("Partner ID {} not found. Double-check the partner ID.", partner_id),
                )
                .failure(e)
            })?;

        info!("Found {} advertisers", page.items.len());
        let advertisers: Vec<Value> = page
            .items
            .iter()
            .map(|item| project(item, ADVERTISER_FIELDS))
            .collect();
        let count = advertisers.len();

        Ok(json!({
            "success": true,
            "advertisers": advertisers,
            "count": count,
            "partner_id": partner_id,
            "next_page_token": page.next_page_token,
        }))
    }

    /// One page of an advertiser's campaigns, insertion orders, line items
    /// or creatives
    pub async fn list_children(
        &self,
        kind: EntityKind,
        advertiser_id: &str,
        params: ListParams,
    ) -> ToolResult {
        let plural = format!("{}s", kind.noun());
        info!("Listing {} for advertiser {}...", plural, advertiser_id);

        let page = self
            .api
            .list_children(advertiser_id, kind, &params)
            .await
            .map_err(|e| {
                error!("Error listing {}: {}", plural, e);
                Hints::new(
                    "Permission denied. Ensure your service account has access to this advertiser.",
                    format!("Advertiser ID {} not found.", advertiser_id),
                )
                .failure(e)
            })?;

        info!("Found {} {}", page.items.len(), plural);
        let fields = fields_for(kind);
        let items: Vec<Value> = page.items.iter().map(|item| project(item, fields)).collect();

        let count = items.len();
        let mut response = Map::new();
        response.insert("success".to_string(), Value::Bool(true));
        response.insert(plural_key(kind), Value::Array(items));
        response.insert("count".to_string(), json!(count));
        response.insert("advertiser_id".to_string(), json!(advertiser_id));
        response.insert("next_page_token".to_string(), json!(page.next_page_token));
        Ok(Value::Object(response))
    }

    /// A single entity as the API returns it
    pub async fn get_child(&self, kind: EntityKind, advertiser_id: &str, id: &str) -> ToolResult {
        info!("Fetching {} {} for advertiser {}...", kind.noun(), id, advertiser_id);

        let entity = self
            .api
            .get_child(advertiser_id, kind, id)
            .await
            .map_err(|e| {
                error!("Error getting {}: {}", kind.noun(), e);
                Hints::new(
                    format!(
                        "Permission denied. Ensure your service account has access to this {}.",
                        kind.noun()
                    ),
                    format!(
                        "{} {} not found for advertiser {}.",
                        capitalized(kind.noun()),
                        id,
                        advertiser_id
                    ),
                )
                .failure(e)
            })?;

        info!(
            "Successfully retrieved {}: {}",
            kind.noun(),
            entity
                .get("displayName")
                .and_then(|name| name.as_str())
                .unwrap_or("<unnamed>")
        );

        let mut response = Map::new();
        response.insert("success".to_string(), Value::Bool(true));
        response.insert(singular_key(kind), entity);
        Ok(Value::Object(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dv360_client::EntityPage;

    struct Unreachable;

    #[async_trait]
    impl EntityApi for Unreachable {
        async fn list_advertisers(
            &self,
            _: &str,
            _: &ListParams,
        ) -> dv360_client::Result<EntityPage> {
            unreachable!("no call expected")
        }

        async fn list_children(
            &self,
            _: &str,
            _: EntityKind,
            _: &ListParams,
        ) -> dv360_client::Result<EntityPage> {
            unreachable!("no call expected")
        }

        async fn get_child(&self, _: &str, _: EntityKind, _: &str) -> dv360_client::Result<Value> {
            unreachable!("no call expected")
        }
    }

    #[test]
    fn test_blank_partner_counts_as_missing() {
        let tools = EntityTools::new(Arc::new(Unreachable), Some(String::new()));
        assert!(tools.default_partner_id().is_none());

        let failure = tokio_test::block_on(
            tools.list_advertisers(Some(String::new()), ListParams::default()),
        )
        .unwrap_err();
        assert!(failure.error.starts_with("No partner_id provided"));
    }

    #[test]
    fn test_project_renames_and_fills_defaults() {
        let raw = json!({
            "campaignId": "5",
            "displayName": "Spring",
            "advertiserId": "1",
            "campaignGoal": {"campaignGoalType": "CAMPAIGN_GOAL_TYPE_BRAND_AWARENESS"},
            "unrelated": true
        });

        let projected = project(&raw, CAMPAIGN_FIELDS);
        assert_eq!(
            projected,
            json!({
                "campaign_id": "5",
                "campaign_name": "Spring",
                "advertiser_id": "1",
                "entity_status": null,
                "update_time": null,
                "campaign_goal": {"campaignGoalType": "CAMPAIGN_GOAL_TYPE_BRAND_AWARENESS"},
                "campaign_flight": {},
                "frequency_cap": {}
            })
        );
    }

    #[test]
    fn test_creative_attributes_default_to_list() {
        let projected = project(&json!({}), CREATIVE_FIELDS);
        assert_eq!(projected["creative_attributes"], json!([]));
        assert_eq!(projected["dimensions"], json!({}));
        assert_eq!(projected["hosting_source"], Value::Null);
    }

    #[test]
    fn test_projection_keeps_field_order() {
        let projected = project(&json!({}), LINE_ITEM_FIELDS);
        let keys: Vec<&String> = projected.as_object().unwrap().keys().collect();
        let expected: Vec<&str> = LINE_ITEM_FIELDS.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_response_keys() {
        assert_eq!(singular_key(EntityKind::InsertionOrder), "insertion_order");
        assert_eq!(plural_key(EntityKind::LineItem), "line_items");
        assert_eq!(plural_key(EntityKind::Campaign), "campaigns");
    }

    #[test]
    fn test_capitalized() {
        assert_eq!(capitalized("insertion order"), "Insertion order");
        assert_eq!(capitalized(""), "");
    }
}
