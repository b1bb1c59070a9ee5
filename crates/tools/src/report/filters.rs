//! Report filter construction from identifier inputs

use dv360_client::{FilterPair, FilterType};

use crate::input::ListInput;

/// Identifier inputs, one per filterable category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdFilters {
    pub advertiser_ids: Option<ListInput>,
    pub campaign_ids: Option<ListInput>,
    pub insertion_order_ids: Option<ListInput>,
    pub line_item_ids: Option<ListInput>,
}

impl IdFilters {
    /// Clauses in advertiser, campaign, insertion order, line item order.
    /// Empty inputs count as absent; identifiers are not validated.
    pub fn build(self) -> Vec<FilterPair> {
        let categories = [
            (FilterType::Advertiser, self.advertiser_ids),
            (FilterType::Campaign, self.campaign_ids),
            (FilterType::InsertionOrder, self.insertion_order_ids),
            (FilterType::LineItem, self.line_item_ids),
        ];

        categories
            .into_iter()
            .filter_map(|(filter_type, ids)| {
                ids.filter(|ids| !ids.is_empty())
                    .map(|ids| (filter_type, ids.into_items()))
            })
            .flat_map(|(filter_type, ids)| {
                ids.into_iter()
                    .map(move |id| FilterPair::new(filter_type, id))
            })
            .collect()
    }
}
