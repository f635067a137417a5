use procura_catalog::CatalogRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw order line as received from the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawOrderLine {
    pub sku: String,
    pub quantity: u32,
}

/// A resolved, orderable item. Built once at resolution time from a raw
/// line and its catalog record; immutable afterwards. An item without
/// catalog data never becomes an `OrderItem` — it is recorded as a
/// resolution error instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub sku: String,
    pub quantity: u32,
    pub catalog_id: String,
    pub list_id: String,
    pub item_id: String,
    pub product_name: Option<String>,
    pub shop_id: Option<String>,
    pub misc_item_id: Option<String>,
    pub size: Option<String>,
    pub url: String,
}

impl OrderItem {
    pub fn from_record(line: &RawOrderLine, record: &CatalogRecord, base_url: &str) -> Self {
        Self {
            sku: line.sku.clone(),
            quantity: line.quantity,
            catalog_id: record.catalog_id.clone(),
            list_id: record.list_id.clone(),
            item_id: record.item_id.clone(),
            product_name: record.product_name.clone(),
            shop_id: record.shop_id.clone(),
            misc_item_id: record.misc_item_id.clone(),
            size: record.size.clone(),
            url: record.navigable_url(base_url),
        }
    }

    /// Grouping key; items without a size classification share the empty key
    pub fn size_key(&self) -> String {
        self.size.clone().unwrap_or_default()
    }
}

/// A batch of items sharing one size classification, submitted together
/// as one checkout. Built once by the grouper, never merged or split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderGroup {
    pub size_key: String,
    pub items: Vec<OrderItem>,
}

impl OrderGroup {
    pub fn new(size_key: impl Into<String>) -> Self {
        Self {
            size_key: size_key.into(),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: OrderItem) {
        self.items.push(item);
    }
}

/// Outcome of one group's cart/checkout sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutcome {
    pub job_number: Option<String>,
    pub confirmation_artifact_ref: Option<String>,
    pub item_errors: BTreeMap<String, String>,
    pub group_error: Option<String>,
}

/// Aggregated result of one automation run.
///
/// 200 means the run completed, possibly with embedded errors the caller
/// is expected to inspect; 500 means a fatal failure aborted the run,
/// with whatever partial results had been collected retained. BTreeMap
/// keys give deterministic serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutomationResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub resolution_errors: BTreeMap<String, String>,
    pub sizes: BTreeMap<String, GroupOutcome>,
}

impl AutomationResponse {
    pub fn new() -> Self {
        Self {
            status_code: 200,
            error: None,
            resolution_errors: BTreeMap::new(),
            sizes: BTreeMap::new(),
        }
    }

    /// Mark the run fatally failed, keeping partial results
    pub fn set_fatal(&mut self, message: impl Into<String>) {
        self.status_code = 500;
        self.error = Some(message.into());
    }
}

impl Default for AutomationResponse {
    fn default() -> Self {
        Self::new()
    }
}
