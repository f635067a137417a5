use serde::{Deserialize, Serialize};

/// One catalog entry for an orderable product.
///
/// `catalog_id`, `list_id` and `item_id` are the portal identifiers the
/// product page URL is built from; the rest is descriptive metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    pub sku: String,
    pub catalog_id: String,
    pub list_id: String,
    pub item_id: String,
    pub product_name: Option<String>,
    pub shop_id: Option<String>,
    pub misc_item_id: Option<String>,
    pub size: Option<String>,
}

impl CatalogRecord {
    /// Product page URL the portal driver can navigate to
    pub fn navigable_url(&self, base_url: &str) -> String {
        format!(
            "{}/FormV2.asp?CatalogID={}&INVSYN={}|{}",
            base_url.trim_end_matches('/'),
            self.catalog_id,
            self.list_id,
            self.item_id
        )
    }

    /// Length of the shop identifier, used by the duplicate-row policy
    pub(crate) fn shop_id_len(&self) -> usize {
        self.shop_id.as_deref().map_or(0, str::len)
    }
}
