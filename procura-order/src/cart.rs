use crate::models::{OrderGroup, OrderItem};
use procura_core::{CartSnapshot, DriverError, PortalDriver};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Error message recorded for items the portal never accepted
pub const CART_MISMATCH: &str = "failed to add to cart or incorrect quantity";

/// Items whose SKU is absent from the snapshot or whose observed
/// quantity differs from the requested one. Pure comparison; membership
/// does not depend on the order of `items`.
pub fn mismatched_items<'a>(
    items: &'a [OrderItem],
    snapshot: &CartSnapshot,
) -> Vec<&'a OrderItem> {
    items
        .iter()
        .filter(|item| snapshot.quantity(&item.sku) != Some(item.quantity))
        .collect()
}

/// Clears, populates and verifies the remote cart for one group.
///
/// Individual add failures are deferred to verification; the retry loop
/// is bounded because the portal is an external, possibly flaky UI
/// surface, and forward progress beats blocking the batch. Items still
/// mismatched after the last attempt come back as per-SKU errors and the
/// group checks out with whatever the cart actually holds.
pub struct CartReconciler {
    driver: Arc<dyn PortalDriver>,
    retry_limit: u32,
}

impl CartReconciler {
    pub fn new(driver: Arc<dyn PortalDriver>, retry_limit: u32) -> Self {
        Self {
            driver,
            retry_limit,
        }
    }

    /// Returns per-SKU errors for items the portal never accepted.
    /// Failures of clear/read are group-level and propagate.
    pub async fn reconcile(
        &self,
        group: &OrderGroup,
    ) -> Result<BTreeMap<String, String>, DriverError> {
        self.driver.clear_cart().await?;

        for item in &group.items {
            self.add_item(item).await;
        }

        let mut snapshot = self.driver.read_cart().await?;
        let mut mismatched = mismatched_items(&group.items, &snapshot);

        let mut attempt = 0;
        while !mismatched.is_empty() && attempt < self.retry_limit {
            attempt += 1;
            tracing::info!(
                group = %group.size_key,
                attempt,
                mismatched = mismatched.len(),
                "retrying cart mismatches"
            );

            for item in &mismatched {
                self.add_item(item).await;
            }
            snapshot = self.driver.read_cart().await?;
            mismatched = mismatched_items(&group.items, &snapshot);
        }

        Ok(mismatched
            .into_iter()
            .map(|item| (item.sku.clone(), CART_MISMATCH.to_string()))
            .collect())
    }

    async fn add_item(&self, item: &OrderItem) {
        if let Err(err) = self.driver.add_item(&item.url, item.quantity).await {
            tracing::warn!(sku = %item.sku, %err, "add to cart failed, deferring to verification");
        }
    }
}
