use crate::portal::{CartSnapshot, CheckoutField, DriverError, PortalDriver};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// In-memory portal implementing the full `PortalDriver` contract.
///
/// The remote cart is modelled as shared mutable state behind the same
/// seam a WebDriver-backed implementation would expose, so orchestration
/// code can be exercised without a live session. Product pages are seeded
/// up front (`with_product`), and faults can be injected per SKU to
/// simulate a flaky portal UI.
pub struct InMemoryPortal {
    state: Mutex<PortalState>,
}

#[derive(Default)]
struct PortalState {
    products: HashMap<String, String>,
    cart: CartSnapshot,
    fills: Vec<(CheckoutField, String)>,
    submits: u32,
    last_confirmation: Option<String>,
    signed_in: bool,
    fail_sign_in: bool,
    add_failures: HashMap<String, u32>,
    quantity_drift: HashMap<String, u32>,
    submit_failure_skus: HashSet<String>,
}

impl InMemoryPortal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PortalState::default()),
        }
    }

    /// Register a product page the portal will accept adds for
    pub fn with_product(mut self, url: impl Into<String>, sku: impl Into<String>) -> Self {
        self.state.get_mut().products.insert(url.into(), sku.into());
        self
    }

    /// Fail every sign-in attempt
    pub fn with_sign_in_failure(mut self) -> Self {
        self.state.get_mut().fail_sign_in = true;
        self
    }

    /// Fail the next `attempts` adds for the given SKU with a timeout
    pub fn with_add_failures(mut self, sku: impl Into<String>, attempts: u32) -> Self {
        self.state.get_mut().add_failures.insert(sku.into(), attempts);
        self
    }

    /// Record `recorded` in the cart instead of the requested quantity
    pub fn with_quantity_drift(mut self, sku: impl Into<String>, recorded: u32) -> Self {
        self.state.get_mut().quantity_drift.insert(sku.into(), recorded);
        self
    }

    /// Fail submission whenever the cart contains the given SKU
    pub fn with_submit_failure_for(mut self, sku: impl Into<String>) -> Self {
        self.state.get_mut().submit_failure_skus.insert(sku.into());
        self
    }

    /// Current cart contents, for assertions
    pub async fn cart(&self) -> CartSnapshot {
        self.state.lock().await.cart.clone()
    }

    /// Checkout fields filled so far, in fill order
    pub async fn filled_fields(&self) -> Vec<(CheckoutField, String)> {
        self.state.lock().await.fills.clone()
    }

    /// Number of orders actually submitted
    pub async fn submit_count(&self) -> u32 {
        self.state.lock().await.submits
    }

    /// Whether a sign-in has succeeded
    pub async fn signed_in(&self) -> bool {
        self.state.lock().await.signed_in
    }
}

impl Default for InMemoryPortal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalDriver for InMemoryPortal {
    async fn sign_in(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        if state.fail_sign_in {
            return Err(DriverError::Session("invalid credentials".to_string()));
        }
        state.signed_in = true;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), DriverError> {
        self.state.lock().await.cart.clear();
        Ok(())
    }

    async fn add_item(&self, url: &str, quantity: u32) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        let sku = state
            .products
            .get(url)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(format!("product page {url}")))?;

        if let Some(remaining) = state.add_failures.get_mut(&sku) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Timeout(format!("add to cart for {sku}")));
            }
        }

        let recorded = state.quantity_drift.get(&sku).copied().unwrap_or(quantity);
        tracing::debug!(%sku, quantity = recorded, "item added to cart");
        state.cart.insert(sku, recorded);
        Ok(())
    }

    async fn read_cart(&self) -> Result<CartSnapshot, DriverError> {
        Ok(self.state.lock().await.cart.clone())
    }

    async fn fill_checkout_field(
        &self,
        field: CheckoutField,
        value: &str,
    ) -> Result<(), DriverError> {
        tracing::debug!(field = field.as_str(), value, "checkout field filled");
        self.state.lock().await.fills.push((field, value.to_string()));
        Ok(())
    }

    async fn submit_order(&self) -> Result<String, DriverError> {
        let mut state = self.state.lock().await;
        let blocked = state
            .cart
            .skus()
            .any(|sku| state.submit_failure_skus.contains(sku));
        if blocked {
            return Err(DriverError::Portal(
                "order submission did not confirm".to_string(),
            ));
        }

        state.submits += 1;
        let confirmation = format!("JOB-{:06}", 100_000 + state.submits);
        state.last_confirmation = Some(confirmation.clone());
        state.cart.clear();
        Ok(confirmation)
    }

    async fn capture_confirmation(&self) -> Result<Vec<u8>, DriverError> {
        let state = self.state.lock().await;
        match &state.last_confirmation {
            Some(confirmation) => {
                Ok(format!("%PDF-1.4 procura confirmation {confirmation}").into_bytes())
            }
            None => Err(DriverError::NotFound("confirmation page".to_string())),
        }
    }
}
