use async_trait::async_trait;
use std::collections::HashMap;

/// Checkout form fields, filled in a fixed order during checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    PurchaseOrderNumber,
    Priority,
    Agreement,
    DueDate,
}

impl CheckoutField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutField::PurchaseOrderNumber => "purchase_order_number",
            CheckoutField::Priority => "priority",
            CheckoutField::Agreement => "agreement",
            CheckoutField::DueDate => "due_date",
        }
    }
}

/// Observed cart contents, read back from the portal.
/// Used only for comparison against the requested quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    quantities: HashMap<String, u32>,
}

impl CartSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sku: impl Into<String>, quantity: u32) {
        self.quantities.insert(sku.into(), quantity);
    }

    pub fn remove(&mut self, sku: &str) {
        self.quantities.remove(sku);
    }

    pub fn quantity(&self, sku: &str) -> Option<u32> {
        self.quantities.get(sku).copied()
    }

    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.quantities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn clear(&mut self) {
        self.quantities.clear();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("element not found: {0}")]
    NotFound(String),

    #[error("portal session failure: {0}")]
    Session(String),

    #[error("portal rejected the operation: {0}")]
    Portal(String),
}

/// Capability contract for driving the ordering portal's UI.
///
/// Every operation is a blocking call with a timeout owned by the
/// implementation; a timeout surfaces as `DriverError::Timeout` rather
/// than a crash. One instance drives one remote cart session at a time.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    /// Authenticate the automation session with the portal
    async fn sign_in(&self) -> Result<(), DriverError>;

    /// Empty the remote cart; a no-op when the cart is already empty
    async fn clear_cart(&self) -> Result<(), DriverError>;

    /// Navigate to a product page and add it to the cart with the given quantity
    async fn add_item(&self, url: &str, quantity: u32) -> Result<(), DriverError>;

    /// Read back the current cart contents
    async fn read_cart(&self) -> Result<CartSnapshot, DriverError>;

    /// Fill one checkout form field
    async fn fill_checkout_field(&self, field: CheckoutField, value: &str)
        -> Result<(), DriverError>;

    /// Submit the order and wait for the confirmation marker.
    /// Returns the confirmation number shown on the confirmation page.
    async fn submit_order(&self) -> Result<String, DriverError>;

    /// Capture the confirmation page as a printable document
    async fn capture_confirmation(&self) -> Result<Vec<u8>, DriverError>;
}
