pub mod cart;
pub mod checkout;
pub mod grouping;
pub mod models;
pub mod orchestrator;
pub mod resolve;
pub mod schedule;

pub use cart::{mismatched_items, CartReconciler, CART_MISMATCH};
pub use checkout::{
    CheckoutConfirmation, CheckoutError, CheckoutOptions, CheckoutProgress, CheckoutSequencer,
    CheckoutState, TEST_CONFIRMATION_NUMBER,
};
pub use grouping::group_by_size;
pub use models::{AutomationResponse, GroupOutcome, OrderGroup, OrderItem, RawOrderLine};
pub use orchestrator::{OrderOrchestrator, RunSettings};
pub use resolve::{resolve_items, ResolvedOrder, UNRESOLVED_SKU};
pub use schedule::{next_business_day, next_business_day_utc};
