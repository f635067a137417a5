use axum::{extract::State, Json};
use procura_order::{AutomationResponse, OrderOrchestrator, RawOrderLine};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub order: Vec<RawOrderLine>,
    pub purchase_order_number: String,
    #[serde(default)]
    pub test_mode: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/runs
/// Execute one automation run. The response always carries the full
/// per-size breakdown; embedded errors are the caller's to inspect.
pub async fn execute_run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<AutomationResponse>, AppError> {
    if req.purchase_order_number.trim().is_empty() {
        return Err(AppError::ValidationError(
            "purchaseOrderNumber must not be empty".to_string(),
        ));
    }
    if let Some(line) = req.order.iter().find(|line| line.quantity == 0) {
        return Err(AppError::ValidationError(format!(
            "quantity for {} must be positive",
            line.sku
        )));
    }

    // One run at a time: the portal session owns a single remote cart
    let _session = state.run_lock.lock().await;

    let orchestrator = OrderOrchestrator::new(
        state.portal.clone(),
        state.artifacts.clone(),
        state.catalog.clone(),
        state.settings.clone(),
    );

    let response = orchestrator
        .run(&req.order, &req.purchase_order_number, req.test_mode)
        .await;
    Ok(Json(response))
}
