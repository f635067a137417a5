use crate::cart::CartReconciler;
use crate::checkout::{
    CheckoutError, CheckoutOptions, CheckoutProgress, CheckoutSequencer, CheckoutState,
};
use crate::grouping::group_by_size;
use crate::models::{AutomationResponse, GroupOutcome, OrderGroup, RawOrderLine};
use crate::resolve::resolve_items;
use crate::schedule::next_business_day_utc;
use procura_catalog::CatalogResolver;
use procura_core::{ArtifactStore, PortalDriver};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Tunables for a run, sourced from configuration
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub base_url: String,
    pub cart_retry_limit: u32,
    pub priority: String,
    pub agreement: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base_url: "https://orders.example.com".to_string(),
            cart_retry_limit: 3,
            priority: "ASAP".to_string(),
            agreement: "I acknowledge and agree".to_string(),
        }
    }
}

/// End-to-end driver for one automation run.
///
/// Owns the `AutomationResponse` for the duration of the run and is the
/// only component that mutates it. Groups are processed strictly one
/// after another: a single portal session backs a single remote cart.
pub struct OrderOrchestrator {
    driver: Arc<dyn PortalDriver>,
    artifacts: Arc<dyn ArtifactStore>,
    resolver: Arc<dyn CatalogResolver>,
    settings: RunSettings,
}

impl OrderOrchestrator {
    pub fn new(
        driver: Arc<dyn PortalDriver>,
        artifacts: Arc<dyn ArtifactStore>,
        resolver: Arc<dyn CatalogResolver>,
        settings: RunSettings,
    ) -> Self {
        Self {
            driver,
            artifacts,
            resolver,
            settings,
        }
    }

    /// Run the full automation for one order. Always returns a response:
    /// errors are folded into it, never propagated to the caller.
    pub async fn run(
        &self,
        lines: &[RawOrderLine],
        po_number: &str,
        test_mode: bool,
    ) -> AutomationResponse {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("automation_run", %run_id, po_number, test_mode);
        self.run_inner(lines, po_number, test_mode).instrument(span).await
    }

    async fn run_inner(
        &self,
        lines: &[RawOrderLine],
        po_number: &str,
        test_mode: bool,
    ) -> AutomationResponse {
        let mut response = AutomationResponse::new();

        let resolved = resolve_items(lines, self.resolver.as_ref(), &self.settings.base_url);
        response.resolution_errors = resolved.resolution_errors;

        let groups = group_by_size(&resolved.items);
        tracing::info!(
            items = resolved.items.len(),
            groups = groups.len(),
            unresolved = response.resolution_errors.len(),
            "order resolved and grouped"
        );

        // Every group appears in the response even if it fails before
        // producing any result
        for group in &groups {
            response
                .sizes
                .insert(group.size_key.clone(), GroupOutcome::default());
        }

        // Sign-in happens once, outside the per-group loop; its failure
        // is the fatal path
        if let Err(err) = self.driver.sign_in().await {
            tracing::error!(%err, "portal sign-in failed, aborting run");
            response.set_fatal(err.to_string());
            return response;
        }

        // Explicit fold: one result per group, merged afterwards. A
        // failed group records its error and the loop moves on.
        let mut results: Vec<(String, GroupOutcome, Option<CheckoutError>)> =
            Vec::with_capacity(groups.len());
        for group in &groups {
            let (outcome, error) = self.process_group(group, po_number, test_mode).await;
            results.push((group.size_key.clone(), outcome, error));
        }

        for (size_key, outcome, error) in results {
            let slot = response.sizes.entry(size_key.clone()).or_default();
            *slot = outcome;
            if let Some(err) = error {
                tracing::error!(group = %size_key, %err, "group failed");
                slot.group_error = Some(err.to_string());
            }
        }

        response
    }

    /// Process one group; partial progress (item errors collected before
    /// a later step failed) is kept alongside the group error.
    async fn process_group(
        &self,
        group: &OrderGroup,
        po_number: &str,
        test_mode: bool,
    ) -> (GroupOutcome, Option<CheckoutError>) {
        let mut outcome = GroupOutcome::default();
        let mut progress = CheckoutProgress::new();

        match self
            .drive_group(group, po_number, test_mode, &mut progress, &mut outcome)
            .await
        {
            Ok(()) => (outcome, None),
            Err(err) => {
                let _ = progress.advance(CheckoutState::GroupFailed);
                (outcome, Some(err))
            }
        }
    }

    async fn drive_group(
        &self,
        group: &OrderGroup,
        po_number: &str,
        test_mode: bool,
        progress: &mut CheckoutProgress,
        outcome: &mut GroupOutcome,
    ) -> Result<(), CheckoutError> {
        tracing::info!(group = %group.size_key, items = group.items.len(), "processing group");

        let reconciler =
            CartReconciler::new(self.driver.clone(), self.settings.cart_retry_limit);
        outcome.item_errors = reconciler.reconcile(group).await?;
        progress.advance(CheckoutState::CartReconciled)?;

        let sequencer = CheckoutSequencer::new(
            self.driver.clone(),
            self.artifacts.clone(),
            CheckoutOptions {
                priority: self.settings.priority.clone(),
                agreement: self.settings.agreement.clone(),
                test_mode,
            },
        );
        let confirmation = sequencer
            .check_out(progress, po_number, next_business_day_utc())
            .await?;

        outcome.job_number = Some(confirmation.job_number);
        outcome.confirmation_artifact_ref = Some(confirmation.artifact_ref);
        Ok(())
    }
}
