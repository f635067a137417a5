use chrono::NaiveDate;
use procura_core::{ArtifactError, ArtifactStore, CheckoutField, DriverError, PortalDriver};
use std::sync::Arc;

/// Placeholder confirmation number substituted in test mode
pub const TEST_CONFIRMATION_NUMBER: &str = "TEST-0000000";

/// Checkout progress for one group. Terminal states are `CheckedOut`
/// and `GroupFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Pending,
    CartReconciled,
    MetadataFilled,
    Submitted,
    CheckedOut,
    GroupFailed,
}

impl CheckoutState {
    fn can_advance_to(self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        matches!(
            (self, next),
            (Pending, CartReconciled)
                | (CartReconciled, MetadataFilled)
                | (MetadataFilled, Submitted)
                | (Submitted, CheckedOut)
        ) || (next == GroupFailed && self != CheckedOut)
    }
}

/// Tracks one group's walk through the checkout sequence
#[derive(Debug)]
pub struct CheckoutProgress {
    state: CheckoutState,
}

impl CheckoutProgress {
    pub fn new() -> Self {
        Self {
            state: CheckoutState::Pending,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn advance(&mut self, next: CheckoutState) -> Result<(), CheckoutError> {
        if !self.state.can_advance_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = ?self.state, to = ?next, "checkout transition");
        self.state = next;
        Ok(())
    }
}

impl Default for CheckoutProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("portal driver failure: {0}")]
    Driver(#[from] DriverError),

    #[error("artifact storage failure: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("invalid checkout transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: CheckoutState,
        to: CheckoutState,
    },
}

/// Fixed form values applied at checkout
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    pub priority: String,
    pub agreement: String,
    pub test_mode: bool,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            priority: "ASAP".to_string(),
            agreement: "I acknowledge and agree".to_string(),
            test_mode: false,
        }
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfirmation {
    pub job_number: String,
    pub artifact_ref: String,
}

/// Drives the checkout form for one reconciled cart.
///
/// Metadata is filled in a fixed order: purchase-order number, priority,
/// agreement acknowledgment, due date. In test mode submission and
/// capture are skipped; a placeholder confirmation and a synthetic
/// artifact name of the same shape are substituted.
pub struct CheckoutSequencer {
    driver: Arc<dyn PortalDriver>,
    artifacts: Arc<dyn ArtifactStore>,
    options: CheckoutOptions,
}

impl CheckoutSequencer {
    pub fn new(
        driver: Arc<dyn PortalDriver>,
        artifacts: Arc<dyn ArtifactStore>,
        options: CheckoutOptions,
    ) -> Self {
        Self {
            driver,
            artifacts,
            options,
        }
    }

    /// Run the sequence from `CartReconciled` to `CheckedOut`
    pub async fn check_out(
        &self,
        progress: &mut CheckoutProgress,
        po_number: &str,
        due_date: NaiveDate,
    ) -> Result<CheckoutConfirmation, CheckoutError> {
        self.driver
            .fill_checkout_field(CheckoutField::PurchaseOrderNumber, po_number)
            .await?;
        self.driver
            .fill_checkout_field(CheckoutField::Priority, &self.options.priority)
            .await?;
        self.driver
            .fill_checkout_field(CheckoutField::Agreement, &self.options.agreement)
            .await?;
        self.driver
            .fill_checkout_field(CheckoutField::DueDate, &due_date.format("%Y-%m-%d").to_string())
            .await?;
        progress.advance(CheckoutState::MetadataFilled)?;

        if self.options.test_mode {
            progress.advance(CheckoutState::Submitted)?;
            progress.advance(CheckoutState::CheckedOut)?;
            tracing::info!(po_number, "test mode, skipping order submission");
            return Ok(CheckoutConfirmation {
                job_number: TEST_CONFIRMATION_NUMBER.to_string(),
                artifact_ref: format!("{po_number}-{TEST_CONFIRMATION_NUMBER}.pdf"),
            });
        }

        let job_number = self.driver.submit_order().await?;
        progress.advance(CheckoutState::Submitted)?;
        tracing::info!(po_number, %job_number, "order submitted");

        let document = self.driver.capture_confirmation().await?;
        let name = format!("{po_number}-{job_number}.pdf");
        let artifact_ref = self.artifacts.store(&name, &document).await?;
        progress.advance(CheckoutState::CheckedOut)?;

        Ok(CheckoutConfirmation {
            job_number,
            artifact_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::{InMemoryPortal, MemoryArtifactStore};

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn reconciled() -> CheckoutProgress {
        let mut progress = CheckoutProgress::new();
        progress.advance(CheckoutState::CartReconciled).unwrap();
        progress
    }

    async fn portal_with_cart() -> InMemoryPortal {
        let portal = InMemoryPortal::new().with_product("https://portal.test/p/A", "A");
        portal.add_item("https://portal.test/p/A", 2).await.unwrap();
        portal
    }

    #[tokio::test]
    async fn fills_metadata_in_fixed_order() {
        let portal = Arc::new(portal_with_cart().await);
        let artifacts = Arc::new(MemoryArtifactStore::new());
        let sequencer =
            CheckoutSequencer::new(portal.clone(), artifacts, CheckoutOptions::default());

        let mut progress = reconciled();
        sequencer.check_out(&mut progress, "PO-77", due()).await.unwrap();

        let fields: Vec<CheckoutField> = portal
            .filled_fields()
            .await
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(
            fields,
            [
                CheckoutField::PurchaseOrderNumber,
                CheckoutField::Priority,
                CheckoutField::Agreement,
                CheckoutField::DueDate,
            ]
        );

        let values: Vec<String> = portal
            .filled_fields()
            .await
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        assert_eq!(values[0], "PO-77");
        assert_eq!(values[1], "ASAP");
        assert_eq!(values[3], "2024-03-11");
    }

    #[tokio::test]
    async fn live_checkout_stores_named_artifact() {
        let portal = Arc::new(portal_with_cart().await);
        let artifacts = Arc::new(MemoryArtifactStore::new());
        let sequencer =
            CheckoutSequencer::new(portal.clone(), artifacts.clone(), CheckoutOptions::default());

        let mut progress = reconciled();
        let confirmation = sequencer.check_out(&mut progress, "PO-77", due()).await.unwrap();

        assert_eq!(confirmation.job_number, "JOB-100001");
        assert_eq!(confirmation.artifact_ref, "memory://PO-77-JOB-100001.pdf");
        assert_eq!(progress.state(), CheckoutState::CheckedOut);
        assert_eq!(artifacts.names().await, vec!["PO-77-JOB-100001.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_mode_skips_submission_entirely() {
        let portal = Arc::new(portal_with_cart().await);
        let artifacts = Arc::new(MemoryArtifactStore::new());
        let options = CheckoutOptions {
            test_mode: true,
            ..CheckoutOptions::default()
        };
        let sequencer = CheckoutSequencer::new(portal.clone(), artifacts.clone(), options);

        let mut progress = reconciled();
        let confirmation = sequencer.check_out(&mut progress, "PO-77", due()).await.unwrap();

        assert_eq!(confirmation.job_number, TEST_CONFIRMATION_NUMBER);
        assert_eq!(confirmation.artifact_ref, "PO-77-TEST-0000000.pdf");
        assert_eq!(portal.submit_count().await, 0);
        assert!(artifacts.names().await.is_empty());
        assert_eq!(progress.state(), CheckoutState::CheckedOut);
    }

    #[tokio::test]
    async fn submit_failure_surfaces_as_driver_error() {
        let portal = InMemoryPortal::new()
            .with_product("https://portal.test/p/A", "A")
            .with_submit_failure_for("A");
        portal.add_item("https://portal.test/p/A", 2).await.unwrap();

        let sequencer = CheckoutSequencer::new(
            Arc::new(portal),
            Arc::new(MemoryArtifactStore::new()),
            CheckoutOptions::default(),
        );

        let mut progress = reconciled();
        let err = sequencer.check_out(&mut progress, "PO-77", due()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Driver(_)));
        assert_eq!(progress.state(), CheckoutState::MetadataFilled);
    }

    #[test]
    fn transitions_follow_the_sequence() {
        let mut progress = CheckoutProgress::new();
        progress.advance(CheckoutState::CartReconciled).unwrap();
        progress.advance(CheckoutState::MetadataFilled).unwrap();
        progress.advance(CheckoutState::Submitted).unwrap();
        progress.advance(CheckoutState::CheckedOut).unwrap();
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        let mut progress = CheckoutProgress::new();
        let err = progress.advance(CheckoutState::Submitted).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidTransition { .. }));
    }

    #[test]
    fn any_live_state_can_fail_but_checked_out_cannot() {
        let mut pending = CheckoutProgress::new();
        pending.advance(CheckoutState::GroupFailed).unwrap();

        let mut done = CheckoutProgress::new();
        done.advance(CheckoutState::CartReconciled).unwrap();
        done.advance(CheckoutState::MetadataFilled).unwrap();
        done.advance(CheckoutState::Submitted).unwrap();
        done.advance(CheckoutState::CheckedOut).unwrap();
        assert!(done.advance(CheckoutState::GroupFailed).is_err());
    }
}
