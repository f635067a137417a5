use procura_catalog::Catalog;
use procura_core::{ArtifactStore, PortalDriver};
use procura_order::RunSettings;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
///
/// One portal session backs one remote cart, so runs must not
/// interleave: handlers hold `run_lock` for the full duration of a run.
#[derive(Clone)]
pub struct AppState {
    pub portal: Arc<dyn PortalDriver>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub catalog: Arc<Catalog>,
    pub settings: RunSettings,
    pub run_lock: Arc<Mutex<()>>,
}
