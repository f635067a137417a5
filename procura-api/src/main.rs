use procura_api::{app, AppState};
use procura_core::{ArtifactStore, InMemoryPortal, PortalDriver};
use procura_order::RunSettings;
use procura_store::{load_catalog, Config, LocalArtifactStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "procura_api=debug,procura_order=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Procura API on port {}", config.server.port);

    let catalog = Arc::new(load_catalog(Path::new(&config.catalog.path))?);
    tracing::info!(entries = catalog.len(), "product catalog ready");

    let portal: Arc<dyn PortalDriver> = match config.portal.mode.as_str() {
        "memory" => {
            // Seed the in-memory portal with the catalog's product pages
            // so rehearsal runs resolve the same URLs a live portal would
            let portal = catalog
                .records()
                .fold(InMemoryPortal::new(), |portal, record| {
                    portal.with_product(
                        record.navigable_url(&config.portal.base_url),
                        record.sku.clone(),
                    )
                });
            Arc::new(portal)
        }
        other => anyhow::bail!("unsupported portal.mode {other:?}, expected \"memory\""),
    };

    let artifacts: Arc<dyn ArtifactStore> =
        Arc::new(LocalArtifactStore::new(&config.artifacts.dir));

    let state = AppState {
        portal,
        artifacts,
        catalog,
        settings: RunSettings {
            base_url: config.portal.base_url.clone(),
            cart_retry_limit: config.checkout.cart_retry_limit,
            priority: config.checkout.priority.clone(),
            agreement: config.checkout.agreement.clone(),
        },
        run_lock: Arc::new(Mutex::new(())),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
