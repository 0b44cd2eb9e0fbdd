mod config;
mod db;
mod definitions;
mod expand;
mod handlers;
mod importer;
mod models;
mod router;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use db::Store;
use importer::Importer;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub importer: Importer,
    /// Held for the duration of an import run
    pub import_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        let importer = Importer::new(store.clone(), config.manufacturer_policy);
        Self {
            store,
            config,
            importer,
            import_lock: tokio::sync::Mutex::new(()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forge_catalog=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting ForgeCatalog Server");
    tracing::info!("Database: {}", cfg.db_path);
    tracing::info!(
        "Definitions: {}",
        if cfg.definitions_path.is_empty() { "built-in" } else { cfg.definitions_path.as_str() }
    );
    tracing::info!("Manufacturer policy: {:?}", cfg.manufacturer_policy);
    tracing::info!("Listen: {}", cfg.listen_addr);

    // Initialize database
    let store = Store::with_pool_size(&cfg.db_path, cfg.db_max_connections).await?;
    tracing::info!("Database initialized (pool_size={})", cfg.db_max_connections);

    let state = Arc::new(AppState::new(store, cfg.clone()));

    if cfg.import_on_startup {
        run_startup_import(&state).await?;
    }

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("ForgeCatalog listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ForgeCatalog shutting down");
    Ok(())
}

/// Import the configured definitions before serving. A catalog failure
/// stops start-up; rejected definitions only show up in the summary.
async fn run_startup_import(state: &AppState) -> anyhow::Result<()> {
    let set = definitions::load_or_builtin(&state.config.definitions_path).await?;
    let _running = state.import_lock.lock().await;
    let summary = state
        .importer
        .import_set(&set, state.config.import_dry_run)
        .await?;
    tracing::info!("Start-up import finished: {}", summary.message);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
