use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use indexing_service::config::Config;
use indexing_service::models::storage::SqliteStore;
use indexing_service::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("indexing_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let store = SqliteStore::new(&config.database_path);

    if let Err(e) = store.initialize().await {
        error!("Failed to open {}: {}", config.database_path.display(), e);
        std::process::exit(1);
    }
    info!("Using SQLite store at {}", config.database_path.display());

    let app = router(AppState::new(store));

    let addr = config.addr();
    info!("Indexing service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
