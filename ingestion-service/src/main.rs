use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ingestion_service::config::Config;
use ingestion_service::services::catalog::GoogleBooksSource;
use ingestion_service::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ingestion_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let source = GoogleBooksSource::new(config.api_url.clone(), config.api_key.clone());
    let addr = config.addr();

    info!(
        "Catalog endpoint {} (key {}), snapshot at {}",
        config.api_url,
        if config.api_key.is_some() { "set" } else { "not set" },
        config.snapshot_path.display()
    );

    let app = router(AppState::new(config, Arc::new(source)));

    info!("Ingestion service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
