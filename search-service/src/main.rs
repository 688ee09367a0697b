use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use search_service::config::Config;
use search_service::services::executor::QueryRunner;
use search_service::services::queries::QueryCatalog;
use search_service::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("search_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if !config.database_path.exists() {
        warn!(
            "{} does not exist yet; queries will fail until a search has been indexed",
            config.database_path.display()
        );
    }

    let catalog = QueryCatalog::standard();
    info!("Loaded {} analyses", catalog.len());

    let app = router(AppState::new(catalog, QueryRunner::new(&config.database_path)));

    let addr = config.addr();
    info!("Search service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
