//! gs-questions - Aviation exam content microservice

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gs_questions::{db, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting gs-questions microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Database: {}", config.database_path);

    let pool = db::init_pool(std::path::Path::new(&config.database_path)).await?;
    info!("Database connection established");

    let bind = format!("{}:{}", config.host, config.port);
    let state = AppState::new(pool, config)?;
    let app = gs_questions::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
