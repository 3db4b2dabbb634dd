use skillswap::{
    AppState, Config, create_router, db, get_db_pool,
    services::GeminiClient,
    utils,
};
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let db_config = db::DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    // Run migrations
    db::migrations::run_migrations(&pool).await?;

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; strategy and hashtag generation will fail");
    }

    let generator = GeminiClient::from_config(&config)?;
    let port = config.port;
    let state = AppState::new(Arc::new(db::PgStore::new(pool)), Arc::new(generator), config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
