//! Binary entrypoint for the crafting HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`craft_server::config`].

use craft_server::config::ServerConfig;
use craft_server::router::build_router;
use craft_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    if config.provider.api_key.is_none() {
        tracing::warn!("MESHY_API_KEY is not set; provider requests will be unauthenticated");
    }

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(db = %config.db_path, "craft server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
