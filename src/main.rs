use std::net::TcpListener;

use anyhow::Context;
use crossblog::{init_db, run_app, sqlite_router, Config, Result};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    crossblog::logging::init();
    if let Err(error) = serve().await {
        tracing::error!("Error: {:#}", error);
        std::process::exit(1);
    }
}

async fn serve() -> Result<()> {
    let config = Config::from_env()?;
    let pool = init_db(&config).await?;
    let listener = TcpListener::bind(config.bind_address)
        .with_context(|| format!("Could not bind {}", config.bind_address))?;
    run_app(sqlite_router(pool), listener).await
}
