use std::sync::Arc;

use anyhow::{Context, Result};
use statement_table_web::config;
use statement_table_web::routes::{self, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("statement_table_web=info,statement_ocr_to_table=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_from_env().context("failed to load configuration")?;
    let bind_addr = config.bind_addr;
    let state = AppState {
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "statement table web listening");

    axum::serve(listener, routes::router(state))
        .await
        .context("server error")?;
    Ok(())
}
