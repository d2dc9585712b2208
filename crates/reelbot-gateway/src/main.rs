use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

mod app;
mod http;

/// Telegram webhook gateway: stores channel videos, serves a random one on request.
#[derive(Debug, Parser)]
#[command(name = "reelbot-gateway", version)]
struct Cli {
    /// Path to reelbot.toml (default: ~/.reelbot/reelbot.toml).
    #[arg(long, env = "REELBOT_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelbot_gateway=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = reelbot_core::config::ReelbotConfig::load(cli.config.as_deref())?;

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    // SQLite: one file, one connection per unit of work.
    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path)?;
    info!(path = %db_path, "opening SQLite database");
    let store = reelbot_store::Store::open(
        &db_path,
        Duration::from_millis(config.database.busy_timeout_ms),
    )?;

    let transport = reelbot_telegram::TelegramTransport::new(&config.telegram)?;
    info!(
        api = %config.telegram.api_base_url,
        token = %reelbot_telegram::client::mask_token(&config.telegram.bot_token),
        "Telegram transport ready"
    );

    let webhook_path = config.gateway.webhook_path.clone();
    let state = Arc::new(app::AppState::new(config, store, Box::new(transport)));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("reelbot gateway listening on {} (webhook: {})", addr, webhook_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("reelbot gateway stopped");
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) -> reelbot_core::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
