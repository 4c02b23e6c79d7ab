//! Stranger 시그널링 서버

use anyhow::Context;
use std::sync::Arc;
use stranger_signaling::config::Config;
use stranger_signaling::server;
use stranger_signaling::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Stranger Signaling Server started");
    tracing::info!("Address: {}", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);

    server::serve(listener, state)
        .await
        .context("server terminated")?;
    Ok(())
}
