//! pixgrid-server binary.
//!
//! Configuration comes from flags, environment variables and an
//! optional `.env` file; see [`ServerConfig`].

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pixgrid_server::{AppState, ServerConfig, create_router};
use pixgrid_session::{Reaper, SessionStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let session_config = config.session_config();
    session_config.validate()?;

    let store = Arc::new(SessionStore::new(session_config));
    let shutdown = CancellationToken::new();
    let reaper = Reaper::spawn(Arc::clone(&store), shutdown.child_token());

    let app = create_router(AppState::new(Arc::clone(&store), config.limits()));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "pixgrid server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    reaper.shutdown().await;
    info!(sessions = store.len().await, "server stopped, discarding sessions");
    Ok(())
}

/// Resolve on Ctrl-C (or if `token` is cancelled elsewhere), then
/// cancel `token` so background tasks stop too.
async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("shutdown requested"),
            Err(e) => {
                tracing::warn!(error = %e, "could not listen for Ctrl-C");
                token.cancelled().await;
            }
        },
        () = token.cancelled() => {}
    }
    token.cancel();
}
