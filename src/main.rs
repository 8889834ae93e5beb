mod config;
mod routes;
mod services;
mod state;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = config::RelayConfig::from_env()?;
    let bind = config.bind;
    let room = config.room.clone();

    let state = state::AppState::new(config);
    let app = routes::app(state.clone());
    let listener = TcpListener::bind(bind).await?;

    info!(%bind, %room, "alignment relay listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;
    info!("alignment relay stopped");
    Ok(())
}

/// Resolves on Ctrl-C, after asking every open socket to close.
async fn shutdown_signal(state: state::AppState) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "ctrl-c handler unavailable; running until killed");
            std::future::pending::<()>().await;
        }
    }
    state.begin_shutdown();
}
