use anyhow::Result;
use tracing::info;

use mention_relay::api::{AppState, Relay, create_router};
use mention_relay::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    mention_relay::setup_logging();

    let config = AppConfig::from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config,
        "Starting mention relay"
    );

    let relay = Relay::from_config(&config)?;
    let app = create_router(AppState::new(relay));

    let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
    info!(address = %config.listen_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Received shutdown signal, cleaning up...");
}
