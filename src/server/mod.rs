pub mod handlers;

use crate::{
    Result,
    config::Config,
    llm,
    relay::{Relay, RelaySettings},
};
use axum::{Router, routing::post};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub const ROUTE: &str = "/interviewAssist";

pub fn router(relay: Arc<Relay>, timeout: Duration) -> Router {
    Router::new()
        .route(
            ROUTE,
            post(handlers::interview_assist).options(handlers::interview_assist),
        )
        .route("/invoke", post(handlers::invoke))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(AppState { relay })
}

pub async fn run(config: Config) -> Result<()> {
    // One client for the life of the process
    let client = llm::connect(&config.inference).await?;
    let relay = Relay::new(client, RelaySettings::from_config(&config)?);

    info!(
        model_id = %config.inference.model_id,
        response_path = %relay.settings().response_path,
        "Relay initialized"
    );

    let app = router(
        Arc::new(relay),
        Duration::from_secs(config.server.timeout_secs),
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
