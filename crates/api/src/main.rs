use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_engine::config::EngineConfig;
use atelier_engine::RevisionEngine;
use atelier_events::{EventBus, EventLog};
use atelier_genai::{GenerationApi, GenerationConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_api=debug,atelier_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let engine_config = EngineConfig::from_env();
    tracing::info!(
        simulated_delay_ms = engine_config.simulated_delay.as_millis() as u64,
        min_drag = engine_config.min_drag,
        promotion_policy = ?engine_config.promotion_policy,
        "Loaded engine configuration",
    );

    let generation_config = GenerationConfig::from_env();

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Spawn the event log (keeps recent events for the activity feed).
    let event_log = EventLog::new(config.event_log_capacity);
    let log_cancel = tokio_util::sync::CancellationToken::new();
    let log_handle = tokio::spawn(
        event_log
            .clone()
            .run(event_bus.subscribe(), log_cancel.clone()),
    );

    // --- Revision engine ---
    let mut engine = RevisionEngine::new(engine_config, Arc::clone(&event_bus));
    match GenerationApi::from_config(&generation_config)
        .expect("Failed to build generation API client")
    {
        Some(api) => {
            tracing::info!(api_url = %api.api_url(), "Live generation enabled");
            engine = engine.with_generator(Arc::new(api));
        }
        None => {
            tracing::info!("GENERATION_API_URL not set, live generation disabled");
        }
    }

    // --- App state ---
    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        event_log,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be a valid IP address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped, shutting down background services");

    log_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        log_handle,
    )
    .await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
