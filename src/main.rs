//! Application entry point and server initialization

use flatmate_search::config::Config;
use flatmate_search::database::{init_db, AppState};
use flatmate_search::route::create_app;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "flatmate_search=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env();

    let db = match init_db(&config.database_url) {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, path = %config.database_url, "failed to initialize database");
            std::process::exit(1);
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        port = config.port,
        database = %config.database_url,
        session_ttl_secs = config.session_ttl.as_secs(),
        "listing search running"
    );

    let state = AppState::new(db, config);
    let sweeper = state.sessions.spawn_sweeper(state.sessions.ttl());
    let app = create_app(state).layer(TraceLayer::new_for_http());

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server stopped with an error");
    }
    sweeper.abort();
}

/// Resolves on SIGINT, or SIGTERM on Unix
///
/// Open connections are allowed to finish and every live filter session is
/// dropped with the router, cancelling pending URL commits.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
