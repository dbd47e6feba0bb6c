use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glossa_api::background;
use glossa_api::config::ServerConfig;
use glossa_api::router::build_app_router;
use glossa_api::sessions::WizardSessions;
use glossa_api::state::AppState;
use glossa_pipeline::collaborators::Collaborators;
use glossa_pipeline::coordinator::BulkCoordinator;
use glossa_pipeline::generation::HttpGenerationBackend;
use glossa_pipeline::store::PgCatalog;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "glossa_api=debug,glossa_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = glossa_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    glossa_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    glossa_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Wizard collaborators ---
    let catalog = Arc::new(PgCatalog::new(pool.clone()));
    let backend = HttpGenerationBackend::new(
        &config.generation_url,
        Duration::from_secs(config.generation_timeout_secs),
        catalog.clone(),
    )
    .expect("Failed to build generation client");
    tracing::info!(url = %config.generation_url, "Generation backend configured");

    let services = Collaborators {
        locales: catalog.clone(),
        keys: catalog.clone(),
        store: catalog.clone(),
        backend: Arc::new(backend),
        templates: catalog,
    };

    // --- App state ---
    let sessions = Arc::new(WizardSessions::new());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::clone(&sessions),
        services,
        coordinator: BulkCoordinator::new(config.bulk_max_concurrency),
    };

    // --- Background tasks ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    tokio::spawn(background::session_sweep::run(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_idle_ttl_secs),
        Duration::from_secs(config.session_sweep_interval_secs),
        sweep_cancel.clone(),
    ));

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
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
    tracing::info!("Server stopped accepting connections, cleaning up");
    sweep_cancel.cancel();
    sessions.close_all().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
