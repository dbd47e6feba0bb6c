use std::sync::Arc;

use glossa_pipeline::collaborators::Collaborators;
use glossa_pipeline::coordinator::BulkCoordinator;

use crate::config::ServerConfig;
use crate::sessions::WizardSessions;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: glossa_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Open wizard sessions.
    pub sessions: Arc<WizardSessions>,
    /// Directories, store, generation backend, and templates the wizard runs against.
    pub services: Collaborators,
    /// Fan-out settings for bulk runs.
    pub coordinator: BulkCoordinator,
}
