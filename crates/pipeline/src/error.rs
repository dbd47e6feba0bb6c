use glossa_core::error::CoreError;
use glossa_core::wizard_state::TransitionError;

/// Failure reported by a collaborator.
///
/// The split drives batch behaviour: a `Content` failure is recorded on
/// its own unit, an `Unreachable` failure aborts every unit not yet
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Content(String),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),
}

impl BackendError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => BackendError::Unreachable(err.to_string()),
            other => BackendError::Content(other.to_string()),
        }
    }
}

/// Failure to begin, or to finish, a batch as a whole.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Work set could not be computed: {0}")]
    WorkSet(#[from] CoreError),

    #[error("Wizard is not ready to execute: {0}")]
    NotReady(#[from] TransitionError),

    #[error("Existing translation lookup failed: {0}")]
    Lookup(#[source] BackendError),

    #[error("Wizard catalog could not be loaded: {0}")]
    Catalog(#[source] BackendError),

    #[error("Bulk run was cancelled")]
    Cancelled,
}
