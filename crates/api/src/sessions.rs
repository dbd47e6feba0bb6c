use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glossa_pipeline::session::WizardSession;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Registry of open wizard sessions.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared through
/// [`crate::state::AppState`].
pub struct WizardSessions {
    sessions: RwLock<HashMap<Uuid, Arc<WizardSession>>>,
}

impl WizardSessions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a newly opened session.
    pub async fn insert(&self, session: Arc<WizardSession>) {
        self.sessions.write().await.insert(session.id(), session);
    }

    /// Look up an open session.
    pub async fn get(&self, id: Uuid) -> Option<Arc<WizardSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Remove and close a session. Returns `false` if it was not open.
    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    /// Number of open sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Close and remove sessions nobody has used for at least `idle_ttl`.
    ///
    /// Returns the number of sessions closed.
    pub async fn close_idle(&self, idle_ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            if session.idle_for() < idle_ttl {
                return true;
            }
            session.close();
            tracing::info!(session_id = %id, "Closed idle wizard session");
            false
        });
        before - sessions.len()
    }

    /// Close every open session, abandoning in-flight bulk runs.
    ///
    /// Used during graceful shutdown.
    pub async fn close_all(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        for session in sessions.values() {
            session.close();
        }
        sessions.clear();
        tracing::info!(count, "Closed all wizard sessions");
    }
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::new()
    }
}
