//! Runtime for one open wizard.
//!
//! A [`WizardSession`] owns its [`WizardState`] behind an async mutex, the
//! locale/key/template snapshot taken at open time, and a cancellation
//! token scoped to the session's lifetime. Closing the session cancels the
//! token; a batch still running at that point is dropped and its results
//! never reach the state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use glossa_core::bulk_action::{BulkActionType, StepType};
use glossa_core::bulk_result::BulkResult;
use glossa_core::locale::{find_locale, InstructionTemplate, Locale, TranslationKey};
use glossa_core::types::{DbId, Timestamp};
use glossa_core::wizard_state::{TransitionError, TransitionResult, WizardState};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::collaborators::Collaborators;
use crate::coordinator::BulkCoordinator;
use crate::error::PipelineError;
use crate::planner::plan_batch;

// ---------------------------------------------------------------------------
// Catalog snapshot
// ---------------------------------------------------------------------------

/// Reference data read once when the session opens.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WizardCatalog {
    pub locales: Vec<Locale>,
    pub keys: Vec<TranslationKey>,
    pub templates: Vec<InstructionTemplate>,
}

impl WizardCatalog {
    fn require_locale(&self, id: DbId) -> TransitionResult {
        find_locale(&self.locales, id)
            .map(|_| ())
            .ok_or(TransitionError::UnknownLocale(id))
    }

    fn require_key(&self, id: DbId) -> TransitionResult {
        if self.keys.iter().any(|k| k.id == id) {
            Ok(())
        } else {
            Err(TransitionError::UnknownKey(id))
        }
    }

    fn template(&self, id: DbId) -> Result<&InstructionTemplate, TransitionError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or(TransitionError::UnknownTemplate(id))
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A user-initiated change to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SetActionType(BulkActionType),
    SetSourceLocale(DbId),
    ToggleTargetLocale(DbId),
    SetCopyTargetLocale(DbId),
    SetInstructions(String),
    ApplyTemplate(DbId),
    ToggleKey(DbId),
    Advance,
    GoBack,
    GoToStep(StepType),
}

impl Transition {
    fn name(&self) -> &'static str {
        match self {
            Self::SetActionType(_) => "set_action_type",
            Self::SetSourceLocale(_) => "set_source_locale",
            Self::ToggleTargetLocale(_) => "toggle_target_locale",
            Self::SetCopyTargetLocale(_) => "set_copy_target_locale",
            Self::SetInstructions(_) => "set_instructions",
            Self::ApplyTemplate(_) => "apply_template",
            Self::ToggleKey(_) => "toggle_key",
            Self::Advance => "advance",
            Self::GoBack => "go_back",
            Self::GoToStep(_) => "go_to_step",
        }
    }
}

/// What a transition did, with the state as it stands afterward.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub rejection: Option<TransitionError>,
    pub state: WizardState,
}

impl TransitionOutcome {
    pub fn applied(&self) -> bool {
        self.rejection.is_none()
    }
}

/// How an execute request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The batch is running (or, when empty, already complete).
    Started { total: usize },
    /// The work set could not be computed; the wizard stays on `confirm`.
    FailedToStart { message: String },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One open wizard.
pub struct WizardSession {
    id: Uuid,
    app_id: DbId,
    catalog: WizardCatalog,
    state: Mutex<WizardState>,
    cancel: CancellationToken,
    opened_at: Timestamp,
    started: Instant,
    /// Milliseconds after `started` of the last request that used the session.
    last_active_ms: AtomicU64,
}

impl WizardSession {
    /// Open a wizard for `app_id`, snapshotting its locales and keys.
    ///
    /// Templates are a convenience: if they cannot be listed the session
    /// opens with none.
    pub async fn open(
        app_id: DbId,
        collaborators: &Collaborators,
    ) -> Result<Arc<Self>, PipelineError> {
        let locales = collaborators
            .locales
            .list_locales(app_id)
            .await
            .map_err(PipelineError::Catalog)?;
        let keys = collaborators
            .keys
            .list_keys(app_id)
            .await
            .map_err(PipelineError::Catalog)?;
        let templates = match collaborators.templates.list_instruction_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                tracing::warn!(app_id, error = %e, "Instruction templates unavailable");
                Vec::new()
            }
        };

        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            app_id,
            catalog: WizardCatalog {
                locales,
                keys,
                templates,
            },
            state: Mutex::new(WizardState::new()),
            cancel: CancellationToken::new(),
            opened_at: Utc::now(),
            started: Instant::now(),
            last_active_ms: AtomicU64::new(0),
        });

        tracing::info!(
            session_id = %session.id,
            app_id,
            locale_count = session.catalog.locales.len(),
            key_count = session.catalog.keys.len(),
            "Wizard session opened"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn app_id(&self) -> DbId {
        self.app_id
    }

    pub fn catalog(&self) -> &WizardCatalog {
        &self.catalog
    }

    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Record activity on the session.
    pub fn touch(&self) {
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_active_ms.fetch_max(elapsed, Ordering::Relaxed);
    }

    /// Time since the session was last read or changed.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_active_ms.load(Ordering::Relaxed));
        self.started.elapsed().saturating_sub(last)
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> WizardState {
        self.touch();
        self.state.lock().await.clone()
    }

    /// Apply a transition. Rejections leave the state untouched.
    pub async fn apply(&self, transition: Transition) -> TransitionOutcome {
        self.touch();
        let mut state = self.state.lock().await;
        let result = self.apply_locked(&mut state, &transition);

        match &result {
            Ok(()) => tracing::debug!(
                session_id = %self.id,
                transition = transition.name(),
                step = %state.step(),
                "Transition applied"
            ),
            Err(e) => tracing::debug!(
                session_id = %self.id,
                transition = transition.name(),
                rejection = %e,
                "Transition rejected"
            ),
        }

        TransitionOutcome {
            rejection: result.err(),
            state: state.clone(),
        }
    }

    fn apply_locked(&self, state: &mut WizardState, transition: &Transition) -> TransitionResult {
        match transition {
            Transition::SetActionType(action) => state.set_action_type(*action),
            Transition::SetSourceLocale(id) => {
                self.catalog.require_locale(*id)?;
                state.set_source_locale_id(*id)
            }
            Transition::ToggleTargetLocale(id) => {
                self.catalog.require_locale(*id)?;
                state.toggle_target_locale(*id)
            }
            Transition::SetCopyTargetLocale(id) => {
                self.catalog.require_locale(*id)?;
                state.set_copy_target_locale_id(*id)
            }
            Transition::SetInstructions(text) => state.set_instructions(text.as_str()),
            Transition::ApplyTemplate(id) => state.apply_template(self.catalog.template(*id)?),
            Transition::ToggleKey(id) => {
                self.catalog.require_key(*id)?;
                state.toggle_key_selection(*id)
            }
            Transition::Advance => state.advance(),
            Transition::GoBack => state.go_back(),
            Transition::GoToStep(step) => state.go_to_step(*step),
        }
    }

    /// Compute the work set and start the batch in the background.
    ///
    /// Returns [`PipelineError::NotReady`] when the wizard is not on a
    /// satisfied `confirm` step, and [`PipelineError::Cancelled`] once the
    /// session has been closed.
    pub async fn execute(
        self: &Arc<Self>,
        coordinator: BulkCoordinator,
        collaborators: &Collaborators,
    ) -> Result<ExecuteOutcome, PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        self.touch();
        let mut state = self.state.lock().await;
        state.clone().begin_processing(0)?;

        let plan = match plan_batch(
            &state,
            &self.catalog.locales,
            &self.catalog.keys,
            collaborators.store.as_ref(),
        )
        .await
        {
            Ok(plan) => plan,
            Err(e) => {
                let message = e.to_string();
                state.fail_to_start(message.as_str())?;
                tracing::warn!(session_id = %self.id, error = %message, "Bulk run failed to start");
                return Ok(ExecuteOutcome::FailedToStart { message });
            }
        };

        let total = plan.len();
        state.begin_processing(total)?;

        if plan.is_empty() {
            state.complete(Vec::new())?;
            tracing::info!(session_id = %self.id, "Empty work set; bulk run complete");
            return Ok(ExecuteOutcome::Started { total });
        }
        drop(state);

        let session = Arc::clone(self);
        let store = Arc::clone(&collaborators.store);
        let backend = Arc::clone(&collaborators.backend);
        tokio::spawn(async move {
            let outcome = coordinator
                .execute(&plan, store.as_ref(), backend.as_ref(), &session.cancel)
                .await;
            session.finish(outcome).await;
        });

        Ok(ExecuteOutcome::Started { total })
    }

    /// Store a finished batch unless the session has been closed.
    async fn finish(&self, outcome: Result<Vec<BulkResult>, PipelineError>) {
        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            tracing::debug!(session_id = %self.id, "Session closed; bulk results discarded");
            return;
        }
        match outcome {
            Ok(results) => {
                if let Err(e) = state.complete(results) {
                    tracing::error!(
                        session_id = %self.id,
                        error = %e,
                        "Failed to record bulk results"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    session_id = %self.id,
                    error = %e,
                    "Bulk run ended without results"
                );
            }
        }
    }

    /// Close the session, abandoning any in-flight units.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            tracing::info!(session_id = %self.id, app_id = self.app_id, "Wizard session closed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
