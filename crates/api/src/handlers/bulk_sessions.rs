//! Handlers for the bulk action wizard.
//!
//! Each open wizard lives in the in-memory session registry. Transition
//! endpoints always answer `200`: a rejected transition comes back as
//! `applied: false` with the reason, and the unchanged session view.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use glossa_core::bulk_action::{BulkActionType, StepType};
use glossa_core::bulk_result::{BulkResult, BulkResultSummary};
use glossa_core::error::CoreError;
use glossa_core::types::{DbId, Timestamp};
use glossa_core::wizard_gate;
use glossa_core::wizard_state::{ExecutionStatus, WizardState};
use glossa_pipeline::session::{ExecuteOutcome, Transition, WizardCatalog, WizardSession};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetActionRequest {
    pub action_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SetLocaleRequest {
    pub locale_id: DbId,
}

/// Exactly one of `instructions` or `template_id` must be given.
#[derive(Debug, Deserialize)]
pub struct SetInstructionsRequest {
    pub instructions: Option<String>,
    pub template_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct GoToStepRequest {
    pub step: String,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A step in the current sequence.
#[derive(Debug, Serialize)]
pub struct StepView {
    pub step: StepType,
    pub label: &'static str,
}

/// An entry in the action picker.
#[derive(Debug, Serialize)]
pub struct ActionView {
    pub action_type: BulkActionType,
    pub label: &'static str,
    pub description: &'static str,
}

impl ActionView {
    fn all() -> Vec<Self> {
        BulkActionType::ALL
            .into_iter()
            .map(|action| Self {
                action_type: action,
                label: action.label(),
                description: action.description(),
            })
            .collect()
    }
}

/// Everything a presentation adapter needs to render the wizard.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub app_id: DbId,
    pub opened_at: Timestamp,
    #[serde(flatten)]
    pub state: WizardState,
    pub step_label: &'static str,
    pub sequence: Vec<StepView>,
    pub can_advance: bool,
    pub ready_to_execute: bool,
    pub summary: BulkResultSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<WizardCatalog>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionView>,
}

impl SessionView {
    fn new(session: &WizardSession, state: WizardState) -> Self {
        Self {
            id: session.id(),
            app_id: session.app_id(),
            opened_at: session.opened_at(),
            step_label: state.step().label(),
            sequence: state
                .steps()
                .iter()
                .map(|s| StepView {
                    step: *s,
                    label: s.label(),
                })
                .collect(),
            can_advance: wizard_gate::can_advance(&state),
            ready_to_execute: state.ready_to_execute(),
            summary: BulkResultSummary::from_results(state.results()),
            catalog: None,
            actions: Vec::new(),
            state,
        }
    }

    fn with_catalog(mut self, session: &WizardSession) -> Self {
        self.catalog = Some(session.catalog().clone());
        self.actions = ActionView::all();
        self
    }
}

/// Response for every transition endpoint.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub applied: bool,
    pub rejection: Option<String>,
    pub session: SessionView,
}

/// Response for `execute`.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub started: bool,
    pub total: Option<usize>,
    pub session: SessionView,
}

/// Response for `results`.
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub execution: ExecutionStatus,
    pub summary: BulkResultSummary,
    pub results: Vec<BulkResult>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_session(state: &AppState, id: Uuid) -> AppResult<Arc<WizardSession>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or(AppError::SessionNotFound(id))
}

async fn transition(
    state: &AppState,
    id: Uuid,
    transition: Transition,
) -> AppResult<Json<DataResponse<TransitionResponse>>> {
    let session = find_session(state, id).await?;
    let outcome = session.apply(transition).await;

    Ok(Json(DataResponse {
        data: TransitionResponse {
            applied: outcome.applied(),
            rejection: outcome.rejection.as_ref().map(ToString::to_string),
            session: SessionView::new(&session, outcome.state),
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /apps/{app_id}/bulk-sessions
// ---------------------------------------------------------------------------

/// Open a wizard for an app.
///
/// An app with no enabled locales (including one that does not exist) has
/// nothing to run a wizard over and answers `404`.
pub async fn open_session(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = WizardSession::open(app_id, &state.services).await?;
    if session.catalog().locales.is_empty() {
        session.close();
        return Err(AppError::Core(CoreError::NotFound {
            entity: "App",
            id: app_id,
        }));
    }

    state.sessions.insert(Arc::clone(&session)).await;
    let view = SessionView::new(&session, session.snapshot().await).with_catalog(&session);

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /bulk-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let view = SessionView::new(&session, session.snapshot().await).with_catalog(&session);
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// DELETE /bulk-sessions/{id}
// ---------------------------------------------------------------------------

/// Close a wizard. Units still in flight are abandoned.
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.sessions.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Field setters
// ---------------------------------------------------------------------------

/// PUT /bulk-sessions/{id}/action
pub async fn set_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActionRequest>,
) -> AppResult<impl IntoResponse> {
    let action = BulkActionType::from_str_value(&body.action_type)?;
    transition(&state, id, Transition::SetActionType(action)).await
}

/// PUT /bulk-sessions/{id}/source
pub async fn set_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetLocaleRequest>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::SetSourceLocale(body.locale_id)).await
}

/// POST /bulk-sessions/{id}/targets/{locale_id}
pub async fn toggle_target(
    State(state): State<AppState>,
    Path((id, locale_id)): Path<(Uuid, DbId)>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::ToggleTargetLocale(locale_id)).await
}

/// PUT /bulk-sessions/{id}/copy-target
pub async fn set_copy_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetLocaleRequest>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::SetCopyTargetLocale(body.locale_id)).await
}

/// PUT /bulk-sessions/{id}/instructions
pub async fn set_instructions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetInstructionsRequest>,
) -> AppResult<impl IntoResponse> {
    let op = match (body.instructions, body.template_id) {
        (Some(text), None) => Transition::SetInstructions(text),
        (None, Some(template_id)) => Transition::ApplyTemplate(template_id),
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of 'instructions' or 'template_id'".to_string(),
            ))
        }
    };
    transition(&state, id, op).await
}

/// POST /bulk-sessions/{id}/keys/{key_id}
pub async fn toggle_key(
    State(state): State<AppState>,
    Path((id, key_id)): Path<(Uuid, DbId)>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::ToggleKey(key_id)).await
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /bulk-sessions/{id}/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::Advance).await
}

/// POST /bulk-sessions/{id}/go-back
pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, Transition::GoBack).await
}

/// POST /bulk-sessions/{id}/go-to
pub async fn go_to_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GoToStepRequest>,
) -> AppResult<impl IntoResponse> {
    let step = StepType::from_str_value(&body.step)?;
    transition(&state, id, Transition::GoToStep(step)).await
}

// ---------------------------------------------------------------------------
// POST /bulk-sessions/{id}/execute
// ---------------------------------------------------------------------------

/// Start the bulk run.
///
/// `202` once the batch has begun. `200` when the work set could not be
/// computed; the view then carries the failure in `execution`.
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let outcome = session.execute(state.coordinator, &state.services).await?;
    let view = SessionView::new(&session, session.snapshot().await);

    let (status, started, total) = match outcome {
        ExecuteOutcome::Started { total } => {
            tracing::info!(session_id = %id, total, "Bulk run accepted");
            (StatusCode::ACCEPTED, true, Some(total))
        }
        ExecuteOutcome::FailedToStart { .. } => (StatusCode::OK, false, None),
    };

    Ok((
        status,
        Json(DataResponse {
            data: ExecuteResponse {
                started,
                total,
                session: view,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /bulk-sessions/{id}/results
// ---------------------------------------------------------------------------

pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let wizard = session.snapshot().await;

    Ok(Json(DataResponse {
        data: ResultsResponse {
            execution: wizard.execution().clone(),
            summary: BulkResultSummary::from_results(wizard.results()),
            results: wizard.results().to_vec(),
        },
    }))
}
