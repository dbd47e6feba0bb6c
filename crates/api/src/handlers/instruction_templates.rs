//! Handlers for instruction templates.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use glossa_pipeline::error::PipelineError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /instruction-templates
pub async fn list_templates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = state
        .services
        .templates
        .list_instruction_templates()
        .await
        .map_err(PipelineError::Catalog)?;
    Ok(Json(DataResponse { data: templates }))
}
