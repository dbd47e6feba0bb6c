//! Route definitions for instruction templates.
//!
//! Mounted at `/instruction-templates` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::instruction_templates;
use crate::state::AppState;

/// Instruction template routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(instruction_templates::list_templates))
}
