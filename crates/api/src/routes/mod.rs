pub mod bulk_sessions;
pub mod health;
pub mod instruction_templates;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /instruction-templates                            list templates (GET)
///
/// /apps/{app_id}/bulk-sessions                      open a wizard (POST)
///
/// /bulk-sessions/{id}                               view, close (GET, DELETE)
/// /bulk-sessions/{id}/action                        set action type (PUT)
/// /bulk-sessions/{id}/source                        set source locale (PUT)
/// /bulk-sessions/{id}/targets/{locale_id}           toggle target locale (POST)
/// /bulk-sessions/{id}/copy-target                   set copy target (PUT)
/// /bulk-sessions/{id}/instructions                  set text or apply template (PUT)
/// /bulk-sessions/{id}/keys/{key_id}                 toggle key selection (POST)
/// /bulk-sessions/{id}/advance                       next step (POST)
/// /bulk-sessions/{id}/go-back                       previous step (POST)
/// /bulk-sessions/{id}/go-to                         jump to step (POST)
/// /bulk-sessions/{id}/execute                       start the bulk run (POST)
/// /bulk-sessions/{id}/results                       results and summary (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/instruction-templates",
            instruction_templates::router(),
        )
        .route(
            "/apps/{app_id}/bulk-sessions",
            post(handlers::bulk_sessions::open_session),
        )
        .nest("/bulk-sessions", bulk_sessions::router())
}
