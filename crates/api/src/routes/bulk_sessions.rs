//! Route definitions for bulk action wizard sessions.
//!
//! Mounted at `/bulk-sessions` by `api_routes()`.
//!
//! ```text
//! GET    /{id}                          get_session
//! DELETE /{id}                          close_session
//! PUT    /{id}/action                   set_action
//! PUT    /{id}/source                   set_source
//! POST   /{id}/targets/{locale_id}      toggle_target
//! PUT    /{id}/copy-target              set_copy_target
//! PUT    /{id}/instructions             set_instructions
//! POST   /{id}/keys/{key_id}            toggle_key
//! POST   /{id}/advance                  advance
//! POST   /{id}/go-back                  go_back
//! POST   /{id}/go-to                    go_to_step
//! POST   /{id}/execute                  execute
//! GET    /{id}/results                  get_results
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::bulk_sessions;
use crate::state::AppState;

/// Wizard session routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(bulk_sessions::get_session).delete(bulk_sessions::close_session),
        )
        .route("/{id}/action", put(bulk_sessions::set_action))
        .route("/{id}/source", put(bulk_sessions::set_source))
        .route(
            "/{id}/targets/{locale_id}",
            post(bulk_sessions::toggle_target),
        )
        .route("/{id}/copy-target", put(bulk_sessions::set_copy_target))
        .route("/{id}/instructions", put(bulk_sessions::set_instructions))
        .route("/{id}/keys/{key_id}", post(bulk_sessions::toggle_key))
        .route("/{id}/advance", post(bulk_sessions::advance))
        .route("/{id}/go-back", post(bulk_sessions::go_back))
        .route("/{id}/go-to", post(bulk_sessions::go_to_step))
        .route("/{id}/execute", post(bulk_sessions::execute))
        .route("/{id}/results", get(bulk_sessions::get_results))
}
