//! Glossa API server library.
//!
//! Exposes the building blocks (config, state, error handling, session
//! registry, routes, background tasks) so integration tests and the binary entrypoint share
//! them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod sessions;
pub mod state;
