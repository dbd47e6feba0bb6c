//! Execution side of the bulk action wizard.
//!
//! Holds the collaborator contracts the wizard runs against, the
//! coordinator that fans a batch out with bounded concurrency, and the
//! per-session runtime that ties a [`glossa_core::wizard_state::WizardState`]
//! to its cancellation scope.

pub mod collaborators;
pub mod coordinator;
pub mod error;
pub mod generation;
pub mod memory;
pub mod planner;
pub mod session;
pub mod store;
