//! Domain logic for the bulk translation-action wizard.
//!
//! Everything in this crate is pure: no database, no network, no clock.
//! The `db`, `pipeline`, and `api` crates feed it data and apply the
//! transitions it computes.

pub mod bulk_action;
pub mod bulk_result;
pub mod error;
pub mod locale;
pub mod types;
pub mod wizard_gate;
pub mod wizard_state;
pub mod wizard_steps;
pub mod work_set;
