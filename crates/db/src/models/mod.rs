//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus conversions into `glossa_core` types where the
//! wizard consumes them.

pub mod app_locale;
pub mod instruction_template;
pub mod translation;
pub mod translation_key;
