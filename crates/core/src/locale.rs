//! Read-only reference data the wizard works over.
//!
//! These values are supplied wholesale when a wizard session opens and are
//! never mutated by it.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// A locale enabled for an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: DbId,
    /// BCP 47 language code, e.g. `pt-BR`.
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_default: bool,
    /// Identity of the app/locale association row.
    pub app_locale_id: DbId,
    /// When the locale was added to the app.
    pub added_at: Timestamp,
}

/// A translatable key scoped to an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationKey {
    pub id: DbId,
    pub name: String,
}

/// A canned prompt that can be dropped into the instructions field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionTemplate {
    pub id: DbId,
    pub name: String,
    pub instruction: String,
}

/// Find a locale by id in a directory listing.
pub fn find_locale(locales: &[Locale], id: DbId) -> Option<&Locale> {
    locales.iter().find(|l| l.id == id)
}
