//! App/locale association joined with the locale it points at.

use glossa_core::locale::Locale;
use glossa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `app_locales` joined with `locales`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppLocaleRow {
    pub app_locale_id: DbId,
    pub locale_id: DbId,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_default: bool,
    pub added_at: Timestamp,
}

impl From<AppLocaleRow> for Locale {
    fn from(row: AppLocaleRow) -> Self {
        Locale {
            id: row.locale_id,
            code: row.code,
            name: row.name,
            native_name: row.native_name,
            is_default: row.is_default,
            app_locale_id: row.app_locale_id,
            added_at: row.added_at,
        }
    }
}
