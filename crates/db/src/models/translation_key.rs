//! Translation key entity model.

use glossa_core::locale::TranslationKey;
use glossa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `translation_keys` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TranslationKeyRow {
    pub id: DbId,
    pub app_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

impl From<TranslationKeyRow> for TranslationKey {
    fn from(row: TranslationKeyRow) -> Self {
        TranslationKey {
            id: row.id,
            name: row.name,
        }
    }
}
