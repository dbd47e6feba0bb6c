//! Repository for the `translation_keys` table.

use glossa_core::types::DbId;
use sqlx::PgPool;

use crate::models::translation_key::TranslationKeyRow;

/// Column list for `translation_keys` queries.
const COLUMNS: &str = "id, app_id, name, description, created_at";

/// Read access to translation keys.
pub struct TranslationKeyRepo;

impl TranslationKeyRepo {
    /// List every key of an app, ordered by name.
    pub async fn list_for_app(
        pool: &PgPool,
        app_id: DbId,
    ) -> Result<Vec<TranslationKeyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM translation_keys \
             WHERE app_id = $1 \
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, TranslationKeyRow>(&query)
            .bind(app_id)
            .fetch_all(pool)
            .await
    }
}
