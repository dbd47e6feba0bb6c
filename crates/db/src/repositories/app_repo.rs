//! Repository for the `apps` table.

use glossa_core::types::DbId;
use sqlx::PgPool;

/// Read access to apps.
pub struct AppRepo;

impl AppRepo {
    /// Review policy of the app owning `key_id`.
    ///
    /// Returns `None` if the key does not exist.
    pub async fn require_review_for_key(
        pool: &PgPool,
        key_id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT a.require_review FROM translation_keys k \
             JOIN apps a ON a.id = k.app_id \
             WHERE k.id = $1",
        )
        .bind(key_id)
        .fetch_optional(pool)
        .await
    }
}
