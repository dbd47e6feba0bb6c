//! Repository for the `translations` table.

use glossa_core::types::DbId;
use sqlx::PgPool;

use crate::models::translation::{Translation, TranslationStatus};

/// Column list for `translations` queries.
const COLUMNS: &str = "id, key_id, locale_id, value, status, created_at, updated_at";

/// Read/write access to translation values.
pub struct TranslationRepo;

impl TranslationRepo {
    /// The stored value for a (key, locale) pair, if any.
    pub async fn find_value(
        pool: &PgPool,
        key_id: DbId,
        locale_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM translations WHERE key_id = $1 AND locale_id = $2",
        )
        .bind(key_id)
        .bind(locale_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert or replace the value for a (key, locale) pair.
    pub async fn upsert(
        pool: &PgPool,
        key_id: DbId,
        locale_id: DbId,
        value: &str,
        status: TranslationStatus,
    ) -> Result<Translation, sqlx::Error> {
        let query = format!(
            "INSERT INTO translations (key_id, locale_id, value, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (key_id, locale_id) \
             DO UPDATE SET value = EXCLUDED.value, status = EXCLUDED.status, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(key_id)
            .bind(locale_id)
            .bind(value)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }
}
