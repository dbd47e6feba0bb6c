//! Repository for the `app_locales` table.

use glossa_core::types::DbId;
use sqlx::PgPool;

use crate::models::app_locale::AppLocaleRow;

/// Locales enabled per app.
pub struct AppLocaleRepo;

impl AppLocaleRepo {
    /// List the locales enabled for an app.
    ///
    /// The default locale comes first, then locales in the order they were
    /// added to the app.
    pub async fn list_for_app(
        pool: &PgPool,
        app_id: DbId,
    ) -> Result<Vec<AppLocaleRow>, sqlx::Error> {
        sqlx::query_as::<_, AppLocaleRow>(
            "SELECT al.id AS app_locale_id, l.id AS locale_id, l.code, l.name, \
                    l.native_name, al.is_default, al.created_at AS added_at \
             FROM app_locales al \
             JOIN locales l ON l.id = al.locale_id \
             WHERE al.app_id = $1 \
             ORDER BY al.is_default DESC, al.created_at ASC, al.id ASC",
        )
        .bind(app_id)
        .fetch_all(pool)
        .await
    }
}
