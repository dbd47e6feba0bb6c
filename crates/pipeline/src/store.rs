//! PostgreSQL-backed collaborators.

use async_trait::async_trait;
use glossa_core::locale::{InstructionTemplate, Locale, TranslationKey};
use glossa_core::types::DbId;
use glossa_db::models::translation::TranslationStatus;
use glossa_db::repositories::{
    AppLocaleRepo, AppRepo, InstructionTemplateRepo, TranslationKeyRepo, TranslationRepo,
};
use glossa_db::DbPool;

use crate::collaborators::{
    InstructionTemplateSource, KeyDirectory, LocaleDirectory, TranslationStore, WriteOutcome,
};
use crate::error::BackendError;

/// Locale and key directories, translation store, and template source
/// over one connection pool.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocaleDirectory for PgCatalog {
    async fn list_locales(&self, app_id: DbId) -> Result<Vec<Locale>, BackendError> {
        let rows = AppLocaleRepo::list_for_app(&self.pool, app_id).await?;
        Ok(rows.into_iter().map(Locale::from).collect())
    }
}

#[async_trait]
impl KeyDirectory for PgCatalog {
    async fn list_keys(&self, app_id: DbId) -> Result<Vec<TranslationKey>, BackendError> {
        let rows = TranslationKeyRepo::list_for_app(&self.pool, app_id).await?;
        Ok(rows.into_iter().map(TranslationKey::from).collect())
    }
}

#[async_trait]
impl TranslationStore for PgCatalog {
    async fn get_existing_value(
        &self,
        key_id: DbId,
        locale_id: DbId,
    ) -> Result<Option<String>, BackendError> {
        Ok(TranslationRepo::find_value(&self.pool, key_id, locale_id).await?)
    }

    async fn write_translation(
        &self,
        key_id: DbId,
        locale_id: DbId,
        value: &str,
        flagged: bool,
    ) -> Result<WriteOutcome, BackendError> {
        let require_review = AppRepo::require_review_for_key(&self.pool, key_id)
            .await?
            .ok_or_else(|| BackendError::Content(format!("Key {key_id} no longer exists")))?;
        let status = TranslationStatus::for_write(require_review, flagged);

        let row = TranslationRepo::upsert(&self.pool, key_id, locale_id, value, status).await?;
        tracing::debug!(
            translation_id = row.id,
            key_id,
            locale_id,
            status = status.as_str(),
            "Translation written"
        );

        Ok(WriteOutcome {
            success: true,
            requires_review: status.requires_review(),
        })
    }
}

#[async_trait]
impl InstructionTemplateSource for PgCatalog {
    async fn list_instruction_templates(&self) -> Result<Vec<InstructionTemplate>, BackendError> {
        let rows = InstructionTemplateRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(InstructionTemplate::from).collect())
    }
}
