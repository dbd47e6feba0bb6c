//! In-process collaborators.
//!
//! Holds apps, locales, keys, values, and templates in memory. Used to
//! drive the wizard without a database.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use glossa_core::locale::{InstructionTemplate, Locale, TranslationKey};
use glossa_core::types::DbId;

use crate::collaborators::{
    InstructionTemplateSource, KeyDirectory, LocaleDirectory, TranslationStore, WriteOutcome,
};
use crate::error::BackendError;

/// A stored value and whether it awaits review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
    pub pending_review: bool,
}

#[derive(Default)]
struct Inner {
    locales: HashMap<DbId, Vec<Locale>>,
    keys: HashMap<DbId, Vec<TranslationKey>>,
    key_apps: HashMap<DbId, DbId>,
    require_review: HashMap<DbId, bool>,
    values: HashMap<(DbId, DbId), StoredValue>,
    templates: Vec<InstructionTemplate>,
}

/// Directories, store, and template source backed by in-memory maps.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enable a locale for an app. Locales list in insertion order.
    pub fn add_locale(&self, app_id: DbId, locale: Locale) {
        self.write().locales.entry(app_id).or_default().push(locale);
    }

    /// Add a key to an app. Keys list in insertion order.
    pub fn add_key(&self, app_id: DbId, key: TranslationKey) {
        let mut inner = self.write();
        inner.key_apps.insert(key.id, app_id);
        inner.keys.entry(app_id).or_default().push(key);
    }

    pub fn set_require_review(&self, app_id: DbId, require: bool) {
        self.write().require_review.insert(app_id, require);
    }

    pub fn add_template(&self, template: InstructionTemplate) {
        self.write().templates.push(template);
    }

    /// Seed a published value.
    pub fn put_value(&self, key_id: DbId, locale_id: DbId, value: &str) {
        self.write().values.insert(
            (key_id, locale_id),
            StoredValue {
                value: value.to_string(),
                pending_review: false,
            },
        );
    }

    pub fn stored(&self, key_id: DbId, locale_id: DbId) -> Option<StoredValue> {
        self.read().values.get(&(key_id, locale_id)).cloned()
    }
}

#[async_trait]
impl LocaleDirectory for MemoryCatalog {
    async fn list_locales(&self, app_id: DbId) -> Result<Vec<Locale>, BackendError> {
        Ok(self.read().locales.get(&app_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl KeyDirectory for MemoryCatalog {
    async fn list_keys(&self, app_id: DbId) -> Result<Vec<TranslationKey>, BackendError> {
        Ok(self.read().keys.get(&app_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TranslationStore for MemoryCatalog {
    async fn get_existing_value(
        &self,
        key_id: DbId,
        locale_id: DbId,
    ) -> Result<Option<String>, BackendError> {
        Ok(self
            .read()
            .values
            .get(&(key_id, locale_id))
            .map(|v| v.value.clone()))
    }

    async fn write_translation(
        &self,
        key_id: DbId,
        locale_id: DbId,
        value: &str,
        flagged: bool,
    ) -> Result<WriteOutcome, BackendError> {
        let mut inner = self.write();
        let app_id = *inner
            .key_apps
            .get(&key_id)
            .ok_or_else(|| BackendError::Content(format!("Key {key_id} no longer exists")))?;
        let pending_review =
            flagged || inner.require_review.get(&app_id).copied().unwrap_or(false);
        inner.values.insert(
            (key_id, locale_id),
            StoredValue {
                value: value.to_string(),
                pending_review,
            },
        );
        Ok(WriteOutcome {
            success: true,
            requires_review: pending_review,
        })
    }
}

#[async_trait]
impl InstructionTemplateSource for MemoryCatalog {
    async fn list_instruction_templates(&self) -> Result<Vec<InstructionTemplate>, BackendError> {
        Ok(self.read().templates.clone())
    }
}
