//! Contracts the wizard consumes from the rest of the system.
//!
//! Implementations: [`crate::store::PgCatalog`] (PostgreSQL),
//! [`crate::generation::HttpGenerationBackend`] (remote generation
//! service), and [`crate::memory::MemoryCatalog`] (in-process).

use std::sync::Arc;

use async_trait::async_trait;
use glossa_core::locale::{InstructionTemplate, Locale, TranslationKey};
use glossa_core::types::DbId;
use glossa_core::work_set::WorkUnit;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Value produced by the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    pub value: String,
    #[serde(default)]
    pub requires_review: bool,
}

/// Value read from the source locale for a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedValue {
    pub value: String,
}

/// Outcome of persisting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub success: bool,
    pub requires_review: bool,
}

/// Ordered locales enabled for an app.
#[async_trait]
pub trait LocaleDirectory: Send + Sync {
    async fn list_locales(&self, app_id: DbId) -> Result<Vec<Locale>, BackendError>;
}

/// Keys belonging to an app.
#[async_trait]
pub trait KeyDirectory: Send + Sync {
    async fn list_keys(&self, app_id: DbId) -> Result<Vec<TranslationKey>, BackendError>;
}

/// Stored translation values.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// The current value for a (key, locale) pair, if any.
    async fn get_existing_value(
        &self,
        key_id: DbId,
        locale_id: DbId,
    ) -> Result<Option<String>, BackendError>;

    /// Persist a value. `flagged` marks a value its producer wants reviewed.
    async fn write_translation(
        &self,
        key_id: DbId,
        locale_id: DbId,
        value: &str,
        flagged: bool,
    ) -> Result<WriteOutcome, BackendError>;
}

/// Produces values for units: by generation or by copying.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate the unit's value in its target locale from `source`.
    async fn generate(
        &self,
        unit: &WorkUnit,
        source: &Locale,
        instructions: &str,
    ) -> Result<Generated, BackendError>;

    /// Read the unit's key value in `source` for copying into the target.
    async fn copy_value(&self, unit: &WorkUnit, source: &Locale)
        -> Result<CopiedValue, BackendError>;
}

/// Canned instruction prompts.
#[async_trait]
pub trait InstructionTemplateSource: Send + Sync {
    async fn list_instruction_templates(&self) -> Result<Vec<InstructionTemplate>, BackendError>;
}

/// Every collaborator a wizard session needs, behind shared handles.
#[derive(Clone)]
pub struct Collaborators {
    pub locales: Arc<dyn LocaleDirectory>,
    pub keys: Arc<dyn KeyDirectory>,
    pub store: Arc<dyn TranslationStore>,
    pub backend: Arc<dyn GenerationBackend>,
    pub templates: Arc<dyn InstructionTemplateSource>,
}
