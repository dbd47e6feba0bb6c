//! Generation backend over HTTP.
//!
//! Generation is delegated to an external service at
//! `{base_url}/v1/translate`. Copies never leave the process: the source
//! value is read from the translation store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glossa_core::locale::Locale;
use glossa_core::work_set::{has_content, WorkUnit};
use serde::Serialize;

use crate::collaborators::{CopiedValue, GenerationBackend, Generated, TranslationStore};
use crate::error::BackendError;

/// Path of the translate endpoint, relative to the base URL.
const TRANSLATE_PATH: &str = "/v1/translate";

/// Request body sent to the generation service.
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    key: &'a str,
    source_locale: &'a str,
    target_locale: &'a str,
    source_text: &'a str,
    instructions: &'a str,
}

/// Client for the remote generation service.
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    endpoint: String,
    store: Arc<dyn TranslationStore>,
}

impl HttpGenerationBackend {
    /// Build a client with a per-request timeout.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn TranslationStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{TRANSLATE_PATH}", base_url.trim_end_matches('/')),
            store,
        })
    }

    /// The unit's value in the source locale, or a content error naming it.
    async fn source_text(&self, unit: &WorkUnit, source: &Locale) -> Result<String, BackendError> {
        let value = self
            .store
            .get_existing_value(unit.key_id, source.id)
            .await?;
        if !has_content(value.as_deref()) {
            return Err(BackendError::Content(format!(
                "'{}' has no value in source locale '{}'",
                unit.key_name, source.code
            )));
        }
        Ok(value.unwrap_or_default())
    }
}

/// Connection-level failures mean the service is gone for every unit.
fn classify(err: reqwest::Error) -> BackendError {
    if err.is_connect() || err.is_timeout() {
        BackendError::Unreachable(err.to_string())
    } else {
        BackendError::Content(err.to_string())
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate(
        &self,
        unit: &WorkUnit,
        source: &Locale,
        instructions: &str,
    ) -> Result<Generated, BackendError> {
        let source_text = self.source_text(unit, source).await?;
        let body = TranslateRequest {
            key: &unit.key_name,
            source_locale: &source.code,
            target_locale: &unit.locale_code,
            source_text: &source_text,
            instructions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BackendError::Content(format!(
                "Generation service returned {status}: {}",
                detail.trim()
            )));
        }

        let generated: Generated = response.json().await.map_err(classify)?;
        if generated.value.trim().is_empty() {
            return Err(BackendError::Content(
                "Generation service returned an empty value".to_string(),
            ));
        }
        Ok(generated)
    }

    async fn copy_value(
        &self,
        unit: &WorkUnit,
        source: &Locale,
    ) -> Result<CopiedValue, BackendError> {
        let value = self.source_text(unit, source).await?;
        Ok(CopiedValue { value })
    }
}
