//! Work-set construction for a bulk run.
//!
//! Turns a confirmed [`WizardState`] plus the session's locale and key
//! snapshots into an ordered list of (key, locale) units. Order is
//! key-major: keys in directory order, then target locales in directory
//! order. Content-dependent filtering (fill-missing) happens in the
//! pipeline, which then calls [`WorkPlan::renumber`].

use serde::Serialize;

use crate::bulk_action::BulkActionType;
use crate::error::CoreError;
use crate::locale::{find_locale, Locale, TranslationKey};
use crate::types::DbId;
use crate::wizard_state::WizardState;

/// Upper bound on units in a single batch.
pub const MAX_WORK_SET_SIZE: usize = 10_000;

/// One (key, locale) pair to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkUnit {
    /// Submission order, zero-based.
    pub index: usize,
    pub key_id: DbId,
    pub key_name: String,
    pub locale_id: DbId,
    pub locale_code: String,
}

/// Everything the coordinator needs to run a batch.
#[derive(Debug, Clone)]
pub struct WorkPlan {
    pub action: BulkActionType,
    pub source: Locale,
    pub instructions: String,
    pub units: Vec<WorkUnit>,
}

impl WorkPlan {
    /// Build the candidate units for the wizard's current selections.
    pub fn build(
        state: &WizardState,
        locales: &[Locale],
        keys: &[TranslationKey],
    ) -> Result<Self, CoreError> {
        let action = state
            .action_type()
            .ok_or_else(|| CoreError::Validation("No bulk action selected".to_string()))?;
        let source_id = state
            .source_locale_id()
            .ok_or_else(|| CoreError::Validation("No source locale selected".to_string()))?;
        let source = find_locale(locales, source_id)
            .ok_or(CoreError::NotFound {
                entity: "Locale",
                id: source_id,
            })?
            .clone();

        let (unit_keys, unit_locales): (Vec<&TranslationKey>, Vec<&Locale>) = match action {
            BulkActionType::TranslateAll | BulkActionType::FillMissing => {
                for id in state.target_locale_ids() {
                    if find_locale(locales, *id).is_none() {
                        return Err(CoreError::NotFound {
                            entity: "Locale",
                            id: *id,
                        });
                    }
                }
                let targets = locales
                    .iter()
                    .filter(|l| state.target_locale_ids().contains(&l.id))
                    .collect();
                (keys.iter().collect(), targets)
            }
            BulkActionType::CopyLocale => {
                let target_id = state.copy_target_locale_id().ok_or_else(|| {
                    CoreError::Validation("No copy target locale selected".to_string())
                })?;
                let target = find_locale(locales, target_id).ok_or(CoreError::NotFound {
                    entity: "Locale",
                    id: target_id,
                })?;
                for id in state.selected_key_ids() {
                    if !keys.iter().any(|k| k.id == *id) {
                        return Err(CoreError::NotFound {
                            entity: "TranslationKey",
                            id: *id,
                        });
                    }
                }
                let selected = keys
                    .iter()
                    .filter(|k| state.selected_key_ids().contains(&k.id))
                    .collect();
                (selected, vec![target])
            }
        };

        let size = unit_keys.len() * unit_locales.len();
        if size > MAX_WORK_SET_SIZE {
            return Err(CoreError::Validation(format!(
                "Bulk action covers {size} units; the maximum is {MAX_WORK_SET_SIZE}"
            )));
        }

        let mut units = Vec::with_capacity(size);
        for key in &unit_keys {
            for locale in &unit_locales {
                units.push(WorkUnit {
                    index: units.len(),
                    key_id: key.id,
                    key_name: key.name.clone(),
                    locale_id: locale.id,
                    locale_code: locale.code.clone(),
                });
            }
        }

        Ok(Self {
            action,
            source,
            instructions: state.instructions().to_string(),
            units,
        })
    }

    /// Reassign `index` after units have been filtered out.
    pub fn renumber(&mut self) {
        for (i, unit) in self.units.iter_mut().enumerate() {
            unit.index = i;
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Whether an existing value counts as present for fill-missing.
pub fn has_content(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
