//! Builds the work plan for a confirmed wizard.

use glossa_core::bulk_action::BulkActionType;
use glossa_core::locale::{Locale, TranslationKey};
use glossa_core::wizard_state::WizardState;
use glossa_core::work_set::{has_content, WorkPlan};

use crate::collaborators::TranslationStore;
use crate::error::PipelineError;

/// Compute the work plan for `state`.
///
/// For fill-missing, each candidate unit is checked against the store and
/// dropped when it already has a non-blank value.
pub async fn plan_batch(
    state: &WizardState,
    locales: &[Locale],
    keys: &[TranslationKey],
    store: &dyn TranslationStore,
) -> Result<WorkPlan, PipelineError> {
    let mut plan = WorkPlan::build(state, locales, keys)?;

    if plan.action == BulkActionType::FillMissing {
        let candidates = plan.units.len();
        let mut kept = Vec::with_capacity(candidates);
        for unit in plan.units.drain(..) {
            let existing = store
                .get_existing_value(unit.key_id, unit.locale_id)
                .await
                .map_err(PipelineError::Lookup)?;
            if !has_content(existing.as_deref()) {
                kept.push(unit);
            }
        }
        plan.units = kept;
        plan.renumber();
        tracing::debug!(
            candidates,
            missing = plan.len(),
            "Filtered fill-missing work set"
        );
    }

    Ok(plan)
}
