//! Per-step gates deciding whether "Next" is enabled.

use crate::bulk_action::StepType;
use crate::wizard_state::WizardState;

/// Whether the data owned by `step` is complete in `state`.
///
/// `processing` never passes: only the execution coordinator leaves it.
pub fn step_gate(state: &WizardState, step: StepType) -> bool {
    match step {
        StepType::Action => state.action_type().is_some(),
        StepType::Source => state.source_locale_id().is_some(),
        StepType::Targets => !state.target_locale_ids().is_empty(),
        StepType::CopyTarget => state.copy_target_locale_id().is_some(),
        StepType::Instructions => true,
        StepType::KeySelection => !state.selected_key_ids().is_empty(),
        StepType::Confirm => true,
        StepType::Processing => false,
    }
}

/// Whether the user may advance from the current step.
pub fn can_advance(state: &WizardState) -> bool {
    step_gate(state, state.step())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
