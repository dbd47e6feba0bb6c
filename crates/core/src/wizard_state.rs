//! The wizard state store.
//!
//! [`WizardState`] is the single source of truth for one open wizard. Every
//! mutation goes through a method that either applies completely or returns
//! a [`TransitionError`] and leaves the state untouched, so callers can
//! disable a control instead of failing the whole request.
//!
//! Invariants maintained here:
//! - `step` is always a member of `sequence_for(action_type)`.
//! - `target_locale_ids` never contains `source_locale_id`.
//! - `copy_target_locale_id` never equals `source_locale_id`.
//! - `results` is written exactly once, by [`WizardState::complete`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::bulk_action::{BulkActionType, StepType};
use crate::bulk_result::BulkResult;
use crate::locale::InstructionTemplate;
use crate::types::DbId;
use crate::wizard_gate;
use crate::wizard_steps::{self, SequenceError};

// ---------------------------------------------------------------------------
// Execution status
// ---------------------------------------------------------------------------

/// Where the wizard is in executing its batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Nothing has been run yet.
    Idle,
    /// The batch is running; `total` is the work-set size.
    Running { total: usize },
    /// Every unit has produced a result.
    Completed,
    /// The batch could not begin. The wizard stays on `confirm`.
    Failed { message: String },
}

impl ExecutionStatus {
    /// While running or completed the wizard accepts no user input.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Running { .. } | Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Transition errors
// ---------------------------------------------------------------------------

/// Why a transition was rejected. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("The wizard is processing or finished; close it to start over")]
    Locked,

    #[error("Locale {0} is the source locale")]
    SourceConflict(DbId),

    #[error("Locale {0} is not enabled for this app")]
    UnknownLocale(DbId),

    #[error("Key {0} does not belong to this app")]
    UnknownKey(DbId),

    #[error("Instruction template {0} does not exist")]
    UnknownTemplate(DbId),

    #[error("Step '{0}' is not part of the current sequence")]
    StepNotInSequence(StepType),

    #[error("Step '{step}' is not reachable until '{blocked_at}' is complete")]
    Unreachable { step: StepType, blocked_at: StepType },

    #[error("Step '{0}' is not complete")]
    GateNotSatisfied(StepType),

    #[error("The processing step is entered only by executing the batch")]
    ProcessingNotEnterable,

    #[error("The wizard must be on the confirm step, currently on '{0}'")]
    NotAtConfirm(StepType),

    #[error("No batch is running")]
    NotRunning,

    #[error(transparent)]
    Boundary(#[from] SequenceError),
}

/// Result alias for transitions.
pub type TransitionResult = Result<(), TransitionError>;

// ---------------------------------------------------------------------------
// WizardState
// ---------------------------------------------------------------------------

/// State of one bulk action wizard, owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    step: StepType,
    action_type: Option<BulkActionType>,
    source_locale_id: Option<DbId>,
    target_locale_ids: BTreeSet<DbId>,
    copy_target_locale_id: Option<DbId>,
    instructions: String,
    selected_key_ids: BTreeSet<DbId>,
    results: Vec<BulkResult>,
    execution: ExecutionStatus,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    /// A fresh wizard: no action, every field at its default.
    pub fn new() -> Self {
        Self {
            step: wizard_steps::first_step(None),
            action_type: None,
            source_locale_id: None,
            target_locale_ids: BTreeSet::new(),
            copy_target_locale_id: None,
            instructions: String::new(),
            selected_key_ids: BTreeSet::new(),
            results: Vec::new(),
            execution: ExecutionStatus::Idle,
        }
    }

    // -- accessors --

    pub fn step(&self) -> StepType {
        self.step
    }

    pub fn action_type(&self) -> Option<BulkActionType> {
        self.action_type
    }

    pub fn source_locale_id(&self) -> Option<DbId> {
        self.source_locale_id
    }

    pub fn target_locale_ids(&self) -> &BTreeSet<DbId> {
        &self.target_locale_ids
    }

    pub fn copy_target_locale_id(&self) -> Option<DbId> {
        self.copy_target_locale_id
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn selected_key_ids(&self) -> &BTreeSet<DbId> {
        &self.selected_key_ids
    }

    pub fn results(&self) -> &[BulkResult] {
        &self.results
    }

    pub fn execution(&self) -> &ExecutionStatus {
        &self.execution
    }

    /// The ordered steps for the current action.
    pub fn steps(&self) -> &'static [StepType] {
        wizard_steps::sequence_for(self.action_type)
    }

    // -- setters --

    /// Choose the bulk action. Resets the step and clears every downstream
    /// selection, since none of it is guaranteed valid for the new action.
    pub fn set_action_type(&mut self, action: BulkActionType) -> TransitionResult {
        self.ensure_unlocked()?;
        *self = Self {
            step: wizard_steps::first_step(Some(action)),
            action_type: Some(action),
            ..Self::new()
        };
        Ok(())
    }

    /// Choose the source locale, dropping it from the target fields.
    pub fn set_source_locale_id(&mut self, id: DbId) -> TransitionResult {
        self.ensure_unlocked()?;
        self.source_locale_id = Some(id);
        self.target_locale_ids.remove(&id);
        if self.copy_target_locale_id == Some(id) {
            self.copy_target_locale_id = None;
        }
        self.touch();
        Ok(())
    }

    /// Add or remove a target locale. The source locale is never a target.
    pub fn toggle_target_locale(&mut self, id: DbId) -> TransitionResult {
        self.ensure_unlocked()?;
        if self.source_locale_id == Some(id) {
            return Err(TransitionError::SourceConflict(id));
        }
        if !self.target_locale_ids.remove(&id) {
            self.target_locale_ids.insert(id);
        }
        self.touch();
        Ok(())
    }

    /// Choose the single locale a copy writes into.
    pub fn set_copy_target_locale_id(&mut self, id: DbId) -> TransitionResult {
        self.ensure_unlocked()?;
        if self.source_locale_id == Some(id) {
            return Err(TransitionError::SourceConflict(id));
        }
        self.copy_target_locale_id = Some(id);
        self.touch();
        Ok(())
    }

    /// Replace the free-text instructions verbatim.
    pub fn set_instructions(&mut self, text: impl Into<String>) -> TransitionResult {
        self.ensure_unlocked()?;
        self.instructions = text.into();
        self.touch();
        Ok(())
    }

    /// Replace the instructions with a template's text.
    pub fn apply_template(&mut self, template: &InstructionTemplate) -> TransitionResult {
        self.set_instructions(template.instruction.clone())
    }

    /// Add or remove a key from the explicit selection.
    pub fn toggle_key_selection(&mut self, id: DbId) -> TransitionResult {
        self.ensure_unlocked()?;
        if !self.selected_key_ids.remove(&id) {
            self.selected_key_ids.insert(id);
        }
        self.touch();
        Ok(())
    }

    // -- navigation --

    /// Move to the next step if the current one passes its gate.
    ///
    /// Every earlier gate is re-checked too: setters may run on any step, so
    /// an upstream selection can have been emptied after it was passed.
    pub fn advance(&mut self) -> TransitionResult {
        self.ensure_unlocked()?;
        if self.step == StepType::Confirm {
            return Err(TransitionError::ProcessingNotEnterable);
        }
        let next = wizard_steps::next(self.action_type, self.step)?;
        if let Some(blocked) = self.first_unsatisfied_before(next) {
            return Err(TransitionError::GateNotSatisfied(blocked));
        }
        self.step = next;
        self.touch();
        Ok(())
    }

    /// Move to the previous step. Never gated.
    pub fn go_back(&mut self) -> TransitionResult {
        self.ensure_unlocked()?;
        self.step = wizard_steps::previous(self.action_type, self.step)?;
        self.touch();
        Ok(())
    }

    /// Jump to any reachable step.
    ///
    /// Backward jumps are always reachable. A forward jump is reachable when
    /// every step before the target passes its gate.
    pub fn go_to_step(&mut self, step: StepType) -> TransitionResult {
        self.ensure_unlocked()?;
        if step == StepType::Processing {
            return Err(TransitionError::ProcessingNotEnterable);
        }
        let target = wizard_steps::position(self.action_type, step)
            .ok_or(TransitionError::StepNotInSequence(step))?;
        let current = wizard_steps::position(self.action_type, self.step).unwrap_or(0);
        if target > current {
            if let Some(blocked_at) = self.first_unsatisfied_before(step) {
                return Err(TransitionError::Unreachable { step, blocked_at });
            }
        }
        self.step = step;
        self.touch();
        Ok(())
    }

    // -- execution --

    /// Whether the wizard sits on `confirm` with every upstream gate passed.
    pub fn ready_to_execute(&self) -> bool {
        self.step == StepType::Confirm
            && !self.execution.is_locked()
            && self.first_unsatisfied_before(StepType::Confirm).is_none()
    }

    /// Enter `processing` for a batch of `total` units.
    pub fn begin_processing(&mut self, total: usize) -> TransitionResult {
        self.ensure_unlocked()?;
        if self.step != StepType::Confirm {
            return Err(TransitionError::NotAtConfirm(self.step));
        }
        if let Some(blocked) = self.first_unsatisfied_before(StepType::Confirm) {
            return Err(TransitionError::GateNotSatisfied(blocked));
        }
        self.step = StepType::Processing;
        self.results.clear();
        self.execution = ExecutionStatus::Running { total };
        Ok(())
    }

    /// Store the final result set. Accepted once per run.
    pub fn complete(&mut self, results: Vec<BulkResult>) -> TransitionResult {
        if !matches!(self.execution, ExecutionStatus::Running { .. }) {
            return Err(TransitionError::NotRunning);
        }
        self.results = results;
        self.execution = ExecutionStatus::Completed;
        Ok(())
    }

    /// Record that the batch could not begin. The wizard stays on `confirm`.
    pub fn fail_to_start(&mut self, message: impl Into<String>) -> TransitionResult {
        self.ensure_unlocked()?;
        if self.step != StepType::Confirm {
            return Err(TransitionError::NotAtConfirm(self.step));
        }
        self.execution = ExecutionStatus::Failed {
            message: message.into(),
        };
        Ok(())
    }

    // -- helpers --

    fn ensure_unlocked(&self) -> TransitionResult {
        if self.execution.is_locked() {
            return Err(TransitionError::Locked);
        }
        Ok(())
    }

    /// Any applied user change clears a previous start failure.
    fn touch(&mut self) {
        if matches!(self.execution, ExecutionStatus::Failed { .. }) {
            self.execution = ExecutionStatus::Idle;
        }
    }

    /// The first step before `step` whose gate does not pass.
    fn first_unsatisfied_before(&self, step: StepType) -> Option<StepType> {
        self.steps()
            .iter()
            .take_while(|s| **s != step)
            .copied()
            .find(|s| !wizard_gate::step_gate(self, *s))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const EN: DbId = 1;
    const DE: DbId = 2;
    const FR: DbId = 3;

    fn translate_all_at_confirm() -> WizardState {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::TranslateAll).unwrap();
        s.advance().unwrap();
        s.set_source_locale_id(EN).unwrap();
        s.advance().unwrap();
        s.toggle_target_locale(DE).unwrap();
        s.advance().unwrap();
        s.advance().unwrap();
        assert_eq!(s.step(), StepType::Confirm);
        s
    }

    // -- set_action_type --

    #[test]
    fn new_state_starts_on_action_with_defaults() {
        let s = WizardState::new();
        assert_eq!(s.step(), StepType::Action);
        assert_eq!(s.action_type(), None);
        assert_eq!(s.steps(), &[StepType::Action]);
        assert!(s.results().is_empty());
        assert_eq!(s.execution(), &ExecutionStatus::Idle);
    }

    #[test]
    fn set_action_type_resets_step_and_clears_downstream() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::CopyLocale).unwrap();
        s.set_source_locale_id(EN).unwrap();
        s.set_copy_target_locale_id(DE).unwrap();
        s.toggle_key_selection(10).unwrap();
        s.set_instructions("formal tone").unwrap();
        s.advance().unwrap();
        s.advance().unwrap();

        s.set_action_type(BulkActionType::FillMissing).unwrap();

        assert_eq!(s.step(), StepType::Action);
        assert_eq!(s.action_type(), Some(BulkActionType::FillMissing));
        assert_eq!(s.source_locale_id(), None);
        assert!(s.target_locale_ids().is_empty());
        assert_eq!(s.copy_target_locale_id(), None);
        assert!(s.selected_key_ids().is_empty());
        assert!(s.instructions().is_empty());
        assert!(s.results().is_empty());
    }

    // -- source / target distinctness --

    #[test]
    fn setting_source_removes_it_from_targets() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::TranslateAll).unwrap();
        s.toggle_target_locale(DE).unwrap();
        s.toggle_target_locale(FR).unwrap();

        s.set_source_locale_id(DE).unwrap();

        assert_eq!(s.target_locale_ids().iter().copied().collect::<Vec<_>>(), vec![FR]);
    }

    #[test]
    fn setting_source_clears_matching_copy_target() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::CopyLocale).unwrap();
        s.set_copy_target_locale_id(DE).unwrap();

        s.set_source_locale_id(DE).unwrap();

        assert_eq!(s.copy_target_locale_id(), None);
    }

    #[test]
    fn toggling_source_as_target_is_rejected() {
        let mut s = WizardState::new();
        s.set_source_locale_id(EN).unwrap();
        let before = s.clone();

        assert_matches!(
            s.toggle_target_locale(EN),
            Err(TransitionError::SourceConflict(EN))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn toggle_target_twice_restores_original_set() {
        let mut s = WizardState::new();
        s.toggle_target_locale(FR).unwrap();
        let original = s.target_locale_ids().clone();

        s.toggle_target_locale(DE).unwrap();
        s.toggle_target_locale(DE).unwrap();

        assert_eq!(s.target_locale_ids(), &original);
    }

    #[test]
    fn copy_target_equal_to_source_is_rejected_and_gate_stays_closed() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::CopyLocale).unwrap();
        s.advance().unwrap();
        s.set_source_locale_id(EN).unwrap();
        s.advance().unwrap();
        assert_eq!(s.step(), StepType::CopyTarget);
        let before = s.clone();

        assert_matches!(
            s.set_copy_target_locale_id(EN),
            Err(TransitionError::SourceConflict(EN))
        );
        assert_eq!(s, before);
        assert!(!wizard_gate::can_advance(&s));
    }

    #[test]
    fn toggle_key_selection_is_symmetric() {
        let mut s = WizardState::new();
        s.toggle_key_selection(7).unwrap();
        s.toggle_key_selection(8).unwrap();
        s.toggle_key_selection(7).unwrap();
        assert_eq!(s.selected_key_ids().iter().copied().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn apply_template_replaces_instructions() {
        let mut s = WizardState::new();
        s.set_instructions("old").unwrap();
        let template = InstructionTemplate {
            id: 1,
            name: "Formal".into(),
            instruction: "Use the formal register.".into(),
        };
        s.apply_template(&template).unwrap();
        assert_eq!(s.instructions(), "Use the formal register.");
    }

    // -- navigation --

    #[test]
    fn advance_without_action_is_gated() {
        let mut s = WizardState::new();
        assert_matches!(
            s.advance(),
            Err(TransitionError::Boundary(SequenceError::AtLast(StepType::Action)))
        );
    }

    #[test]
    fn advance_blocked_until_targets_chosen() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::TranslateAll).unwrap();
        s.advance().unwrap();
        s.set_source_locale_id(EN).unwrap();
        s.advance().unwrap();
        assert_eq!(s.step(), StepType::Targets);

        assert_matches!(
            s.advance(),
            Err(TransitionError::GateNotSatisfied(StepType::Targets))
        );
        assert_eq!(s.step(), StepType::Targets);

        s.toggle_target_locale(DE).unwrap();
        s.advance().unwrap();
        assert_eq!(s.step(), StepType::Instructions);
    }

    #[test]
    fn advance_rechecks_upstream_gates() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::FillMissing).unwrap();
        s.advance().unwrap();
        s.set_source_locale_id(EN).unwrap();
        s.advance().unwrap();
        s.toggle_target_locale(DE).unwrap();
        s.advance().unwrap();
        // Targets emptied after being passed.
        s.toggle_target_locale(DE).unwrap();

        assert_matches!(
            s.advance(),
            Err(TransitionError::GateNotSatisfied(StepType::Targets))
        );
    }

    #[test]
    fn advance_from_confirm_requires_execution() {
        let mut s = translate_all_at_confirm();
        assert_matches!(s.advance(), Err(TransitionError::ProcessingNotEnterable));
        assert_eq!(s.step(), StepType::Confirm);
    }

    #[test]
    fn go_back_is_never_gated() {
        let mut s = translate_all_at_confirm();
        s.toggle_target_locale(DE).unwrap();
        s.go_back().unwrap();
        s.go_back().unwrap();
        assert_eq!(s.step(), StepType::Targets);
        assert_matches!(
            WizardState::new().go_back(),
            Err(TransitionError::Boundary(SequenceError::AtFirst(StepType::Action)))
        );
    }

    #[test]
    fn go_to_step_backward_is_allowed() {
        let mut s = translate_all_at_confirm();
        s.go_to_step(StepType::Source).unwrap();
        assert_eq!(s.step(), StepType::Source);
    }

    #[test]
    fn go_to_step_forward_requires_upstream_gates() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::TranslateAll).unwrap();
        s.set_source_locale_id(EN).unwrap();
        let before = s.clone();

        assert_matches!(
            s.go_to_step(StepType::Confirm),
            Err(TransitionError::Unreachable {
                step: StepType::Confirm,
                blocked_at: StepType::Targets
            })
        );
        assert_eq!(s, before);

        s.toggle_target_locale(FR).unwrap();
        s.go_to_step(StepType::Confirm).unwrap();
        assert_eq!(s.step(), StepType::Confirm);
    }

    #[test]
    fn go_to_step_outside_sequence_is_rejected() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::CopyLocale).unwrap();
        assert_matches!(
            s.go_to_step(StepType::Targets),
            Err(TransitionError::StepNotInSequence(StepType::Targets))
        );
        assert_matches!(
            s.go_to_step(StepType::Processing),
            Err(TransitionError::ProcessingNotEnterable)
        );
    }

    // -- execution --

    #[test]
    fn begin_processing_moves_to_processing_and_locks() {
        let mut s = translate_all_at_confirm();
        assert!(s.ready_to_execute());

        s.begin_processing(2).unwrap();

        assert_eq!(s.step(), StepType::Processing);
        assert_eq!(s.execution(), &ExecutionStatus::Running { total: 2 });
        assert_matches!(s.toggle_target_locale(FR), Err(TransitionError::Locked));
        assert_matches!(
            s.set_action_type(BulkActionType::CopyLocale),
            Err(TransitionError::Locked)
        );
        assert_matches!(s.go_back(), Err(TransitionError::Locked));
    }

    #[test]
    fn begin_processing_off_confirm_is_rejected() {
        let mut s = WizardState::new();
        s.set_action_type(BulkActionType::TranslateAll).unwrap();
        assert_matches!(
            s.begin_processing(1),
            Err(TransitionError::NotAtConfirm(StepType::Action))
        );
    }

    #[test]
    fn complete_records_results_once() {
        let mut s = translate_all_at_confirm();
        s.begin_processing(1).unwrap();
        let results = vec![BulkResult::succeeded("greeting", Some("de".into()), false)];

        s.complete(results.clone()).unwrap();

        assert_eq!(s.results(), results.as_slice());
        assert_eq!(s.execution(), &ExecutionStatus::Completed);
        assert_matches!(s.complete(Vec::new()), Err(TransitionError::NotRunning));
        assert_eq!(s.results(), results.as_slice());
    }

    #[test]
    fn fail_to_start_keeps_confirm_and_clears_on_next_change() {
        let mut s = translate_all_at_confirm();
        s.fail_to_start("key directory unavailable").unwrap();

        assert_eq!(s.step(), StepType::Confirm);
        assert_matches!(s.execution(), ExecutionStatus::Failed { .. });

        s.set_instructions("retry").unwrap();
        assert_eq!(s.execution(), &ExecutionStatus::Idle);
    }
}
