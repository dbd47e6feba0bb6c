//! Step sequencing for the bulk action wizard.
//!
//! The step list depends on the chosen action: translate-all and
//! fill-missing run over every key for a set of target locales, while
//! copy-locale takes a single copy target and an explicit key selection.

use crate::bulk_action::{BulkActionType, StepType};

/// Sequence used before an action has been chosen.
const NO_ACTION_SEQUENCE: &[StepType] = &[StepType::Action];

/// Sequence for actions that generate over all keys.
const GENERATE_SEQUENCE: &[StepType] = &[
    StepType::Action,
    StepType::Source,
    StepType::Targets,
    StepType::Instructions,
    StepType::Confirm,
    StepType::Processing,
];

/// Sequence for copying selected keys into one locale.
const COPY_SEQUENCE: &[StepType] = &[
    StepType::Action,
    StepType::Source,
    StepType::CopyTarget,
    StepType::KeySelection,
    StepType::Confirm,
    StepType::Processing,
];

/// Why a neighbouring step could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("'{0}' is the first step")]
    AtFirst(StepType),

    #[error("'{0}' is the last step")]
    AtLast(StepType),

    #[error("Step '{0}' is not part of the current sequence")]
    NotInSequence(StepType),
}

/// The ordered steps for an action type (or for no action yet).
pub fn sequence_for(action: Option<BulkActionType>) -> &'static [StepType] {
    match action {
        None => NO_ACTION_SEQUENCE,
        Some(BulkActionType::TranslateAll) | Some(BulkActionType::FillMissing) => {
            GENERATE_SEQUENCE
        }
        Some(BulkActionType::CopyLocale) => COPY_SEQUENCE,
    }
}

/// The first step of the sequence for `action`.
pub fn first_step(action: Option<BulkActionType>) -> StepType {
    sequence_for(action)[0]
}

/// Zero-based position of `step` in the sequence for `action`.
pub fn position(action: Option<BulkActionType>, step: StepType) -> Option<usize> {
    sequence_for(action).iter().position(|s| *s == step)
}

/// Whether `step` belongs to the sequence for `action`.
pub fn contains(action: Option<BulkActionType>, step: StepType) -> bool {
    position(action, step).is_some()
}

/// The step after `current`. No wraparound.
pub fn next(action: Option<BulkActionType>, current: StepType) -> Result<StepType, SequenceError> {
    let seq = sequence_for(action);
    let idx = position(action, current).ok_or(SequenceError::NotInSequence(current))?;
    seq.get(idx + 1)
        .copied()
        .ok_or(SequenceError::AtLast(current))
}

/// The step before `current`. No wraparound.
pub fn previous(
    action: Option<BulkActionType>,
    current: StepType,
) -> Result<StepType, SequenceError> {
    let seq = sequence_for(action);
    let idx = position(action, current).ok_or(SequenceError::NotInSequence(current))?;
    if idx == 0 {
        return Err(SequenceError::AtFirst(current));
    }
    Ok(seq[idx - 1])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
