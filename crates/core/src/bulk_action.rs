//! Bulk action and wizard step enumerations.
//!
//! Both enums are closed: adding a variant forces every `match` in the
//! sequencer, the gate, and the coordinator to handle it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Valid action type strings (wire form).
pub const ACTION_TRANSLATE_ALL: &str = "translate_all";
pub const ACTION_FILL_MISSING: &str = "fill_missing";
pub const ACTION_COPY_LOCALE: &str = "copy_locale";

/// All valid action type strings.
pub const VALID_ACTION_TYPES: &[&str] =
    &[ACTION_TRANSLATE_ALL, ACTION_FILL_MISSING, ACTION_COPY_LOCALE];

/// Valid step strings (wire form).
pub const STEP_ACTION: &str = "action";
pub const STEP_SOURCE: &str = "source";
pub const STEP_TARGETS: &str = "targets";
pub const STEP_COPY_TARGET: &str = "copy_target";
pub const STEP_INSTRUCTIONS: &str = "instructions";
pub const STEP_KEY_SELECTION: &str = "key_selection";
pub const STEP_CONFIRM: &str = "confirm";
pub const STEP_PROCESSING: &str = "processing";

/// All valid step strings.
pub const VALID_STEPS: &[&str] = &[
    STEP_ACTION,
    STEP_SOURCE,
    STEP_TARGETS,
    STEP_COPY_TARGET,
    STEP_INSTRUCTIONS,
    STEP_KEY_SELECTION,
    STEP_CONFIRM,
    STEP_PROCESSING,
];

// ---------------------------------------------------------------------------
// BulkActionType
// ---------------------------------------------------------------------------

/// The bulk operations the wizard can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkActionType {
    /// Generate a translation for every key in every target locale.
    TranslateAll,
    /// Generate translations only where the target has no value yet.
    FillMissing,
    /// Copy selected keys from the source locale into one target locale.
    CopyLocale,
}

impl BulkActionType {
    /// All action types, in picker order.
    pub const ALL: [BulkActionType; 3] = [Self::TranslateAll, Self::FillMissing, Self::CopyLocale];

    /// Parse an action type from its wire form.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ACTION_TRANSLATE_ALL => Ok(Self::TranslateAll),
            ACTION_FILL_MISSING => Ok(Self::FillMissing),
            ACTION_COPY_LOCALE => Ok(Self::CopyLocale),
            _ => Err(CoreError::Validation(format!(
                "Invalid bulk action type '{s}'. Must be one of: {}",
                VALID_ACTION_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TranslateAll => ACTION_TRANSLATE_ALL,
            Self::FillMissing => ACTION_FILL_MISSING,
            Self::CopyLocale => ACTION_COPY_LOCALE,
        }
    }

    /// Human-readable label for the action picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::TranslateAll => "Translate all",
            Self::FillMissing => "Fill missing",
            Self::CopyLocale => "Copy from locale",
        }
    }

    /// One-line description shown under the label.
    pub fn description(self) -> &'static str {
        match self {
            Self::TranslateAll => {
                "Generate translations for every key in the selected target locales"
            }
            Self::FillMissing => {
                "Generate translations only for keys that have no value in the target locales"
            }
            Self::CopyLocale => "Copy the source value of selected keys into another locale",
        }
    }

    /// Whether this action produces content through the generation backend.
    pub fn generates(self) -> bool {
        match self {
            Self::TranslateAll | Self::FillMissing => true,
            Self::CopyLocale => false,
        }
    }
}

// ---------------------------------------------------------------------------
// StepType
// ---------------------------------------------------------------------------

/// A position in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Action,
    Source,
    Targets,
    CopyTarget,
    Instructions,
    KeySelection,
    Confirm,
    Processing,
}

impl StepType {
    /// Parse a step from its wire form.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STEP_ACTION => Ok(Self::Action),
            STEP_SOURCE => Ok(Self::Source),
            STEP_TARGETS => Ok(Self::Targets),
            STEP_COPY_TARGET => Ok(Self::CopyTarget),
            STEP_INSTRUCTIONS => Ok(Self::Instructions),
            STEP_KEY_SELECTION => Ok(Self::KeySelection),
            STEP_CONFIRM => Ok(Self::Confirm),
            STEP_PROCESSING => Ok(Self::Processing),
            _ => Err(CoreError::Validation(format!(
                "Invalid wizard step '{s}'. Must be one of: {}",
                VALID_STEPS.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => STEP_ACTION,
            Self::Source => STEP_SOURCE,
            Self::Targets => STEP_TARGETS,
            Self::CopyTarget => STEP_COPY_TARGET,
            Self::Instructions => STEP_INSTRUCTIONS,
            Self::KeySelection => STEP_KEY_SELECTION,
            Self::Confirm => STEP_CONFIRM,
            Self::Processing => STEP_PROCESSING,
        }
    }

    /// Human-readable label for the step header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Action => "Choose action",
            Self::Source => "Source locale",
            Self::Targets => "Target locales",
            Self::CopyTarget => "Copy target",
            Self::Instructions => "Instructions",
            Self::KeySelection => "Select keys",
            Self::Confirm => "Confirm",
            Self::Processing => "Results",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for BulkActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_from_str_valid() {
        for action in BulkActionType::ALL {
            assert_eq!(
                BulkActionType::from_str_value(action.as_str()).unwrap(),
                action
            );
        }
    }

    #[test]
    fn action_type_from_str_invalid() {
        assert!(BulkActionType::from_str_value("translateAll").is_err());
        assert!(BulkActionType::from_str_value("").is_err());
    }

    #[test]
    fn step_from_str_covers_every_step() {
        for s in VALID_STEPS {
            let step = StepType::from_str_value(s).unwrap();
            assert_eq!(step.as_str(), *s);
        }
        assert!(StepType::from_str_value("summary").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&StepType::KeySelection).unwrap();
        assert_eq!(json, "\"key_selection\"");
        let action: BulkActionType = serde_json::from_str("\"copy_locale\"").unwrap();
        assert_eq!(action, BulkActionType::CopyLocale);
    }

    #[test]
    fn only_copy_locale_skips_generation() {
        assert!(BulkActionType::TranslateAll.generates());
        assert!(BulkActionType::FillMissing.generates());
        assert!(!BulkActionType::CopyLocale.generates());
    }

    #[test]
    fn labels_are_nonempty() {
        for action in BulkActionType::ALL {
            assert!(!action.label().is_empty());
            assert!(!action.description().is_empty());
        }
        for s in VALID_STEPS {
            assert!(!StepType::from_str_value(s).unwrap().label().is_empty());
        }
    }
}
