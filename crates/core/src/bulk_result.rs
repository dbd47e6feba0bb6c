//! Per-unit outcome records and their aggregate summary.

use serde::{Deserialize, Serialize};

/// Error recorded for units that were never submitted because the backend
/// became unreachable part-way through the batch.
pub const CONNECTIVITY_ERROR: &str = "Translation backend unreachable; unit was not submitted";

/// Error recorded for units that were dispatched but never reported back.
pub const LOST_UNIT_ERROR: &str = "Unit did not report a result";

/// Outcome of one (key, locale) unit.
///
/// `requires_review` is independent of `success`: a unit can succeed and
/// still need human sign-off before publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub key_name: String,
    pub locale_code: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub requires_review: bool,
}

impl BulkResult {
    pub fn succeeded(
        key_name: impl Into<String>,
        locale_code: Option<String>,
        requires_review: bool,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            locale_code,
            success: true,
            error: None,
            requires_review,
        }
    }

    pub fn failed(
        key_name: impl Into<String>,
        locale_code: Option<String>,
        error: impl Into<String>,
        requires_review: bool,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            locale_code,
            success: false,
            error: Some(error.into()),
            requires_review,
        }
    }

    /// A unit that was never submitted because the batch was aborted.
    pub fn not_submitted(key_name: impl Into<String>, locale_code: Option<String>) -> Self {
        Self::failed(key_name, locale_code, CONNECTIVITY_ERROR, false)
    }
}

/// Counts shown at the top of the results view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResultSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub requires_review: usize,
}

impl BulkResultSummary {
    pub fn from_results(results: &[BulkResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            if r.success {
                acc.succeeded += 1;
            } else {
                acc.failed += 1;
            }
            if r.requires_review {
                acc.requires_review += 1;
            }
            acc
        })
    }

    /// True when every unit succeeded (vacuously true for an empty batch).
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
