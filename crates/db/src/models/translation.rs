//! Translation entity model and review status.

use glossa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status string for a value visible to end users.
pub const STATUS_PUBLISHED: &str = "published";

/// Status string for a value awaiting human approval.
pub const STATUS_PENDING_REVIEW: &str = "pending_review";

/// Publication status of a stored translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    Published,
    PendingReview,
}

impl TranslationStatus {
    /// Status for a newly written value.
    ///
    /// Pending review when the app requires review of produced content or
    /// the producer flagged the value itself.
    pub fn for_write(app_requires_review: bool, flagged: bool) -> Self {
        if app_requires_review || flagged {
            Self::PendingReview
        } else {
            Self::Published
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => STATUS_PUBLISHED,
            Self::PendingReview => STATUS_PENDING_REVIEW,
        }
    }

    pub fn requires_review(self) -> bool {
        self == Self::PendingReview
    }
}

/// A row from the `translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Translation {
    pub id: DbId,
    pub key_id: DbId,
    pub locale_id: DbId,
    pub value: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
