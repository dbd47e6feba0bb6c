//! Instruction template entity model.

use glossa_core::locale::InstructionTemplate;
use glossa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `instruction_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstructionTemplateRow {
    pub id: DbId,
    pub name: String,
    pub instruction: String,
    pub created_at: Timestamp,
}

impl From<InstructionTemplateRow> for InstructionTemplate {
    fn from(row: InstructionTemplateRow) -> Self {
        InstructionTemplate {
            id: row.id,
            name: row.name,
            instruction: row.instruction,
        }
    }
}
