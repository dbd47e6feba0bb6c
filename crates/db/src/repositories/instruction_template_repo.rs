//! Repository for the `instruction_templates` table.

use sqlx::PgPool;

use crate::models::instruction_template::InstructionTemplateRow;

/// Column list for `instruction_templates` queries.
const COLUMNS: &str = "id, name, instruction, created_at";

/// Read access to instruction templates.
pub struct InstructionTemplateRepo;

impl InstructionTemplateRepo {
    /// List all templates, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<InstructionTemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instruction_templates ORDER BY name ASC");
        sqlx::query_as::<_, InstructionTemplateRow>(&query)
            .fetch_all(pool)
            .await
    }
}
