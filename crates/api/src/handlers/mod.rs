pub mod bulk_sessions;
pub mod instruction_templates;
