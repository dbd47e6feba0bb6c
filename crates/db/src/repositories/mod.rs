//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod app_locale_repo;
pub mod app_repo;
pub mod instruction_template_repo;
pub mod translation_key_repo;
pub mod translation_repo;

pub use app_locale_repo::AppLocaleRepo;
pub use app_repo::AppRepo;
pub use instruction_template_repo::InstructionTemplateRepo;
pub use translation_key_repo::TranslationKeyRepo;
pub use translation_repo::TranslationRepo;
