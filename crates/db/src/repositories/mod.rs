//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod city_repo;
pub mod language_repo;
pub mod language_taxonomy_repo;
pub mod language_translation_repo;
pub mod taxonomy_repo;

pub use city_repo::CityRepo;
pub use language_repo::LanguageRepo;
pub use language_taxonomy_repo::LanguageTaxonomyRepo;
pub use language_translation_repo::LanguageTranslationRepo;
pub use taxonomy_repo::TaxonomyRepo;
