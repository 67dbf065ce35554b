pub mod import;
pub mod languages;
