//! Pure domain logic for the language map backend.
//!
//! Nothing in this crate touches the database, the network or an async
//! runtime. The import engine and the HTTP layer build on these types.

pub mod error;
pub mod import;
pub mod sanitize;
pub mod types;
