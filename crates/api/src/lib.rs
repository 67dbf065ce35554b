//! Language map API server library.
//!
//! Exposes config, state, error handling, the listing cache and routes so
//! integration tests and the binary entrypoint share them.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
