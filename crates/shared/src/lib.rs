//! # DDD Catalog Shared
//!
//! Common types used across all catalog crates: the marker schema, normalized
//! records, reference links, diagnostics, errors and configuration.

pub mod error;
pub mod schema;
pub mod record;
pub mod link;
pub mod diagnostic;
pub mod config;

// Re-exports
pub use error::*;
pub use schema::*;
pub use record::*;
pub use link::*;
pub use diagnostic::*;
pub use config::*;
