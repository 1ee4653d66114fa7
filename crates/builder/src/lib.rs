//! # DDD Catalog Builder
//!
//! Integration layer: drives one analysis run from raw markers to a
//! `CatalogResult`.
//!
//! ```text
//! RawMarker* ──normalize──> Catalog ──resolve──> links ──validate──> CatalogResult
//! ```

pub mod builder;
pub mod result;
pub mod logging;

pub use builder::{BuildStage, CatalogBuilder};
pub use result::{CatalogResult, CatalogSummary};
pub use logging::TracingLogger;
