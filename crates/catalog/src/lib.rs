//! # DDD Catalog
//!
//! Turns raw marker occurrences into normalized records and keeps them in a
//! queryable catalog.
//!
//! ## Components
//!
//! - `RecordNormalizer` - Raw marker to `ElementRecord` (alias resolution, list fields, attributes)
//! - `Catalog` - Record store indexed by `(kind, id)`, kind, name and containment

pub mod normalizer;
pub mod store;

pub use normalizer::{Normalized, RecordNormalizer};
pub use store::Catalog;
