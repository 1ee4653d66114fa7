//! # DDD Catalog Loader
//!
//! Reads raw marker occurrences produced by an external source scanner.

pub mod marker_loader;

pub use marker_loader::MarkerLoader;
