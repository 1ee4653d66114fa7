//! # DDD Catalog Resolver
//!
//! Resolves named references between catalog records into links and checks
//! the catalog's global invariants.
//!
//! ## Components
//!
//! - `reference` - Reference rules (which field points at which kinds) and lookup
//! - `CrossReferenceResolver` - Links, unresolved/ambiguous references, membership consistency
//! - `Validator` - Identifier uniqueness, reference presence, self-membership

pub mod reference;
pub mod resolution;
pub mod validator;

pub use reference::{Lookup, Reference, ReferenceRule};
pub use resolution::{CrossReferenceResolver, Resolution};
pub use validator::Validator;
