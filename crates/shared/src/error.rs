//! Error types for the catalog builder
//!
//! These are usage faults. Data-quality problems never become errors; they
//! are reported as [`crate::Diagnostic`]s instead.

use crate::schema::PatternKind;
use thiserror::Error;

/// Error thrown when a second record claims an identifier already used by its kind
#[derive(Debug, Error)]
#[error("Duplicate {kind} id '{id}': <{new_ref}> collides with <{existing_ref}>")]
pub struct DuplicateIdentifierError {
    pub kind: PatternKind,
    pub id: String,
    pub existing_ref: String,
    pub new_ref: String,
}

/// Error thrown when a raw marker names no known pattern kind
#[derive(Debug, Error)]
#[error("Unknown pattern kind '{value}' on <{element_ref}>. Known kinds: {}", known_kinds())]
pub struct UnknownPatternKindError {
    pub value: String,
    pub element_ref: String,
}

fn known_kinds() -> String {
    PatternKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error thrown when a known field carries a value of the wrong shape
#[derive(Debug, Error)]
#[error("Field '{field}' on <{element_ref}> must be {expected}")]
pub struct MalformedFieldError {
    pub element_ref: String,
    pub field: String,
    pub expected: String,
}

/// Error thrown when a pipeline stage is invoked out of order
#[derive(Debug, Error)]
#[error("Cannot {operation} while the builder is {stage}")]
pub struct OutOfOrderError {
    pub operation: String,
    pub stage: String,
}

/// General catalog error type
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    DuplicateIdentifier(#[from] DuplicateIdentifierError),

    #[error(transparent)]
    UnknownPatternKind(#[from] UnknownPatternKindError),

    #[error(transparent)]
    MalformedField(#[from] MalformedFieldError),

    #[error(transparent)]
    OutOfOrder(#[from] OutOfOrderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_identifier_message() {
        let err = CatalogError::from(DuplicateIdentifierError {
            kind: PatternKind::Entity,
            id: "e1".to_string(),
            existing_ref: "shop.A".to_string(),
            new_ref: "shop.B".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Duplicate Entity id 'e1': <shop.B> collides with <shop.A>"
        );
    }

    #[test]
    fn test_unknown_kind_lists_known_kinds() {
        let err = UnknownPatternKindError {
            value: "ValueObject".to_string(),
            element_ref: "shop.Money".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Unknown pattern kind 'ValueObject' on <shop.Money>"));
        assert!(message.contains("aggregateRoot"));
    }
}
