//! Configuration and logging interfaces for the catalog builder

use crate::diagnostic::{DiagnosticCode, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Catalog run configuration (`catalog.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Separator used to split single-string list fields (e.g. involvedObjects)
    #[serde(default = "default_list_separator")]
    pub list_separator: String,

    /// Per-code severity replacing the built-in default
    #[serde(default)]
    pub severity_overrides: BTreeMap<DiagnosticCode, Severity>,

    /// Lowest severity that makes a check fail
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

fn default_list_separator() -> String {
    ",".to_string()
}

fn default_fail_on() -> Severity {
    Severity::Error
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            list_separator: default_list_separator(),
            severity_overrides: BTreeMap::new(),
            fail_on: default_fail_on(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the normalizer cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.list_separator.is_empty() {
            return Err(crate::CatalogError::Config(
                "listSeparator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective severity for a diagnostic code
    pub fn severity_for(&self, code: DiagnosticCode) -> Severity {
        self.severity_overrides
            .get(&code)
            .copied()
            .unwrap_or_else(|| code.default_severity())
    }
}

/// Logger interface for dependency injection
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn info(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn warn(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn error(&self, message: &str, meta: Option<&HashMap<String, String>>);
}

/// No-op logger for testing
#[derive(Debug, Clone, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn info(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn warn(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn error(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
}
