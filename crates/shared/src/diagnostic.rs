//! Structured diagnostics for data-quality problems

use crate::record::RecordRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diagnostic severity (ordered: warning < error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    AmbiguousAlias,
    UnresolvedReference,
    AmbiguousReference,
    MembershipMismatch,
    SelfMembership,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::AmbiguousAlias => "ambiguous-alias",
            DiagnosticCode::UnresolvedReference => "unresolved-reference",
            DiagnosticCode::AmbiguousReference => "ambiguous-reference",
            DiagnosticCode::MembershipMismatch => "membership-mismatch",
            DiagnosticCode::SelfMembership => "self-membership",
        }
    }

    /// Severity used unless configuration overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::AmbiguousAlias
            | DiagnosticCode::AmbiguousReference
            | DiagnosticCode::MembershipMismatch => Severity::Warning,
            DiagnosticCode::UnresolvedReference | DiagnosticCode::SelfMembership => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One data-quality finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Offending records; the first one is the record the finding is about
    #[serde(default, rename = "offendingRecordRefs")]
    pub records: Vec<RecordRef>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>, records: Vec<RecordRef>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            records,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
