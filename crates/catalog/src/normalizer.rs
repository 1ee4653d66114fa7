//! RecordNormalizer - Raw marker occurrences to canonical element records

use shared::{
    fields, Attribute, CatalogConfig, Diagnostic, DiagnosticCode, ElementRecord, ElementRef,
    FieldValue, MalformedFieldError, PatternDetails, PatternKind, RawMarker, Result,
    UnknownPatternKindError,
};
use std::collections::BTreeSet;

/// Output of normalizing one marker
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: ElementRecord,
    /// Data-quality findings about this marker alone
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts raw markers into `ElementRecord`s
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    list_separator: String,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}

impl RecordNormalizer {
    /// Create a new RecordNormalizer
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            list_separator: config.list_separator.clone(),
        }
    }

    /// Normalize a single marker.
    ///
    /// Fails only on a malformed kind or a known field of the wrong shape.
    /// Unknown fields are ignored.
    pub fn normalize(&self, raw: &RawMarker) -> Result<Normalized> {
        let kind: PatternKind = raw.kind.parse().map_err(|value| UnknownPatternKindError {
            value,
            element_ref: raw.element_ref.clone(),
        })?;

        let raw_name = self.text(raw, fields::NAME)?;
        let raw_value = self.text(raw, fields::VALUE)?;

        let mut ambiguous = None;
        let name = match (raw_name, raw_value) {
            (Some(name), Some(value)) => {
                if name != value {
                    ambiguous = Some(value);
                }
                name
            }
            (Some(name), None) => name,
            (None, Some(value)) => value,
            (None, None) => String::new(),
        };

        let record = ElementRecord {
            element_ref: ElementRef::new(raw.element_ref.clone()),
            id: self.text(raw, fields::ID)?,
            name,
            description: self.text(raw, fields::DESCRIPTION)?,
            attributes: self.attributes(raw)?,
            details: self.details(raw, kind)?,
        };

        let mut diagnostics = Vec::new();
        if let Some(value) = ambiguous {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::AmbiguousAlias,
                format!(
                    "{} <{}> sets both name '{}' and value '{}'; using name",
                    kind, raw.element_ref, record.name, value
                ),
                vec![record.to_ref()],
            ));
        }

        Ok(Normalized {
            record,
            diagnostics,
        })
    }

    fn details(&self, raw: &RawMarker, kind: PatternKind) -> Result<PatternDetails> {
        let details = match kind {
            PatternKind::BoundedContext => PatternDetails::BoundedContext,
            PatternKind::Module => PatternDetails::Module,
            PatternKind::AggregateRoot => {
                // Older marker drafts used memberNames; both feed one set
                let mut members = self.list(raw, fields::MEMBERS)?;
                members.extend(self.list(raw, fields::MEMBER_NAMES)?);
                PatternDetails::AggregateRoot { members }
            }
            PatternKind::Entity => PatternDetails::Entity {
                aggregate: self.text(raw, fields::AGGREGATE)?,
            },
            PatternKind::DomainEvent => PatternDetails::DomainEvent {
                emitter: self.text(raw, fields::EMITTER)?,
            },
            PatternKind::DomainService => PatternDetails::DomainService {
                involved_objects: self.list(raw, fields::INVOLVED_OBJECTS)?,
            },
            PatternKind::ApplicationService => PatternDetails::ApplicationService {
                involved_objects: self.list(raw, fields::INVOLVED_OBJECTS)?,
            },
            PatternKind::InfrastructureService => PatternDetails::InfrastructureService {
                involved_objects: self.list(raw, fields::INVOLVED_OBJECTS)?,
            },
            PatternKind::Factory => PatternDetails::Factory {
                managed_object: self.text(raw, fields::MANAGED_OBJECT)?,
            },
        };
        Ok(details)
    }

    /// Single-valued field; empty means absent
    fn text(&self, raw: &RawMarker, field: &str) -> Result<Option<String>> {
        let value = match raw.field(field) {
            None => None,
            Some(FieldValue::Text(s)) => Some(s.clone()),
            Some(FieldValue::List(items)) if items.len() <= 1 => items.first().cloned(),
            Some(_) => return Err(malformed(raw, field, "a single string")),
        };
        Ok(value.filter(|s| !s.is_empty()))
    }

    /// Set-valued field; a single string is split on the list separator
    fn list(&self, raw: &RawMarker, field: &str) -> Result<BTreeSet<String>> {
        let entries: Vec<&str> = match raw.field(field) {
            None => Vec::new(),
            Some(FieldValue::Text(s)) => s.split(self.list_separator.as_str()).collect(),
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Pairs(_)) => {
                return Err(malformed(raw, field, "a string or a list of strings"))
            }
        };

        Ok(entries
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }

    /// Attribute pairs, verbatim and in declaration order
    fn attributes(&self, raw: &RawMarker) -> Result<Vec<Attribute>> {
        const EXPECTED: &str = "a list of {key, val} pairs or 'key=val' strings";

        match raw.field(fields::ATTRIBUTES) {
            None => Ok(Vec::new()),
            Some(FieldValue::Pairs(pairs)) => Ok(pairs.clone()),
            Some(FieldValue::Text(s)) if s.is_empty() => Ok(Vec::new()),
            Some(FieldValue::Text(s)) => Attribute::parse_pair(s)
                .map(|attr| vec![attr])
                .ok_or_else(|| malformed(raw, fields::ATTRIBUTES, EXPECTED)),
            Some(FieldValue::List(items)) => items
                .iter()
                .map(|item| {
                    Attribute::parse_pair(item)
                        .ok_or_else(|| malformed(raw, fields::ATTRIBUTES, EXPECTED))
                })
                .collect(),
        }
    }
}

fn malformed(raw: &RawMarker, field: &str, expected: &str) -> shared::CatalogError {
    MalformedFieldError {
        element_ref: raw.element_ref.clone(),
        field: field.to_string(),
        expected: expected.to_string(),
    }
    .into()
}
