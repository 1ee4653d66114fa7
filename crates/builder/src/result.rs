//! CatalogResult - Everything one analysis run produced

use catalog::Catalog;
use serde::Serialize;
use shared::{Diagnostic, PatternKind, RecordId, ReferenceLink, RelationKind, Severity};
use std::collections::BTreeMap;

/// Output of a completed run
///
/// Read-only once built; safe to share between threads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResult {
    pub catalog: Catalog,
    /// Links in resolution order
    pub links: Vec<ReferenceLink>,
    /// Normalizer, then resolver, then validator findings
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts describing a run, for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub records: usize,
    pub records_by_kind: BTreeMap<PatternKind, usize>,
    pub links: usize,
    pub links_by_relation: BTreeMap<RelationKind, usize>,
    pub errors: usize,
    pub warnings: usize,
}

impl CatalogResult {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether any diagnostic reaches `threshold`
    pub fn fails(&self, threshold: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= threshold)
    }

    /// Links starting or ending at a record
    pub fn links_of(&self, record: RecordId) -> impl Iterator<Item = &ReferenceLink> + '_ {
        self.links.iter().filter(move |l| l.touches(record))
    }

    /// Links of one relation kind
    pub fn links_by_relation(&self, relation: RelationKind) -> impl Iterator<Item = &ReferenceLink> + '_ {
        self.links.iter().filter(move |l| l.relation == relation)
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut links_by_relation = BTreeMap::new();
        for link in &self.links {
            *links_by_relation.entry(link.relation).or_insert(0) += 1;
        }

        CatalogSummary {
            records: self.catalog.len(),
            records_by_kind: self.catalog.kind_counts(),
            links: self.links.len(),
            links_by_relation,
            errors: self.error_count(),
            warnings: self.warning_count(),
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
