//! CrossReferenceResolver - Named references to validated links

use crate::reference::{
    ambiguous_diagnostic, lookup, references, unresolved_diagnostic, Lookup, AGGREGATE_MEMBERS,
    ENTITY_AGGREGATE,
};
use catalog::Catalog;
use serde::Serialize;
use shared::{
    Diagnostic, DiagnosticCode, ElementRecord, Logger, PatternDetails, PatternKind, RecordId,
    ReferenceLink,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Links and findings produced by one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub links: Vec<ReferenceLink>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves record references against a catalog
pub struct CrossReferenceResolver {
    logger: Arc<dyn Logger>,
}

impl CrossReferenceResolver {
    /// Create a new CrossReferenceResolver
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Resolve every reference in the catalog.
    ///
    /// Records are visited in catalog order, so the same catalog always yields
    /// the same links and diagnostics.
    pub fn resolve(&self, catalog: &Catalog) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen_links = HashSet::new();

        for (source_id, source) in catalog.iter() {
            for reference in references(source) {
                match lookup(catalog, reference.rule, reference.name) {
                    Lookup::Resolved(target_id) => {
                        let link = reference.rule.link(source_id, target_id);
                        // Membership is declared from both sides; keep one edge
                        if seen_links.insert(link) {
                            self.logger.debug(
                                &format!(
                                    "Linked {} -[{}]-> {}",
                                    link.source, link.relation, link.target
                                ),
                                None,
                            );
                            resolution.links.push(link);
                        }
                    }
                    Lookup::Unresolved => {
                        resolution
                            .diagnostics
                            .push(unresolved_diagnostic(source, &reference));
                    }
                    Lookup::Ambiguous(candidates) => {
                        resolution.diagnostics.push(ambiguous_diagnostic(
                            catalog,
                            source,
                            &reference,
                            &candidates,
                        ));
                    }
                }
            }
        }

        self.check_membership(catalog, &mut resolution.diagnostics);

        self.logger.info(
            &format!(
                "Resolved {} links with {} diagnostics",
                resolution.links.len(),
                resolution.diagnostics.len()
            ),
            None,
        );

        resolution
    }

    /// Compare both sides of aggregate membership
    fn check_membership(&self, catalog: &Catalog, diagnostics: &mut Vec<Diagnostic>) {
        let mut reported: HashSet<(RecordId, RecordId)> = HashSet::new();

        // Root side: every listed member must name the root as its aggregate
        for (root_id, root) in catalog.find_by_kind(PatternKind::AggregateRoot) {
            for member in members(root).iter().filter(|m| **m != root.name) {
                let Lookup::Resolved(entity_id) = lookup(catalog, &AGGREGATE_MEMBERS, member) else {
                    continue;
                };
                let Some(entity) = catalog.get(entity_id) else {
                    continue;
                };

                let owner = aggregate(entity);
                if owner == Some(root.name.as_str()) || !reported.insert((root_id, entity_id)) {
                    continue;
                }

                let declared = match owner {
                    Some(other) => format!("declares aggregate '{}'", other),
                    None => "declares no aggregate".to_string(),
                };
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::MembershipMismatch,
                    format!(
                        "Aggregate Root '{}' <{}> lists member '{}' but <{}> {}",
                        root.name, root.element_ref, member, entity.element_ref, declared
                    ),
                    vec![root.to_ref(), entity.to_ref()],
                ));
            }
        }

        // Entity side: a root that enumerates members must list the entity
        for (entity_id, entity) in catalog.find_by_kind(PatternKind::Entity) {
            let Some(owner) = aggregate(entity) else {
                continue;
            };
            let Lookup::Resolved(root_id) = lookup(catalog, &ENTITY_AGGREGATE, owner) else {
                continue;
            };
            let Some(root) = catalog.get(root_id) else {
                continue;
            };

            let listed = members(root);
            if listed.is_empty() || listed.contains(&entity.name) {
                continue;
            }
            if !reported.insert((root_id, entity_id)) {
                continue;
            }

            diagnostics.push(Diagnostic::new(
                DiagnosticCode::MembershipMismatch,
                format!(
                    "Entity '{}' <{}> declares aggregate '{}' but <{}> does not list it as a member",
                    entity.name, entity.element_ref, owner, root.element_ref
                ),
                vec![entity.to_ref(), root.to_ref()],
            ));
        }
    }
}

fn members(record: &ElementRecord) -> &BTreeSet<String> {
    static NONE: BTreeSet<String> = BTreeSet::new();
    match &record.details {
        PatternDetails::AggregateRoot { members } => members,
        _ => &NONE,
    }
}

fn aggregate(record: &ElementRecord) -> Option<&str> {
    match &record.details {
        PatternDetails::Entity { aggregate } => aggregate.as_deref(),
        _ => None,
    }
}
