//! Validator - Global catalog invariants checked after resolution

use crate::reference::{lookup, references, unresolved_diagnostic, Lookup};
use crate::resolution::Resolution;
use catalog::Catalog;
use shared::{Diagnostic, DiagnosticCode, Logger, PatternDetails, PatternKind};
use std::collections::HashSet;
use std::sync::Arc;

/// Checks catalog-wide invariants
pub struct Validator {
    logger: Arc<dyn Logger>,
}

impl Validator {
    /// Create a new Validator
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Run every check and return the new findings, in check order.
    ///
    /// Findings the resolver already reported are not repeated. Unique
    /// `(kind, id)` pairs need no check here: `Catalog::add` rejects
    /// duplicates before a catalog can be resolved.
    pub fn validate(&self, catalog: &Catalog, resolution: &Resolution) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        self.check_references_present(catalog, resolution, &mut diagnostics);
        self.check_self_membership(catalog, &mut diagnostics);

        if diagnostics.is_empty() {
            self.logger.debug("Validation passed", None);
        } else {
            self.logger.warn(
                &format!("Validation produced {} diagnostics", diagnostics.len()),
                None,
            );
        }

        diagnostics
    }

    /// Emitters, managed objects and involved objects must name some record
    fn check_references_present(
        &self,
        catalog: &Catalog,
        resolution: &Resolution,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let known: HashSet<&Diagnostic> = resolution.diagnostics.iter().collect();
        let mut reported: HashSet<Diagnostic> = HashSet::new();

        for (_, record) in catalog.iter() {
            for reference in references(record) {
                if !reference.rule.validated {
                    continue;
                }
                if lookup(catalog, reference.rule, reference.name) != Lookup::Unresolved {
                    continue;
                }

                let diagnostic = unresolved_diagnostic(record, &reference);
                if known.contains(&diagnostic) || reported.contains(&diagnostic) {
                    continue;
                }
                reported.insert(diagnostic.clone());
                diagnostics.push(diagnostic);
            }
        }
    }

    /// An aggregate root never lists itself as a member
    fn check_self_membership(&self, catalog: &Catalog, diagnostics: &mut Vec<Diagnostic>) {
        for (_, root) in catalog.find_by_kind(PatternKind::AggregateRoot) {
            let PatternDetails::AggregateRoot { members } = &root.details else {
                continue;
            };
            if root.name.is_empty() || !members.contains(&root.name) {
                continue;
            }

            diagnostics.push(Diagnostic::new(
                DiagnosticCode::SelfMembership,
                format!(
                    "Aggregate Root '{}' <{}> lists itself as a member",
                    root.name, root.element_ref
                ),
                vec![root.to_ref()],
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::CrossReferenceResolver;
    use shared::{ElementRecord, NullLogger, Severity};
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(catalog: &Catalog) -> (Resolution, Vec<Diagnostic>) {
        let logger = Arc::new(NullLogger);
        let resolution = CrossReferenceResolver::new(logger.clone()).resolve(catalog);
        let diagnostics = Validator::new(logger).validate(catalog, &resolution);
        (resolution, diagnostics)
    }

    #[test]
    fn test_clean_catalog_has_no_findings() {
        let mut catalog = Catalog::new();
        catalog
            .add(ElementRecord::new("shop.Order", PatternKind::AggregateRoot, "Order").with_id("x"))
            .unwrap();
        catalog
            .add(ElementRecord::new("shop.OrderLine", PatternKind::Entity, "OrderLine").with_id("x"))
            .unwrap();

        let (_, diagnostics) = run(&catalog);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_self_membership_is_error() {
        let mut catalog = Catalog::new();
        catalog
            .add(
                ElementRecord::new("shop.Order", PatternKind::AggregateRoot, "Order").with_details(
                    PatternDetails::AggregateRoot {
                        members: set(&["Order"]),
                    },
                ),
            )
            .unwrap();

        let (_, diagnostics) = run(&catalog);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::SelfMembership);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_unresolved_emitter_not_reported_twice() {
        let mut catalog = Catalog::new();
        catalog
            .add(
                ElementRecord::new("shop.OrderPlaced", PatternKind::DomainEvent, "OrderPlaced")
                    .with_details(PatternDetails::DomainEvent {
                        emitter: Some("Order".to_string()),
                    }),
            )
            .unwrap();

        let (resolution, diagnostics) = run(&catalog);

        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].code, DiagnosticCode::UnresolvedReference);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_involved_object_reported_without_resolution() {
        let mut catalog = Catalog::new();
        catalog
            .add(
                ElementRecord::new("shop.Pricing", PatternKind::DomainService, "Pricing")
                    .with_details(PatternDetails::DomainService {
                        involved_objects: set(&["Customer"]),
                    }),
            )
            .unwrap();

        // Validating against an empty resolution still finds the missing target
        let diagnostics =
            Validator::new(Arc::new(NullLogger)).validate(&catalog, &Resolution::default());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnresolvedReference);
        assert!(diagnostics[0].message.contains("Customer"));
    }

    #[test]
    fn test_repeated_missing_target_reported_once_per_record() {
        let mut catalog = Catalog::new();
        for (element_ref, name) in [("shop.Pricing", "Pricing"), ("shop.Shipping", "Shipping")] {
            catalog
                .add(
                    ElementRecord::new(element_ref, PatternKind::DomainService, name).with_details(
                        PatternDetails::DomainService {
                            involved_objects: set(&["Customer"]),
                        },
                    ),
                )
                .unwrap();
        }

        let diagnostics =
            Validator::new(Arc::new(NullLogger)).validate(&catalog, &Resolution::default());
        assert_eq!(diagnostics.len(), 2);
        assert_ne!(diagnostics[0], diagnostics[1]);

        // Everything the resolver found is skipped
        let (resolution, diagnostics) = run(&catalog);
        assert_eq!(resolution.diagnostics.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_equal_ids_across_kinds_not_flagged() {
        let mut catalog = Catalog::new();
        catalog
            .add(ElementRecord::new("shop.Order", PatternKind::AggregateRoot, "Order").with_id("o1"))
            .unwrap();
        catalog
            .add(ElementRecord::new("shop.OrderFactory", PatternKind::Factory, "OrderFactory").with_id("o1"))
            .unwrap();
        assert!(catalog
            .add(ElementRecord::new("shop.Other", PatternKind::Factory, "Other").with_id("o1"))
            .is_err());

        let (_, diagnostics) = run(&catalog);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_ambiguous_reference_is_not_unresolved() {
        let mut catalog = Catalog::new();
        catalog
            .add(ElementRecord::new("shop.a.Cart", PatternKind::AggregateRoot, "Cart"))
            .unwrap();
        catalog
            .add(ElementRecord::new("shop.b.Cart", PatternKind::AggregateRoot, "Cart"))
            .unwrap();
        catalog
            .add(
                ElementRecord::new("shop.CartFactory", PatternKind::Factory, "CartFactory")
                    .with_details(PatternDetails::Factory {
                        managed_object: Some("Cart".to_string()),
                    }),
            )
            .unwrap();

        let (resolution, diagnostics) = run(&catalog);

        assert_eq!(resolution.diagnostics[0].code, DiagnosticCode::AmbiguousReference);
        assert!(diagnostics.is_empty());
    }
}
