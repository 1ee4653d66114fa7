//! Reference rules - which record field names which kinds of record

use catalog::Catalog;
use shared::{
    fields, Diagnostic, DiagnosticCode, ElementRecord, PatternDetails, PatternKind, RecordId,
    ReferenceLink, RelationKind,
};

/// How a named reference is resolved and turned into a link
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceRule {
    /// Raw field carrying the reference
    pub field: &'static str,
    /// Kinds the referenced name must resolve among
    pub targets: &'static [PatternKind],
    pub relation: RelationKind,
    /// Link runs from the referenced record to the referencing one
    pub inverse: bool,
    /// Presence of the target is re-checked by the validator
    pub validated: bool,
}

impl ReferenceRule {
    /// Build the link for a resolved reference
    pub fn link(&self, source: RecordId, target: RecordId) -> ReferenceLink {
        if self.inverse {
            ReferenceLink::new(target, source, self.relation)
        } else {
            ReferenceLink::new(source, target, self.relation)
        }
    }

    fn target_names(&self) -> String {
        self.targets
            .iter()
            .map(|k| k.display_name())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

const EMITTER_TARGETS: &[PatternKind] = &[
    PatternKind::AggregateRoot,
    PatternKind::Entity,
    PatternKind::DomainService,
    PatternKind::ApplicationService,
    PatternKind::InfrastructureService,
    PatternKind::Factory,
];

const INVOLVED_TARGETS: &[PatternKind] = &[
    PatternKind::AggregateRoot,
    PatternKind::Entity,
    PatternKind::DomainEvent,
    PatternKind::DomainService,
    PatternKind::ApplicationService,
    PatternKind::InfrastructureService,
    PatternKind::Factory,
];

/// Entity.aggregate -> owning aggregate root (link: root -> entity)
pub static ENTITY_AGGREGATE: ReferenceRule = ReferenceRule {
    field: fields::AGGREGATE,
    targets: &[PatternKind::AggregateRoot],
    relation: RelationKind::AggregateMembership,
    inverse: true,
    validated: false,
};

/// AggregateRoot.members -> member entities (link: root -> entity)
pub static AGGREGATE_MEMBERS: ReferenceRule = ReferenceRule {
    field: fields::MEMBERS,
    targets: &[PatternKind::Entity],
    relation: RelationKind::AggregateMembership,
    inverse: false,
    validated: false,
};

/// DomainEvent.emitter -> emitting element (link: emitter -> event)
pub static EVENT_EMITTER: ReferenceRule = ReferenceRule {
    field: fields::EMITTER,
    targets: EMITTER_TARGETS,
    relation: RelationKind::Emits,
    inverse: true,
    validated: true,
};

/// Factory.managedObject -> constructed aggregate or entity
pub static FACTORY_MANAGED_OBJECT: ReferenceRule = ReferenceRule {
    field: fields::MANAGED_OBJECT,
    targets: &[PatternKind::AggregateRoot, PatternKind::Entity],
    relation: RelationKind::Manages,
    inverse: false,
    validated: true,
};

/// Service.involvedObjects -> collaborating elements
pub static SERVICE_INVOLVED_OBJECTS: ReferenceRule = ReferenceRule {
    field: fields::INVOLVED_OBJECTS,
    targets: INVOLVED_TARGETS,
    relation: RelationKind::Involves,
    inverse: false,
    validated: true,
};

/// One named reference held by a record
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    pub rule: &'static ReferenceRule,
    pub name: &'a str,
}

/// Every reference a record makes, in a stable order
///
/// A root's member entry equal to the root's own name is left out; that is
/// reported as self-membership instead.
pub fn references(record: &ElementRecord) -> Vec<Reference<'_>> {
    match &record.details {
        PatternDetails::BoundedContext | PatternDetails::Module => Vec::new(),
        PatternDetails::AggregateRoot { members } => members
            .iter()
            .filter(|m| **m != record.name)
            .map(|name| Reference {
                rule: &AGGREGATE_MEMBERS,
                name,
            })
            .collect(),
        PatternDetails::Entity { aggregate } => single(&ENTITY_AGGREGATE, aggregate),
        PatternDetails::DomainEvent { emitter } => single(&EVENT_EMITTER, emitter),
        PatternDetails::Factory { managed_object } => single(&FACTORY_MANAGED_OBJECT, managed_object),
        PatternDetails::DomainService { involved_objects }
        | PatternDetails::ApplicationService { involved_objects }
        | PatternDetails::InfrastructureService { involved_objects } => involved_objects
            .iter()
            .map(|name| Reference {
                rule: &SERVICE_INVOLVED_OBJECTS,
                name,
            })
            .collect(),
    }
}

fn single<'a>(rule: &'static ReferenceRule, name: &'a Option<String>) -> Vec<Reference<'a>> {
    name.as_deref()
        .map(|name| vec![Reference { rule, name }])
        .unwrap_or_default()
}

/// Result of looking up one referenced name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Resolved(RecordId),
    Unresolved,
    Ambiguous(Vec<RecordId>),
}

/// Resolve a name among the rule's target kinds
pub fn lookup(catalog: &Catalog, rule: &ReferenceRule, name: &str) -> Lookup {
    let mut candidates = catalog.find_by_name_in(name, rule.targets);
    match candidates.len() {
        0 => Lookup::Unresolved,
        1 => Lookup::Resolved(candidates.remove(0)),
        _ => Lookup::Ambiguous(candidates),
    }
}

pub(crate) fn unresolved_diagnostic(source: &ElementRecord, reference: &Reference<'_>) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::UnresolvedReference,
        format!(
            "{} <{}> references {} '{}' but no {} has that name",
            source.kind(),
            source.element_ref,
            reference.rule.field,
            reference.name,
            reference.rule.target_names()
        ),
        vec![source.to_ref()],
    )
}

pub(crate) fn ambiguous_diagnostic(
    catalog: &Catalog,
    source: &ElementRecord,
    reference: &Reference<'_>,
    candidates: &[RecordId],
) -> Diagnostic {
    let candidate_refs: Vec<_> = candidates
        .iter()
        .filter_map(|id| catalog.get(*id))
        .map(ElementRecord::to_ref)
        .collect();

    let listed = candidate_refs
        .iter()
        .map(|r| format!("<{}>", r.element_ref))
        .collect::<Vec<_>>()
        .join(", ");

    let mut records = vec![source.to_ref()];
    records.extend(candidate_refs);

    Diagnostic::new(
        DiagnosticCode::AmbiguousReference,
        format!(
            "{} <{}> references {} '{}' which matches {} records: {}",
            source.kind(),
            source.element_ref,
            reference.rule.field,
            reference.name,
            candidates.len(),
            listed
        ),
        records,
    )
}
