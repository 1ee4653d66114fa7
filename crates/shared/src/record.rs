//! Normalized element records

use crate::schema::{Attribute, PatternKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Path separators recognized when deciding element containment
const PATH_SEPARATORS: [&str; 4] = [".", "::", "/", "$"];

/// Opaque reference to an annotated source element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this element lies strictly inside `container`
    /// (e.g. `shop.order.Order` inside `shop.order`)
    pub fn is_within(&self, container: &ElementRef) -> bool {
        if container.0.is_empty() {
            return false;
        }
        match self.0.strip_prefix(container.0.as_str()) {
            Some(rest) => PATH_SEPARATORS
                .iter()
                .any(|sep| rest.len() > sep.len() && rest.starts_with(sep)),
            None => false,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Position of a record inside its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind-specific fields, one variant per pattern kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PatternDetails {
    BoundedContext,
    Module,
    #[serde(rename_all = "camelCase")]
    AggregateRoot {
        #[serde(default)]
        members: BTreeSet<String>,
    },
    #[serde(rename_all = "camelCase")]
    Entity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregate: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DomainEvent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emitter: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DomainService {
        #[serde(default)]
        involved_objects: BTreeSet<String>,
    },
    #[serde(rename_all = "camelCase")]
    ApplicationService {
        #[serde(default)]
        involved_objects: BTreeSet<String>,
    },
    #[serde(rename_all = "camelCase")]
    InfrastructureService {
        #[serde(default)]
        involved_objects: BTreeSet<String>,
    },
    #[serde(rename_all = "camelCase")]
    Factory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        managed_object: Option<String>,
    },
}

impl PatternDetails {
    /// Details with every kind-specific field left empty
    pub fn empty(kind: PatternKind) -> Self {
        match kind {
            PatternKind::BoundedContext => PatternDetails::BoundedContext,
            PatternKind::Module => PatternDetails::Module,
            PatternKind::AggregateRoot => PatternDetails::AggregateRoot {
                members: BTreeSet::new(),
            },
            PatternKind::Entity => PatternDetails::Entity { aggregate: None },
            PatternKind::DomainEvent => PatternDetails::DomainEvent { emitter: None },
            PatternKind::DomainService => PatternDetails::DomainService {
                involved_objects: BTreeSet::new(),
            },
            PatternKind::ApplicationService => PatternDetails::ApplicationService {
                involved_objects: BTreeSet::new(),
            },
            PatternKind::InfrastructureService => PatternDetails::InfrastructureService {
                involved_objects: BTreeSet::new(),
            },
            PatternKind::Factory => PatternDetails::Factory {
                managed_object: None,
            },
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            PatternDetails::BoundedContext => PatternKind::BoundedContext,
            PatternDetails::Module => PatternKind::Module,
            PatternDetails::AggregateRoot { .. } => PatternKind::AggregateRoot,
            PatternDetails::Entity { .. } => PatternKind::Entity,
            PatternDetails::DomainEvent { .. } => PatternKind::DomainEvent,
            PatternDetails::DomainService { .. } => PatternKind::DomainService,
            PatternDetails::ApplicationService { .. } => PatternKind::ApplicationService,
            PatternDetails::InfrastructureService { .. } => PatternKind::InfrastructureService,
            PatternDetails::Factory { .. } => PatternKind::Factory,
        }
    }

    /// Involved objects of a service record
    pub fn involved_objects(&self) -> Option<&BTreeSet<String>> {
        match self {
            PatternDetails::DomainService { involved_objects }
            | PatternDetails::ApplicationService { involved_objects }
            | PatternDetails::InfrastructureService { involved_objects } => Some(involved_objects),
            _ => None,
        }
    }
}

/// One annotated source element after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub element_ref: ElementRef,

    /// User-supplied stable identifier, unique within its kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resolved display name (empty when neither alias was given)
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Multi-valued, declaration-ordered attributes
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(flatten)]
    pub details: PatternDetails,
}

impl ElementRecord {
    /// Create a record with only a kind and a name
    pub fn new(element_ref: impl Into<String>, kind: PatternKind, name: impl Into<String>) -> Self {
        Self {
            element_ref: ElementRef::new(element_ref),
            id: None,
            name: name.into(),
            description: None,
            attributes: Vec::new(),
            details: PatternDetails::empty(kind),
        }
    }

    /// Builder: set identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: replace kind-specific details
    pub fn with_details(mut self, details: PatternDetails) -> Self {
        self.details = details;
        self
    }

    /// Builder: append an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(key, val));
        self
    }

    pub fn kind(&self) -> PatternKind {
        self.details.kind()
    }

    /// All values of an attribute key, in declaration order
    pub fn attribute_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.key == key)
            .map(|a| a.val.as_str())
    }

    /// Short reference used in diagnostics
    pub fn to_ref(&self) -> RecordRef {
        RecordRef {
            element_ref: self.element_ref.clone(),
            kind: self.kind(),
            name: self.name.clone(),
        }
    }
}

/// Lightweight pointer to a record, carried by diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRef {
    pub element_ref: ElementRef,
    pub kind: PatternKind,
    pub name: String,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} <{}>", self.kind, self.element_ref)
        } else {
            write!(f, "{} '{}' <{}>", self.kind, self.name, self.element_ref)
        }
    }
}
