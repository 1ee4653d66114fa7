//! Marker schema - pattern kinds and the raw marker input shape

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Recognized raw field names
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
    pub const DESCRIPTION: &str = "description";
    pub const ATTRIBUTES: &str = "attributes";
    pub const AGGREGATE: &str = "aggregate";
    pub const MEMBERS: &str = "members";
    pub const MEMBER_NAMES: &str = "memberNames";
    pub const EMITTER: &str = "emitter";
    pub const INVOLVED_OBJECTS: &str = "involvedObjects";
    pub const MANAGED_OBJECT: &str = "managedObject";
}

/// DDD pattern role carried by a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    BoundedContext,
    Module,
    AggregateRoot,
    Entity,
    DomainEvent,
    DomainService,
    ApplicationService,
    InfrastructureService,
    Factory,
}

impl PatternKind {
    /// Every kind, in declaration order
    pub const ALL: [PatternKind; 9] = [
        PatternKind::BoundedContext,
        PatternKind::Module,
        PatternKind::AggregateRoot,
        PatternKind::Entity,
        PatternKind::DomainEvent,
        PatternKind::DomainService,
        PatternKind::ApplicationService,
        PatternKind::InfrastructureService,
        PatternKind::Factory,
    ];

    /// Variant identifier as used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::BoundedContext => "boundedContext",
            PatternKind::Module => "module",
            PatternKind::AggregateRoot => "aggregateRoot",
            PatternKind::Entity => "entity",
            PatternKind::DomainEvent => "domainEvent",
            PatternKind::DomainService => "domainService",
            PatternKind::ApplicationService => "applicationService",
            PatternKind::InfrastructureService => "infrastructureService",
            PatternKind::Factory => "factory",
        }
    }

    /// Human-readable pattern name
    pub fn display_name(&self) -> &'static str {
        match self {
            PatternKind::BoundedContext => "Bounded Context",
            PatternKind::Module => "Module",
            PatternKind::AggregateRoot => "Aggregate Root",
            PatternKind::Entity => "Entity",
            PatternKind::DomainEvent => "Domain Event",
            PatternKind::DomainService => "Domain Service",
            PatternKind::ApplicationService => "Application Service",
            PatternKind::InfrastructureService => "Infrastructure Service",
            PatternKind::Factory => "Factory",
        }
    }

    /// Name of the source marker declaring this kind
    pub fn annotation_name(&self) -> &'static str {
        match self {
            PatternKind::BoundedContext => "DddBoundedContext",
            PatternKind::Module => "DddModule",
            PatternKind::AggregateRoot => "DddAggregateRoot",
            PatternKind::Entity => "DddEntity",
            PatternKind::DomainEvent => "DddDomainEvent",
            PatternKind::DomainService => "DddDomainService",
            PatternKind::ApplicationService => "DddApplicationService",
            PatternKind::InfrastructureService => "DddInfrastructureService",
            PatternKind::Factory => "DddFactory",
        }
    }

    /// Domain, application or infrastructure service
    pub fn is_service(&self) -> bool {
        matches!(
            self,
            PatternKind::DomainService
                | PatternKind::ApplicationService
                | PatternKind::InfrastructureService
        )
    }

    /// Package-level markers that enclose other elements
    pub fn is_container(&self) -> bool {
        matches!(self, PatternKind::BoundedContext | PatternKind::Module)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        let folded = folded.strip_prefix("ddd").unwrap_or(&folded);

        PatternKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(folded))
            .ok_or_else(|| s.to_string())
    }
}

/// Generic key-value extension slot attached to a marker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub val: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            val: val.into(),
        }
    }

    /// Parse the `key=val` shorthand
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (key, val) = s.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, val.trim()))
    }
}

/// Value of a raw marker field as extracted from source
///
/// Numbers and booleans (e.g. an unquoted YAML `id: 42`) are read as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Pairs(Vec<Attribute>),
}

/// Scalar accepted wherever a string is expected
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Uint(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldInput {
    Text(Scalar),
    List(Vec<Scalar>),
    Pairs(Vec<Attribute>),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = FieldInput::deserialize(deserializer).map_err(|_| {
            D::Error::custom(
                "expected a string, a number, a boolean, a list of those, or a list of key/val pairs",
            )
        })?;
        Ok(match input {
            FieldInput::Text(scalar) => FieldValue::Text(scalar.into()),
            FieldInput::List(items) => FieldValue::List(items.into_iter().map(String::from).collect()),
            FieldInput::Pairs(pairs) => FieldValue::Pairs(pairs),
        })
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(String::from).collect())
    }
}

impl From<Vec<Attribute>> for FieldValue {
    fn from(pairs: Vec<Attribute>) -> Self {
        FieldValue::Pairs(pairs)
    }
}

/// One marker occurrence as supplied by an external scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarker {
    /// Opaque reference to the annotated source element
    pub element_ref: String,

    /// Pattern kind, still unparsed
    pub kind: String,

    /// Raw field values keyed by schema field name
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl RawMarker {
    /// Create a marker with no fields
    pub fn new(element_ref: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            element_ref: element_ref.into(),
            kind: kind.into(),
            fields: HashMap::new(),
        }
    }

    /// Create a marker for a known kind
    pub fn of_kind(element_ref: impl Into<String>, kind: PatternKind) -> Self {
        Self::new(element_ref, kind.as_str())
    }

    /// Builder: set a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a raw field
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
