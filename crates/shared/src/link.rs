//! Resolved references between records

use crate::record::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relation carried by a resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Aggregate root -> member
    AggregateMembership,
    /// Emitter -> domain event
    Emits,
    /// Factory -> managed object
    Manages,
    /// Service -> involved object
    Involves,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::AggregateMembership => "aggregateMembership",
            RelationKind::Emits => "emits",
            RelationKind::Manages => "manages",
            RelationKind::Involves => "involves",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed edge between two catalog records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLink {
    #[serde(rename = "sourceRecord")]
    pub source: RecordId,
    #[serde(rename = "targetRecord")]
    pub target: RecordId,
    #[serde(rename = "relationKind")]
    pub relation: RelationKind,
}

impl ReferenceLink {
    pub fn new(source: RecordId, target: RecordId, relation: RelationKind) -> Self {
        Self {
            source,
            target,
            relation,
        }
    }

    /// Whether the record is either end of this link
    pub fn touches(&self, record: RecordId) -> bool {
        self.source == record || self.target == record
    }
}
