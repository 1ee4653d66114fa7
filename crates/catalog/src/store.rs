//! Catalog - In-memory store of normalized element records

use serde::Serialize;
use shared::{DuplicateIdentifierError, ElementRecord, PatternKind, RecordId, Result};
use std::collections::{BTreeMap, HashMap};

/// Catalog owns every record of one analysis run
///
/// Records are moved in on `add` and never handed out mutably, so a record
/// belongs to exactly one catalog.
#[derive(Debug, Default, Serialize)]
pub struct Catalog {
    /// All records, in insertion order
    records: Vec<ElementRecord>,
    #[serde(skip)]
    by_id: HashMap<(PatternKind, String), RecordId>,
    #[serde(skip)]
    by_kind: HashMap<PatternKind, Vec<RecordId>>,
    #[serde(skip)]
    by_name: HashMap<String, Vec<RecordId>>,
}

impl Catalog {
    /// Create an empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, rejecting a second `(kind, id)` pair
    pub fn add(&mut self, record: ElementRecord) -> Result<RecordId> {
        let kind = record.kind();

        if let Some(id) = &record.id {
            if let Some(existing) = self.by_id.get(&(kind, id.clone())) {
                return Err(DuplicateIdentifierError {
                    kind,
                    id: id.clone(),
                    existing_ref: self.records[existing.index()].element_ref.to_string(),
                    new_ref: record.element_ref.to_string(),
                }
                .into());
            }
        }

        let record_id = RecordId(self.records.len());

        if let Some(id) = &record.id {
            self.by_id.insert((kind, id.clone()), record_id);
        }
        self.by_kind.entry(kind).or_default().push(record_id);
        self.by_name
            .entry(record.name.clone())
            .or_default()
            .push(record_id);
        self.records.push(record);

        Ok(record_id)
    }

    /// Get a record by its position
    pub fn get(&self, id: RecordId) -> Option<&ElementRecord> {
        self.records.get(id.index())
    }

    /// Find a record by kind and user-supplied identifier
    pub fn find_by_id(&self, kind: PatternKind, id: &str) -> Option<(RecordId, &ElementRecord)> {
        self.by_id
            .get(&(kind, id.to_string()))
            .map(|&rid| (rid, &self.records[rid.index()]))
    }

    /// All records of a kind, in insertion order
    ///
    /// The iterator is lazy and cloneable; calling again starts over.
    pub fn find_by_kind(
        &self,
        kind: PatternKind,
    ) -> impl Iterator<Item = (RecordId, &ElementRecord)> + Clone + '_ {
        self.ids_to_records(self.by_kind.get(&kind))
    }

    /// All records whose resolved name equals `name`
    pub fn find_by_name<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = (RecordId, &'a ElementRecord)> + Clone + 'a {
        self.ids_to_records(self.by_name.get(name))
    }

    /// Records named `name` whose kind is one of `kinds`
    pub fn find_by_name_in(&self, name: &str, kinds: &[PatternKind]) -> Vec<RecordId> {
        self.find_by_name(name)
            .filter(|(_, record)| kinds.contains(&record.kind()))
            .map(|(id, _)| id)
            .collect()
    }

    /// Module and bounded context records enclosing a record, innermost first
    pub fn containers_of(&self, id: RecordId) -> Vec<RecordId> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };

        let mut containers: Vec<RecordId> = self
            .iter()
            .filter(|(_, c)| c.kind().is_container())
            .filter(|(_, c)| record.element_ref.is_within(&c.element_ref))
            .map(|(cid, _)| cid)
            .collect();

        containers.sort_by_key(|cid| {
            std::cmp::Reverse(self.records[cid.index()].element_ref.as_str().len())
        });
        containers
    }

    /// Innermost enclosing record of a given container kind
    pub fn container_of_kind(&self, id: RecordId, kind: PatternKind) -> Option<RecordId> {
        self.containers_of(id)
            .into_iter()
            .find(|cid| self.records[cid.index()].kind() == kind)
    }

    /// Records lying inside a module or bounded context record
    pub fn contained_in(&self, container: RecordId) -> Vec<RecordId> {
        let Some(outer) = self.get(container) else {
            return Vec::new();
        };
        if !outer.kind().is_container() {
            return Vec::new();
        }

        self.iter()
            .filter(|(_, r)| r.element_ref.is_within(&outer.element_ref))
            .map(|(rid, _)| rid)
            .collect()
    }

    /// Iterate over every record in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &ElementRecord)> + Clone + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId(i), r))
    }

    /// Number of records per kind (kinds without records are omitted)
    pub fn kind_counts(&self) -> BTreeMap<PatternKind, usize> {
        self.by_kind
            .iter()
            .map(|(kind, ids)| (*kind, ids.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn ids_to_records<'a>(
        &'a self,
        ids: Option<&'a Vec<RecordId>>,
    ) -> impl Iterator<Item = (RecordId, &'a ElementRecord)> + Clone + 'a {
        ids.map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&rid| (rid, &self.records[rid.index()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CatalogError;

    fn record(element_ref: &str, kind: PatternKind, name: &str) -> ElementRecord {
        ElementRecord::new(element_ref, kind, name)
    }

    // ============== Add Tests ==============

    #[test]
    fn test_add_grows_by_one() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());

        catalog.add(record("shop.Order", PatternKind::AggregateRoot, "Order")).unwrap();
        assert_eq!(catalog.len(), 1);

        catalog.add(record("shop.OrderLine", PatternKind::Entity, "OrderLine")).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_add_rejects_duplicate_id_within_kind() {
        let mut catalog = Catalog::new();
        catalog
            .add(record("shop.A", PatternKind::Entity, "A").with_id("e1"))
            .unwrap();

        let err = catalog
            .add(record("shop.B", PatternKind::Entity, "B").with_id("e1"))
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateIdentifier(ref e) if e.id == "e1"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_allows_same_id_across_kinds() {
        let mut catalog = Catalog::new();
        catalog
            .add(record("shop.Order", PatternKind::AggregateRoot, "Order").with_id("x"))
            .unwrap();
        catalog
            .add(record("shop.OrderLine", PatternKind::Entity, "OrderLine").with_id("x"))
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_add_allows_repeated_records_without_id() {
        let mut catalog = Catalog::new();
        catalog.add(record("shop.A", PatternKind::Entity, "Same")).unwrap();
        catalog.add(record("shop.B", PatternKind::Entity, "Same")).unwrap();
        assert_eq!(catalog.find_by_name("Same").count(), 2);
    }

    // ============== Lookup Tests ==============

    #[test]
    fn test_find_by_id() {
        let mut catalog = Catalog::new();
        let rid = catalog
            .add(record("shop.Order", PatternKind::AggregateRoot, "Order").with_id("agg1"))
            .unwrap();

        let (found, rec) = catalog.find_by_id(PatternKind::AggregateRoot, "agg1").unwrap();
        assert_eq!(found, rid);
        assert_eq!(rec.name, "Order");
        assert!(catalog.find_by_id(PatternKind::Entity, "agg1").is_none());
        assert!(catalog.find_by_id(PatternKind::AggregateRoot, "missing").is_none());
    }

    #[test]
    fn test_find_by_kind_insertion_order_and_restartable() {
        let mut catalog = Catalog::new();
        catalog.add(record("shop.B", PatternKind::Entity, "B")).unwrap();
        catalog.add(record("shop.Order", PatternKind::AggregateRoot, "Order")).unwrap();
        catalog.add(record("shop.A", PatternKind::Entity, "A")).unwrap();

        let entities = catalog.find_by_kind(PatternKind::Entity);
        let first: Vec<&str> = entities.clone().map(|(_, r)| r.name.as_str()).collect();
        let second: Vec<&str> = entities.map(|(_, r)| r.name.as_str()).collect();

        assert_eq!(first, vec!["B", "A"]);
        assert_eq!(first, second);
        assert_eq!(catalog.find_by_kind(PatternKind::Factory).count(), 0);
    }

    #[test]
    fn test_find_by_name_tolerates_collisions() {
        let mut catalog = Catalog::new();
        catalog.add(record("shop.cart.Cart", PatternKind::AggregateRoot, "Cart")).unwrap();
        catalog.add(record("shop.legacy.Cart", PatternKind::AggregateRoot, "Cart")).unwrap();
        catalog.add(record("shop.CartService", PatternKind::DomainService, "Cart")).unwrap();

        assert_eq!(catalog.find_by_name("Cart").count(), 3);
        assert_eq!(
            catalog
                .find_by_name_in("Cart", &[PatternKind::AggregateRoot])
                .len(),
            2
        );
        assert_eq!(catalog.find_by_name("Nothing").count(), 0);
    }

    #[test]
    fn test_kind_counts() {
        let mut catalog = Catalog::new();
        catalog.add(record("shop.A", PatternKind::Entity, "A")).unwrap();
        catalog.add(record("shop.B", PatternKind::Entity, "B")).unwrap();
        catalog.add(record("shop", PatternKind::Module, "Shop")).unwrap();

        let counts = catalog.kind_counts();
        assert_eq!(counts.get(&PatternKind::Entity), Some(&2));
        assert_eq!(counts.get(&PatternKind::Module), Some(&1));
        assert_eq!(counts.get(&PatternKind::Factory), None);
    }

    // ============== Containment Tests ==============

    #[test]
    fn test_containers_innermost_first() {
        let mut catalog = Catalog::new();
        let context = catalog
            .add(record("shop", PatternKind::BoundedContext, "Shop"))
            .unwrap();
        let module = catalog
            .add(record("shop.order", PatternKind::Module, "Ordering"))
            .unwrap();
        let order = catalog
            .add(record("shop.order.Order", PatternKind::AggregateRoot, "Order"))
            .unwrap();

        assert_eq!(catalog.containers_of(order), vec![module, context]);
        assert_eq!(
            catalog.container_of_kind(order, PatternKind::BoundedContext),
            Some(context)
        );
        assert_eq!(catalog.contained_in(context), vec![module, order]);
        assert_eq!(catalog.contained_in(module), vec![order]);
        assert!(catalog.contained_in(order).is_empty());
    }

    #[test]
    fn test_serializes_records_only() {
        let mut catalog = Catalog::new();
        catalog.add(record("shop.Order", PatternKind::AggregateRoot, "Order")).unwrap();

        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(value["records"][0]["name"], "Order");
        assert!(value.get("byName").is_none());
    }
}
