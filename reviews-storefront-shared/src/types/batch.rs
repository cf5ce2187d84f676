//! Write-batch grouping consumed by the storage repository.
//!
//! The upstream feed delivers heterogeneous operations in one message: saves
//! and deletes for several entity types across several stores. The batch keeps
//! them grouped the way the repository dispatches them.

use std::collections::BTreeMap;

use super::document::{DocumentId, EntityDocument};

/// Save and delete operations destined for one (entity type, store) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreOperations {
    pub save: Vec<EntityDocument>,
    pub delete: Vec<DocumentId>,
}

impl StoreOperations {
    pub fn is_empty(&self) -> bool {
        self.save.is_empty() && self.delete.is_empty()
    }
}

/// Heterogeneous write batch grouped by entity type, then store code.
///
/// Store codes may be empty for entity types that are not store-qualified
/// (reviews are scoped by a visibility field instead). The batch is built by
/// the caller and consumed once by the storage repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOperationSet {
    groups: BTreeMap<String, BTreeMap<String, StoreOperations>>,
}

impl BatchOperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a document save for the given entity type and store code.
    pub fn save(&mut self, entity_type: &str, store_code: &str, document: EntityDocument) {
        self.group_mut(entity_type, store_code).save.push(document);
    }

    /// Queue a deletion by id for the given entity type and store code.
    pub fn delete(&mut self, entity_type: &str, store_code: &str, id: impl Into<DocumentId>) {
        self.group_mut(entity_type, store_code)
            .delete
            .push(id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.groups
            .values()
            .all(|stores| stores.values().all(StoreOperations::is_empty))
    }

    /// Total number of queued operations across all groups.
    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|stores| stores.values())
            .map(|ops| ops.save.len() + ops.delete.len())
            .sum()
    }

    /// Consume the batch in deterministic (entity type, store code) order.
    pub fn into_groups(self) -> impl Iterator<Item = (String, String, StoreOperations)> {
        self.groups.into_iter().flat_map(|(entity_type, stores)| {
            stores
                .into_iter()
                .map(move |(store_code, ops)| (entity_type.clone(), store_code, ops))
        })
    }

    fn group_mut(&mut self, entity_type: &str, store_code: &str) -> &mut StoreOperations {
        self.groups
            .entry(entity_type.to_string())
            .or_default()
            .entry(store_code.to_string())
            .or_default()
    }
}
