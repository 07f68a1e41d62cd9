//! Ordered in-memory collection of records

use crate::core::error::{StoreError, TransitionError};
use crate::core::record::Record;
use crate::core::transition::{TransitionTable, apply_transition};
use std::collections::HashSet;

/// Ordered list of records with unique ids
///
/// Ids are checked for uniqueness on insertion only; the mutation paths
/// never change an id.
#[derive(Debug, Clone)]
pub struct CollectionStore<R: Record> {
    records: Vec<R>,
    ids: HashSet<String>,
}

impl<R: Record> CollectionStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Seed a store, rejecting duplicate ids
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Append a record
    pub fn insert(&mut self, record: R) -> Result<(), StoreError> {
        if !self.ids.insert(record.id().to_string()) {
            return Err(StoreError::DuplicateId {
                resource: R::resource_name().to_string(),
                id: record.id().to_string(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Substitute the record with `id` by `updater`'s output.
    ///
    /// Returns `false` without touching anything when the id is unknown or
    /// when `updater` returns a record with a different id.
    pub fn replace(&mut self, id: &str, updater: impl FnOnce(&R) -> R) -> bool {
        let Some(slot) = self.records.iter_mut().find(|r| r.id() == id) else {
            tracing::debug!(resource = R::resource_name(), id, "replace on unknown id ignored");
            return false;
        };
        let updated = updater(slot);
        if updated.id() != id {
            tracing::warn!(
                resource = R::resource_name(),
                id,
                new_id = updated.id(),
                "replace that changes the id rejected"
            );
            return false;
        }
        *slot = updated;
        true
    }

    /// Remove the record with `id`; unknown ids are a no-op
    pub fn remove(&mut self, id: &str) -> Option<R> {
        if !self.ids.remove(id) {
            tracing::debug!(resource = R::resource_name(), id, "remove on unknown id ignored");
            return None;
        }
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Apply a validated status change to the record with `id`.
    ///
    /// `Ok(None)` when the id is unknown; on an invalid transition the store
    /// is left unchanged.
    pub fn transition(
        &mut self,
        id: &str,
        status: R::Status,
        table: &TransitionTable<R::Status>,
    ) -> Result<Option<R>, TransitionError> {
        let Some(current) = self.get(id) else {
            tracing::debug!(resource = R::resource_name(), id, "status change on unknown id ignored");
            return Ok(None);
        };

        let updated = apply_transition(current, status, table)?;
        let stored = updated.clone();
        self.replace(id, move |_| stored);
        Ok(Some(updated))
    }

    /// All records in insertion order
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record> Default for CollectionStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
