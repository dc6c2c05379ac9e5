use std::collections::HashSet;
use thiserror::Error as ThisError;
use tracing::{error, info};

use crate::record::Record;

/// The CollectionStore owns every live record and hands out identities.
///
/// Records are kept in a vector sorted by [`Record::key`]; every mutation preserves that order
/// so iteration is always sorted. Insertion goes after any records with an equal key, so the
/// relative order of equal keys is the order in which they were inserted.
///
/// The store is not synchronized. It is owned by exactly one task (see
/// [`Dispatcher`](crate::dispatcher::Dispatcher)), which is what keeps mutations serialized.
#[derive(Debug, Clone)]
pub struct CollectionStore<T> {
    records: Vec<T>,
    // Strictly greater than any identity handed out so far, never decreases.
    next_id: u64,
}

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("collection is empty")]
    CollectionEmpty,
    #[error("no record with id {id}")]
    NotFound { id: u64 },
    #[error("record fields are invalid")]
    InvalidForm,
    #[error("no identities left")]
    IdsExhausted,
}

impl<T: Record> CollectionStore<T> {
    pub fn new() -> CollectionStore<T> {
        CollectionStore {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a store from records loaded in bulk. Identities are kept as they are and the id
    /// counter continues after the largest one. No validation is performed; call
    /// [`validate_all`](Self::validate_all) afterwards, which drops records with an identity the
    /// counter cannot move past.
    pub fn from_records(mut records: Vec<T>) -> CollectionStore<T> {
        records.sort_by(|a, b| a.key().cmp(b.key()));
        let next_id = records
            .iter()
            .filter_map(|record| record.id().checked_add(1))
            .max()
            .unwrap_or(1);

        CollectionStore { records, next_id }
    }

    /// Assigns the next identity to `record` and inserts it. A record that does not validate is
    /// rejected and does not consume an identity.
    pub fn add(&mut self, mut record: T) -> Result<u64, StoreError> {
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        record.set_id(id);

        if !record.validate() {
            return Err(StoreError::InvalidForm);
        }

        self.next_id = next_id;
        self.insert_sorted(record);

        Ok(id)
    }

    /// Replaces the record identified by `id`, keeping that identity.
    ///
    /// Checks run in order: the store must not be empty, the id must exist, the new record must
    /// validate. The store is unchanged when any check fails.
    pub fn update(&mut self, id: u64, mut record: T) -> Result<(), StoreError> {
        if self.records.is_empty() {
            return Err(StoreError::CollectionEmpty);
        }

        let position = self
            .position(id)
            .ok_or(StoreError::NotFound { id })?;

        record.set_id(id);
        if !record.validate() {
            return Err(StoreError::InvalidForm);
        }

        self.records.remove(position);
        self.insert_sorted(record);

        Ok(())
    }

    /// Removes every record matching `predicate` and returns how many were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|record| !predicate(record));
        before - self.records.len()
    }

    pub fn remove_by_id(&mut self, id: u64) -> Option<T> {
        self.position(id).map(|position| self.records.remove(position))
    }

    pub fn get_by_id(&self, id: u64) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record. The id counter is left untouched.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Rebuilds the store keeping only valid records with unique identities. The first record
    /// with a given identity wins. Returns the number of dropped records.
    pub fn validate_all(&mut self) -> usize {
        let mut seen = HashSet::with_capacity(self.records.len());
        let mut valid = Vec::with_capacity(self.records.len());
        let mut dropped = 0;

        for record in self.records.drain(..) {
            if !record.validate() {
                error!(id = record.id(), "Record has invalid fields, dropped");
                dropped += 1;
            } else if record.id() >= self.next_id {
                error!(id = record.id(), "Record id leaves no room for new ids, dropped");
                dropped += 1;
            } else if !seen.insert(record.id()) {
                error!(id = record.id(), "Record id is already taken, dropped");
                dropped += 1;
            } else {
                valid.push(record);
            }
        }

        if dropped == 0 {
            info!("All {} records are valid", valid.len());
        }

        self.records = valid;
        dropped
    }

    fn insert_sorted(&mut self, record: T) {
        let index = self
            .records
            .partition_point(|existing| existing.key() <= record.key());
        self.records.insert(index, record);
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

impl<T: Record> Default for CollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
