use chrono::{DateTime, Local};
use tracing::info;

use crate::flat::Flat;
use crate::persistence::{Persistence, PersistenceError};
use crate::store::CollectionStore;

/// The collection together with the file it is mirrored to.
pub struct Database {
    pub store: CollectionStore<Flat>,
    persistence: Box<dyn Persistence<Flat>>,
    initialized_at: DateTime<Local>,
    saved_at: Option<DateTime<Local>>,
}

impl Database {
    /// Loads the collection and drops invalid or duplicated records.
    pub fn open<P>(persistence: P) -> Result<Database, PersistenceError>
    where
        P: Persistence<Flat> + 'static,
    {
        let records = persistence.load()?;
        let mut store = CollectionStore::from_records(records);
        let dropped = store.validate_all();

        info!(
            location = %persistence.location(),
            records = store.len(),
            dropped,
            next_id = store.next_id(),
            "Database opened"
        );

        Ok(Database {
            store,
            persistence: Box::new(persistence),
            initialized_at: Local::now(),
            saved_at: None,
        })
    }

    pub fn save(&mut self) -> Result<(), PersistenceError> {
        self.persistence.save(self.store.records())?;
        self.saved_at = Some(Local::now());
        Ok(())
    }

    pub fn location(&self) -> String {
        self.persistence.location()
    }

    pub fn initialized_at(&self) -> DateTime<Local> {
        self.initialized_at
    }

    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        self.saved_at
    }
}
