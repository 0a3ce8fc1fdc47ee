// Farewell Core: class farewell data layer
//
// Registered names, the memory wall and the contact vault, each persisted as a
// JSON array under a fixed key of a key-value store. The browser build plugs in
// window.localStorage; native builds use sled.

pub mod birthday;
pub mod clock;
pub mod quotes;
pub mod store;

use std::sync::Arc;
use thiserror::Error;

pub use birthday::{next_birthday, UpcomingBirthday};
pub use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::{FixedClock, SequentialIds};
pub use quotes::QuoteDeck;
pub use store::{
    Contact, ContactVault, MemoryStorage, Memory, MemoryWall, NameRegistry, NewContact,
    NewMemory, StorageBackend,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error)]
pub enum FarewellError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// ============================================================================
// FAREWELL STORE
// ============================================================================

/// Entry point for every read and write the site performs.
///
/// Reads never fail: unreadable or malformed collections come back empty.
/// Writes replace a whole collection and report backend failures.
#[derive(Clone)]
pub struct FarewellStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    names: NameRegistry,
    memories: MemoryWall,
    contacts: ContactVault,
}

impl FarewellStore {
    /// Store over `backend` with the system clock and UUID v4 ids
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_capabilities(backend, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_capabilities(
        backend: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            names: NameRegistry::new(backend.clone()),
            memories: MemoryWall::new(backend.clone(), clock.clone(), ids.clone()),
            contacts: ContactVault::new(backend.clone(), clock.clone(), ids),
            backend,
            clock,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store backed by a sled database at `path`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_storage(path: &str) -> Result<Self, FarewellError> {
        let backend = store::SledStorage::new(path).map_err(FarewellError::Storage)?;
        tracing::info!(path, "opened farewell storage");
        Ok(Self::new(Arc::new(backend)))
    }

    // ---- names ----

    pub fn list_registered_names(&self) -> Vec<String> {
        self.names.list()
    }

    pub fn register_name(&self, name: &str) -> Result<Vec<String>, FarewellError> {
        self.names.register(name)
    }

    pub fn search_registered_names(&self, query: &str) -> Vec<String> {
        self.names.search(query)
    }

    // ---- memories ----

    pub fn list_memories(&self) -> Vec<Memory> {
        self.memories.list()
    }

    pub fn save_memory(&self, input: NewMemory) -> Result<Memory, FarewellError> {
        self.memories.save(input)
    }

    pub fn delete_memory(&self, id: &str) -> Result<Vec<Memory>, FarewellError> {
        self.memories.delete(id)
    }

    pub fn search_memories(&self, query: &str) -> Vec<Memory> {
        self.memories.search(query)
    }

    // ---- contacts ----

    pub fn list_contacts(&self) -> Vec<Contact> {
        self.contacts.list()
    }

    pub fn save_contact(&self, input: NewContact) -> Result<Contact, FarewellError> {
        self.contacts.save(input)
    }

    pub fn search_contacts(&self, query: &str) -> Vec<Contact> {
        self.contacts.search(query)
    }

    // ---- birthdays ----

    /// Soonest upcoming birthday among `contacts`, counted from the store's clock.
    pub fn next_birthday(&self, contacts: &[Contact]) -> Option<UpcomingBirthday> {
        birthday::next_birthday(contacts, self.clock.today())
    }

    /// `next_birthday` over everything in the vault
    pub fn upcoming_birthday(&self) -> Option<UpcomingBirthday> {
        self.next_birthday(&self.list_contacts())
    }

    pub fn flush(&self) -> Result<(), FarewellError> {
        self.backend.flush().map_err(FarewellError::Storage)
    }
}
