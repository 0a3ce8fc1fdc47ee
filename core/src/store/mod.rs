// Store module: the three farewell collections over a pluggable backend

pub mod backend;
pub mod collection;
pub mod contacts;
pub mod memories;
pub mod names;

pub use backend::{MemoryStorage, StorageBackend};
#[cfg(not(target_arch = "wasm32"))]
pub use backend::SledStorage;
pub use contacts::{Contact, ContactVault, NewContact, CONTACTS_KEY};
pub use memories::{Memory, MemoryWall, NewMemory, MAX_MESSAGE_CHARS, MEMORIES_KEY};
pub use names::{NameRegistry, NAMES_KEY};
