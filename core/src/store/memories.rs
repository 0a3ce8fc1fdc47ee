// Memory wall persistence
//
// Memories are stored newest-first as one JSON array. Records are never mutated
// after creation; they can only be deleted by id.

use crate::clock::{Clock, IdGenerator};
use crate::store::backend::StorageBackend;
use crate::store::collection::{load_collection, store_collection};
use crate::FarewellError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MEMORIES_KEY: &str = "farewell-memories";

/// Message length the submission form allows
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub from: String,
    pub to: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_personal: Option<bool>,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl Memory {
    pub fn is_personal(&self) -> bool {
        self.is_personal.unwrap_or(false)
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.from.to_lowercase().contains(query_lower)
            || self.to.to_lowercase().contains(query_lower)
            || self.message.to_lowercase().contains(query_lower)
    }
}

/// A memory as submitted, before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemory {
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_personal: Option<bool>,
}

impl NewMemory {
    pub fn new(from: impl Into<String>, to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message: message.into(),
            is_personal: Some(false),
        }
    }

    /// A note the author keeps about their own experience; addressed to themselves.
    pub fn personal(from: impl Into<String>, message: impl Into<String>) -> Self {
        let from = from.into();
        Self {
            to: from.clone(),
            from,
            message: message.into(),
            is_personal: Some(true),
        }
    }

    /// Apply the submission form rules: trimmed fields, `from` and `message`
    /// required, `to` required unless personal, message within the limit.
    pub fn validate(self) -> Result<Self, FarewellError> {
        let personal = self.is_personal.unwrap_or(false);
        let from = self.from.trim().to_string();
        let message = self.message.trim().to_string();
        let to = if personal {
            from.clone()
        } else {
            self.to.trim().to_string()
        };

        if from.is_empty() {
            return Err(FarewellError::InvalidInput("from is required".into()));
        }
        if message.is_empty() {
            return Err(FarewellError::InvalidInput("message is required".into()));
        }
        if to.is_empty() {
            return Err(FarewellError::InvalidInput("to is required".into()));
        }
        let len = message.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(FarewellError::InvalidInput(format!(
                "message is {} characters, limit is {}",
                len, MAX_MESSAGE_CHARS
            )));
        }

        Ok(Self {
            from,
            to,
            message,
            is_personal: Some(personal),
        })
    }
}

#[derive(Clone)]
pub struct MemoryWall {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl MemoryWall {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            backend,
            clock,
            ids,
        }
    }

    /// All memories, newest first
    pub fn list(&self) -> Vec<Memory> {
        load_collection(self.backend.as_ref(), MEMORIES_KEY)
    }

    pub fn save(&self, input: NewMemory) -> Result<Memory, FarewellError> {
        let mut memories = self.list();
        // Never go backwards relative to the current head, even if the clock does.
        let newest = memories.first().map(|m| m.timestamp).unwrap_or(0);

        let memory = Memory {
            id: self.ids.generate(),
            from: input.from,
            to: input.to,
            message: input.message,
            is_personal: input.is_personal,
            timestamp: self.clock.now_millis().max(newest),
        };

        memories.insert(0, memory.clone());
        store_collection(self.backend.as_ref(), MEMORIES_KEY, &memories)?;
        tracing::info!(id = %memory.id, total = memories.len(), "memory saved");
        Ok(memory)
    }

    /// Remove the memory with `id` and return what remains.
    pub fn delete(&self, id: &str) -> Result<Vec<Memory>, FarewellError> {
        let mut memories = self.list();
        let before = memories.len();
        memories.retain(|m| m.id != id);

        if memories.len() == before {
            tracing::debug!(id, "delete requested for unknown memory");
        }

        store_collection(self.backend.as_ref(), MEMORIES_KEY, &memories)?;
        Ok(memories)
    }

    /// Memories whose author, recipient or text contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Memory> {
        let all = self.list();
        let query = query.trim();
        if query.is_empty() {
            return all;
        }

        let query_lower = query.to_lowercase();
        all.into_iter().filter(|m| m.matches(&query_lower)).collect()
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }
}
