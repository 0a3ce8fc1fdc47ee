// Contact vault persistence
//
// Contacts are append-only: created on submission, listed newest-first, never
// edited or removed.

use crate::clock::{Clock, IdGenerator};
use crate::store::backend::StorageBackend;
use crate::store::collection::{load_collection, store_collection};
use crate::FarewellError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CONTACTS_KEY: &str = "farewell-contacts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Date of birth as an ISO date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub classmates_only: bool,
    pub timestamp: u64,
}

impl Contact {
    fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self
                .city
                .as_ref()
                .map_or(false, |c| c.to_lowercase().contains(query_lower))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default = "default_classmates_only")]
    pub classmates_only: bool,
}

fn default_classmates_only() -> bool {
    true
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewContact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            classmates_only: true,
            ..Default::default()
        }
    }

    pub fn with_dob(mut self, dob: impl Into<String>) -> Self {
        self.dob = Some(dob.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Trim every field, drop blank optional fields, require name and phone.
    pub fn validate(self) -> Result<Self, FarewellError> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();

        if name.is_empty() {
            return Err(FarewellError::InvalidInput("name is required".into()));
        }
        if phone.is_empty() {
            return Err(FarewellError::InvalidInput("phone is required".into()));
        }

        let dob = non_blank(self.dob);
        if let Some(ref d) = dob {
            if crate::birthday::parse_dob(d).is_none() {
                return Err(FarewellError::InvalidInput(format!(
                    "dob must be YYYY-MM-DD, got {}",
                    d
                )));
            }
        }

        Ok(Self {
            name,
            phone,
            dob,
            email: non_blank(self.email),
            social: non_blank(self.social),
            city: non_blank(self.city),
            classmates_only: self.classmates_only,
        })
    }
}

#[derive(Clone)]
pub struct ContactVault {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ContactVault {
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

    /// All contacts, newest first
    pub fn list(&self) -> Vec<Contact> {
        load_collection(self.backend.as_ref(), CONTACTS_KEY)
    }

    pub fn save(&self, input: NewContact) -> Result<Contact, FarewellError> {
        let mut contacts = self.list();
        let newest = contacts.first().map(|c| c.timestamp).unwrap_or(0);

        let contact = Contact {
            id: self.ids.generate(),
            name: input.name,
            phone: input.phone,
            dob: input.dob,
            email: input.email,
            social: input.social,
            city: input.city,
            classmates_only: input.classmates_only,
            timestamp: self.clock.now_millis().max(newest),
        };

        contacts.insert(0, contact.clone());
        store_collection(self.backend.as_ref(), CONTACTS_KEY, &contacts)?;
        tracing::info!(id = %contact.id, total = contacts.len(), "contact saved");
        Ok(contact)
    }

    /// Contacts whose name or city contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Contact> {
        let all = self.list();
        let query = query.trim();
        if query.is_empty() {
            return all;
        }

        let query_lower = query.to_lowercase();
        all.into_iter().filter(|c| c.matches(&query_lower)).collect()
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }
}
