// farewell-wasm: WebAssembly bindings for the browser front end

pub mod storage;

use crate::storage::LocalStorageBackend;
use farewell_core::{
    Contact, FarewellStore as CoreStore, MemoryStorage, NewContact, NewMemory, QuoteDeck,
};
use serde::Serialize;
use std::sync::{Arc, Once};
use wasm_bindgen::prelude::*;

static LOGGING: Once = Once::new();

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}

/// Serialize to plain JS values: objects rather than Maps, `null` for `None`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct FarewellStore {
    inner: CoreStore,
    quotes: QuoteDeck,
    birthday_wishes: QuoteDeck,
}

#[wasm_bindgen]
impl FarewellStore {
    /// Store over `window.localStorage`
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        init_logging();
        if !LocalStorageBackend::is_available() {
            tracing::warn!("localStorage unavailable; reads will be empty and writes will fail");
        }
        Self::from_core(CoreStore::new(Arc::new(LocalStorageBackend::new())))
    }

    /// Store that forgets everything when the page unloads
    #[wasm_bindgen(js_name = inMemory)]
    pub fn in_memory() -> Self {
        init_logging();
        Self::from_core(CoreStore::new(Arc::new(MemoryStorage::new())))
    }

    fn from_core(inner: CoreStore) -> Self {
        Self {
            inner,
            quotes: QuoteDeck::friendship(),
            birthday_wishes: QuoteDeck::birthday(),
        }
    }

    #[wasm_bindgen(js_name = listRegisteredNames)]
    pub fn list_registered_names(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.list_registered_names())
    }

    #[wasm_bindgen(js_name = registerName)]
    pub fn register_name(&self, name: &str) -> Result<JsValue, JsValue> {
        let names = self.inner.register_name(name).map_err(js_err)?;
        to_js(&names)
    }

    #[wasm_bindgen(js_name = searchRegisteredNames)]
    pub fn search_registered_names(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_registered_names(query))
    }

    #[wasm_bindgen(js_name = listMemories)]
    pub fn list_memories(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.list_memories())
    }

    /// Accepts `{ from, to, message, isPersonal? }`
    #[wasm_bindgen(js_name = saveMemory)]
    pub fn save_memory(&self, input: JsValue) -> Result<JsValue, JsValue> {
        let input: NewMemory = serde_wasm_bindgen::from_value(input).map_err(js_err)?;
        let saved = self.inner.save_memory(input).map_err(js_err)?;
        to_js(&saved)
    }

    #[wasm_bindgen(js_name = deleteMemory)]
    pub fn delete_memory(&self, id: &str) -> Result<JsValue, JsValue> {
        let remaining = self.inner.delete_memory(id).map_err(js_err)?;
        to_js(&remaining)
    }

    #[wasm_bindgen(js_name = searchMemories)]
    pub fn search_memories(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_memories(query))
    }

    #[wasm_bindgen(js_name = listContacts)]
    pub fn list_contacts(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.list_contacts())
    }

    /// Accepts `{ name, phone, dob?, email?, social?, city?, classmatesOnly }`
    #[wasm_bindgen(js_name = saveContact)]
    pub fn save_contact(&self, input: JsValue) -> Result<JsValue, JsValue> {
        let input: NewContact = serde_wasm_bindgen::from_value(input).map_err(js_err)?;
        let saved = self.inner.save_contact(input).map_err(js_err)?;
        to_js(&saved)
    }

    #[wasm_bindgen(js_name = searchContacts)]
    pub fn search_contacts(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_contacts(query))
    }

    /// `{ contact, daysUntil }` for the soonest birthday in `contacts`, or `null`
    #[wasm_bindgen(js_name = nextBirthday)]
    pub fn next_birthday(&self, contacts: JsValue) -> Result<JsValue, JsValue> {
        let contacts: Vec<Contact> = serde_wasm_bindgen::from_value(contacts).map_err(js_err)?;
        to_js(&self.inner.next_birthday(&contacts))
    }

    #[wasm_bindgen(js_name = upcomingBirthday)]
    pub fn upcoming_birthday(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.upcoming_birthday())
    }

    #[wasm_bindgen(js_name = randomQuote)]
    pub fn random_quote(&mut self) -> Option<String> {
        self.quotes.next_quote().map(str::to_string)
    }

    #[wasm_bindgen(js_name = birthdayWish)]
    pub fn birthday_wish(&mut self) -> Option<String> {
        self.birthday_wishes.next_quote().map(str::to_string)
    }
}
