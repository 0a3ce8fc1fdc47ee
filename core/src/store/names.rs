// Registered classmate names
//
// The list is kept deduplicated (exact, trimmed match) and sorted with a
// locale-style comparator after every insert.

use crate::store::backend::StorageBackend;
use crate::store::collection::{load_collection, store_collection};
use crate::FarewellError;
use std::cmp::Ordering;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const NAMES_KEY: &str = "farewell-names";

/// Base letters first, then accents, then case (lowercase first).
///
/// Mirrors how browsers order names for an English locale: "bob" sorts before
/// "Charlie", "Émile" before "Eshan", "Chloe" before "Chloé", and "alice"
/// before "Alice".
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> Vec<char> {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect()
    };
    let accented = |s: &str| -> Vec<char> { s.nfd().flat_map(char::to_lowercase).collect() };

    base(a)
        .cmp(&base(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| case_cmp(a, b))
        .then_with(|| a.cmp(b))
}

fn case_cmp(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.nfd().zip(b.nfd()) {
        if ca != cb {
            match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => return Ordering::Equal,
            }
        }
    }
    Ordering::Equal
}

#[derive(Clone)]
pub struct NameRegistry {
    backend: Arc<dyn StorageBackend>,
}

impl NameRegistry {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn list(&self) -> Vec<String> {
        load_collection(self.backend.as_ref(), NAMES_KEY)
    }

    /// Register `name`, returning the updated list.
    ///
    /// Blank or already-present names leave storage untouched.
    pub fn register(&self, name: &str) -> Result<Vec<String>, FarewellError> {
        let mut names = self.list();
        let trimmed = name.trim();

        if trimmed.is_empty() || names.iter().any(|n| n == trimmed) {
            return Ok(names);
        }

        names.push(trimmed.to_string());
        names.sort_by(|a, b| locale_cmp(a, b));
        store_collection(self.backend.as_ref(), NAMES_KEY, &names)?;
        tracing::info!(name = trimmed, total = names.len(), "name registered");
        Ok(names)
    }

    /// Names containing `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<String> {
        let query_lower = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|n| n.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::MemoryStorage;

    fn registry() -> (MemoryStorage, NameRegistry) {
        let storage = MemoryStorage::new();
        let registry = NameRegistry::new(Arc::new(storage.clone()));
        (storage, registry)
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("bob", "Charlie"), Ordering::Less);
        assert_eq!(locale_cmp("Charlie", "bob"), Ordering::Greater);
        assert_eq!(locale_cmp("alice", "Alice"), Ordering::Less);
        assert_eq!(locale_cmp("Ann", "Anna"), Ordering::Less);
        assert_eq!(locale_cmp("Zed", "Zed"), Ordering::Equal);
    }

    #[test]
    fn test_locale_cmp_accents_are_secondary() {
        assert_eq!(locale_cmp("Émile", "Eshan"), Ordering::Less);
        assert_eq!(locale_cmp("Öykü", "Pranav"), Ordering::Less);
        assert_eq!(locale_cmp("Chloe", "Chloé"), Ordering::Less);
        assert_eq!(locale_cmp("chloé", "Chloe"), Ordering::Greater);
        assert_eq!(locale_cmp("émile", "Émile"), Ordering::Less);
        // Precomposed and decomposed spellings still order deterministically
        assert_ne!(locale_cmp("Chlo\u{e9}", "Chloe\u{301}"), Ordering::Equal);
    }

    #[test]
    fn test_register_sorts_accented_names() {
        let (_, registry) = registry();
        let mut names = Vec::new();
        for name in ["Zoya", "Émile", "Eshan", "Öykü", "Pranav", "Chloé", "Chloe"] {
            names = registry.register(name).unwrap();
        }
        assert_eq!(
            names,
            vec!["Chloe", "Chloé", "Émile", "Eshan", "Öykü", "Pranav", "Zoya"]
        );
    }

    #[test]
    fn test_register_trims_and_sorts() {
        let (_, registry) = registry();
        registry.register("  Meera ").unwrap();
        registry.register("arjun").unwrap();
        let names = registry.register("Kabir").unwrap();
        assert_eq!(names, vec!["arjun", "Kabir", "Meera"]);
        assert_eq!(registry.list(), names);
    }

    #[test]
    fn test_register_duplicate_is_noop() {
        let (_, registry) = registry();
        registry.register("Meera").unwrap();
        let names = registry.register(" Meera").unwrap();
        assert_eq!(names, vec!["Meera"]);
    }

    #[test]
    fn test_register_is_case_sensitive() {
        let (_, registry) = registry();
        registry.register("meera").unwrap();
        let names = registry.register("Meera").unwrap();
        assert_eq!(names, vec!["meera", "Meera"]);
    }

    #[test]
    fn test_register_blank_does_not_write() {
        let (storage, registry) = registry();
        assert!(registry.register("").unwrap().is_empty());
        assert!(registry.register("   ").unwrap().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_register_over_corrupt_storage_starts_fresh() {
        let (storage, registry) = registry();
        storage.put(NAMES_KEY, "not-json").unwrap();
        assert!(registry.list().is_empty());
        assert_eq!(registry.register("Ira").unwrap(), vec!["Ira"]);
    }

    #[test]
    fn test_search_names() {
        let (_, registry) = registry();
        for name in ["Meera", "Amir", "Kabir"] {
            registry.register(name).unwrap();
        }
        assert_eq!(registry.search("IR"), vec!["Amir", "Kabir"]);
        assert_eq!(registry.search("").len(), 3);
        assert_eq!(registry.count(), 3);
    }
}
