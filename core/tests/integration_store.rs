use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use farewell_core::store::{CONTACTS_KEY, MEMORIES_KEY, NAMES_KEY};
use farewell_core::{
    FarewellError, FarewellStore, FixedClock, MemoryStorage, NewContact, NewMemory,
    SequentialIds, StorageBackend,
};

mockall::mock! {
    pub Backend {}

    impl StorageBackend for Backend {
        fn get(&self, key: &str) -> Result<Option<String>, String>;
        fn put(&self, key: &str, value: &str) -> Result<(), String>;
        fn remove(&self, key: &str) -> Result<(), String>;
        fn flush(&self) -> Result<(), String>;
    }
}

fn store_with(storage: &MemoryStorage, today: NaiveDate) -> FarewellStore {
    FarewellStore::with_capabilities(
        Arc::new(storage.clone()),
        Arc::new(FixedClock::on(today)),
        Arc::new(SequentialIds::new("rec")),
    )
}

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn test_ids_unique_and_timestamps_non_decreasing() {
    let store = FarewellStore::in_memory();
    let mut ids = HashSet::new();
    let mut last = 0u64;

    for i in 0..25 {
        let memory = store
            .save_memory(NewMemory::new("A", "B", format!("note {}", i)))
            .unwrap();
        let contact = store
            .save_contact(NewContact::new(format!("C{}", i), "1"))
            .unwrap();

        assert!(ids.insert(memory.id.clone()));
        assert!(ids.insert(contact.id.clone()));
        assert!(memory.timestamp >= last);
        last = memory.timestamp;
    }
}

#[test]
fn test_n_saves_list_n_records_most_recent_first() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage, may_first());

    let saved: Vec<_> = (0..10)
        .map(|i| {
            store
                .save_memory(NewMemory::new("A", "B", format!("note {}", i)))
                .unwrap()
        })
        .collect();

    let listed = store.list_memories();
    assert_eq!(listed.len(), 10);
    let expected: Vec<_> = saved.into_iter().rev().collect();
    assert_eq!(listed, expected);

    for i in 0..4 {
        store
            .save_contact(NewContact::new(format!("C{}", i), "1"))
            .unwrap();
    }
    let contacts = store.list_contacts();
    assert_eq!(contacts.len(), 4);
    assert_eq!(contacts[0].name, "C3");
    assert_eq!(contacts[3].name, "C0");
}

#[test]
fn test_malformed_json_under_each_key_lists_empty() {
    let storage = MemoryStorage::new();
    for key in [NAMES_KEY, MEMORIES_KEY, CONTACTS_KEY] {
        storage.put(key, "{{{ definitely not json").unwrap();
    }
    let store = store_with(&storage, may_first());

    assert!(store.list_registered_names().is_empty());
    assert!(store.list_memories().is_empty());
    assert!(store.list_contacts().is_empty());
    assert!(store.upcoming_birthday().is_none());
}

#[test]
fn test_next_birthday_from_vault() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage, may_first());
    store
        .save_contact(NewContact::new("Winter", "1").with_dob("2008-01-15"))
        .unwrap();
    store
        .save_contact(NewContact::new("Summer", "2").with_dob("2008-06-01"))
        .unwrap();
    store.save_contact(NewContact::new("NoDob", "3")).unwrap();

    let upcoming = store.next_birthday(&store.list_contacts()).unwrap();
    assert_eq!(upcoming.contact.name, "Summer");
    assert_eq!(upcoming.days_until, 31);
}

#[test]
fn test_delete_unknown_memory_leaves_collection() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage, may_first());
    store.save_memory(NewMemory::new("A", "B", "one")).unwrap();
    store.save_memory(NewMemory::personal("C", "two")).unwrap();

    let raw_before = storage.get(MEMORIES_KEY).unwrap();
    let after = store.delete_memory("rec-999").unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(storage.get(MEMORIES_KEY).unwrap(), raw_before);
}

#[test]
fn test_reads_what_the_browser_wrote() {
    let storage = MemoryStorage::new();
    storage.put(NAMES_KEY, r#"["Aarav","Zoya"]"#).unwrap();
    storage
        .put(
            MEMORIES_KEY,
            r#"[{"id":"5f0c","from":"Zoya","to":"Zoya","message":"My year","isPersonal":true,"timestamp":1718000000000}]"#,
        )
        .unwrap();
    let store = store_with(&storage, may_first());

    assert_eq!(store.list_registered_names(), vec!["Aarav", "Zoya"]);
    let names = store.register_name("Meher").unwrap();
    assert_eq!(names, vec!["Aarav", "Meher", "Zoya"]);

    let memories = store.list_memories();
    assert!(memories[0].is_personal());

    let saved = store.save_memory(NewMemory::new("Aarav", "Zoya", "hi")).unwrap();
    assert_eq!(saved.timestamp, 1_718_000_000_000);
}

#[test]
fn test_backend_read_failure_lists_empty() {
    let mut backend = MockBackend::new();
    backend
        .expect_get()
        .returning(|_| Err("storage unavailable".to_string()));
    let store = FarewellStore::new(Arc::new(backend));

    assert!(store.list_registered_names().is_empty());
    assert!(store.list_memories().is_empty());
    assert!(store.list_contacts().is_empty());
}

#[test]
fn test_backend_write_failure_is_reported() {
    let mut backend = MockBackend::new();
    backend.expect_get().returning(|_| Ok(None));
    backend
        .expect_put()
        .returning(|_, _| Err("quota exceeded".to_string()));
    let store = FarewellStore::new(Arc::new(backend));

    let err = store.register_name("Asha").unwrap_err();
    assert!(matches!(err, FarewellError::Storage(ref msg) if msg == "quota exceeded"));
    assert!(store
        .save_memory(NewMemory::new("A", "B", "hi"))
        .is_err());
}

#[test]
fn test_blank_name_never_writes() {
    let mut backend = MockBackend::new();
    backend.expect_get().returning(|_| Ok(None));
    backend.expect_put().never();
    let store = FarewellStore::new(Arc::new(backend));

    assert!(store.register_name("").unwrap().is_empty());
    assert!(store.register_name("   ").unwrap().is_empty());
}
