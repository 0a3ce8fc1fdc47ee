// Browser storage backend: window.localStorage
//
// The handle is looked up on every call instead of being held, so the backend
// stays Send + Sync and works from any module that has a window.

use farewell_core::StorageBackend;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    /// Whether this context exposes localStorage at all (workers and some
    /// privacy modes do not)
    pub fn is_available() -> bool {
        local_storage().is_ok()
    }
}

fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "no window in this context".to_string())?;
    window
        .local_storage()
        .map_err(|e| format!("localStorage access denied: {:?}", e))?
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl StorageBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        local_storage()?
            .get_item(key)
            .map_err(|e| format!("localStorage read failed: {:?}", e))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), String> {
        // Throws QuotaExceededError when the origin is full
        local_storage()?
            .set_item(key, value)
            .map_err(|e| format!("localStorage write failed: {:?}", e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| format!("localStorage remove failed: {:?}", e))
    }

    fn flush(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_roundtrip() {
        assert!(LocalStorageBackend::is_available());
        let backend = LocalStorageBackend::new();

        backend.put("farewell-test-key", "[1,2]").unwrap();
        assert_eq!(
            backend.get("farewell-test-key").unwrap().as_deref(),
            Some("[1,2]")
        );

        backend.remove("farewell-test-key").unwrap();
        assert_eq!(backend.get("farewell-test-key").unwrap(), None);
    }
}
