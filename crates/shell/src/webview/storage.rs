//! `window.localStorage` as the snapshot store.

use async_trait::async_trait;

use billing_store::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }
}

fn storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::unavailable("no window object"))?;
    window
        .local_storage()
        .map_err(|e| StoreError::unavailable(format!("localStorage denied: {e:?}")))?
        .ok_or_else(|| StoreError::unavailable("localStorage is not available"))
}

fn backend(action: &str, key: &str, err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend(anyhow::anyhow!("failed to {action} {key:?}: {err:?}"))
}

#[async_trait(?Send)]
impl KeyValueStore for LocalStorageStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        storage()?.get_item(key).map_err(|e| backend("read", key, e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        storage()?.set_item(key, value).map_err(|e| backend("write", key, e))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        storage()?.remove_item(key).map_err(|e| backend("remove", key, e))
    }
}
