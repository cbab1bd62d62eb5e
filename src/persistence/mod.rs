//! Key-value persistence for the high score
//!
//! Features:
//! - `KeyValueStore` trait over the storage collaborator
//! - In-memory store (native runs, tests)
//! - LocalStorage store (browser)
//! - `spawn_task` to keep storage work off the frame callback

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// Storage collaborator: string keys to string values, either call may fail
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Run storage work outside the current frame (browser) or inline (native)
#[cfg(target_arch = "wasm32")]
pub fn spawn_task<F: FnOnce() + 'static>(task: F) {
    wasm_bindgen_futures::spawn_local(async move { task() });
}

/// Run storage work outside the current frame (browser) or inline (native)
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_task<F: FnOnce() + 'static>(task: F) {
    task();
}
