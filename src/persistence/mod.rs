//! LocalStorage persistence
//!
//! Values are stored as JSON strings. On native targets there is no storage:
//! loads find nothing and saves are dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Load and decode a value (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{key}' in LocalStorage: {e}");
            None
        }
    }
}

/// Encode and store a value (WASM only). Returns true if it was written.
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
    let Some(storage) = local_storage() else {
        return false;
    };
    match serde_json::to_string(value) {
        Ok(json) => match storage.set_item(key, &json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to write '{key}' to LocalStorage: {e:?}");
                false
            }
        },
        Err(e) => {
            log::error!("Failed to encode '{key}': {e}");
            false
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(_key: &str, _value: &T) -> bool {
    // No-op for native
    false
}
