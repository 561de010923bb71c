//! Key-Value store wrapper with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe store backed by Spin's Key-Value Store.
///
/// Values are serialized to JSON on write and deserialized on read, so any
/// `Serialize + DeserializeOwned` type round-trips without ceremony.
pub struct Cache {
    #[cfg(target_arch = "wasm32")]
    store: spin_sdk::key_value::Store,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

impl Cache {
    /// Open the default Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store =
            spin_sdk::key_value::Store::open(name).map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    /// Get a value, or `None` if the key doesn't exist.
    ///
    /// ```rust,ignore
    /// let session: Option<AuthSession> = cache.get("session:tok_abc")?;
    /// ```
    #[cfg(target_arch = "wasm32")]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key) {
            Ok(Some(bytes)) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::Store(e.to_string())),
        }
    }

    /// Set a value, overwriting any existing entry.
    #[cfg(target_arch = "wasm32")]
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store
            .set(key, &bytes)
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    /// Delete a value.
    #[cfg(target_arch = "wasm32")]
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store
            .delete(key)
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    /// Check if a key exists.
    #[cfg(target_arch = "wasm32")]
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store
            .exists(key)
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    /// Get all keys in the store.
    #[cfg(target_arch = "wasm32")]
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store
            .get_keys()
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    // Non-WASM stubs for development/testing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> Result<Self, CacheError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn get<T: DeserializeOwned>(&self, _key: &str) -> Result<Option<T>, CacheError> {
        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set<T: Serialize>(&self, _key: &str, _value: &T) -> Result<(), CacheError> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn exists(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(vec![])
    }
}

/// Build a namespaced store key.
///
/// ```rust,ignore
/// let key = cache_key!("cart", session_id);
/// // "cart:sess_abc"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cache_key_joins_with_colons() {
        let key = cache_key!("cart", "sess_abc");
        assert_eq!(key, "cart:sess_abc");

        let key = cache_key!("session", "tok", 42);
        assert_eq!(key, "session:tok:42");
    }
}
