//! Session storage over the Key-Value store.

use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Maximum retry attempts for optimistic concurrency control.
const MAX_UPDATE_RETRIES: u32 = 3;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session record stored in the cache, generic over the payload type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session payload.
    pub data: T,
    /// Version for optimistic concurrency control.
    pub version: u64,
    /// When the session was created (Unix timestamp).
    pub created_at: u64,
    /// When the session was last accessed (Unix timestamp).
    pub last_accessed: u64,
}

/// Session manager keyed by [`SessionId`].
///
/// # Example
///
/// ```rust,ignore
/// use cocoa_cache::{Session, SessionId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Serialize, Deserialize, Default, Clone)]
/// struct StorefrontSession {
///     customer_id: Option<String>,
///     cart_id: Option<String>,
/// }
///
/// let sessions = Session::<StorefrontSession>::new()?;
/// let id = SessionId::generate();
///
/// let data = sessions.get_or_create(&id)?;
/// sessions.update(&id, |s| s.cart_id = Some("cart_1".to_string()))?;
/// ```
pub struct Session<T> {
    cache: Cache,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Create a session manager using the default store.
    pub fn new() -> Result<Self, CacheError> {
        Ok(Self {
            cache: Cache::open_default()?,
            _phantom: std::marker::PhantomData,
        })
    }

    /// Create a session manager using a named store.
    pub fn with_store(name: &str) -> Result<Self, CacheError> {
        Ok(Self {
            cache: Cache::open(name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    /// Get session data, creating a default session if it doesn't exist.
    pub fn get_or_create(&self, id: &SessionId) -> Result<T, CacheError> {
        let key = self.session_key(id);
        match self.cache.get::<SessionData<T>>(&key)? {
            Some(session_data) => Ok(session_data.data),
            None => {
                let data = T::default();
                self.set_internal(id, &data, 1)?;
                Ok(data)
            }
        }
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        let key = self.session_key(id);
        Ok(self.cache.get::<SessionData<T>>(&key)?.map(|s| s.data))
    }

    /// Set session data (unconditional write).
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let key = self.session_key(id);
        let version = self
            .cache
            .get::<SessionData<T>>(&key)?
            .map(|s| s.version + 1)
            .unwrap_or(1);
        self.set_internal(id, data, version)
    }

    fn set_internal(&self, id: &SessionId, data: &T, version: u64) -> Result<(), CacheError> {
        let key = self.session_key(id);
        let now = current_timestamp();

        let session_data = SessionData {
            id: id.clone(),
            data: data.clone(),
            version,
            created_at: now,
            last_accessed: now,
        };

        self.cache.set(&key, &session_data)
    }

    /// Delete a session.
    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        let key = self.session_key(id);
        self.cache.delete(&key)
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        let key = self.session_key(id);
        self.cache.exists(&key)
    }

    /// Update session data with a closure, using optimistic concurrency
    /// control. Retries up to [`MAX_UPDATE_RETRIES`] times when a concurrent
    /// writer is detected.
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<T, CacheError>
    where
        F: Fn(&mut T),
    {
        let key = self.session_key(id);

        for _attempt in 0..MAX_UPDATE_RETRIES {
            let current = self.cache.get::<SessionData<T>>(&key)?;

            let (mut data, expected_version) = match current {
                Some(session_data) => (session_data.data, session_data.version),
                None => (T::default(), 0),
            };

            f(&mut data);

            let new_version = expected_version + 1;
            let session_data = SessionData {
                id: id.clone(),
                data: data.clone(),
                version: new_version,
                created_at: current_timestamp(),
                last_accessed: current_timestamp(),
            };

            self.cache.set(&key, &session_data)?;

            // The KV store has no CAS; re-read and verify our version landed.
            if let Some(written) = self.cache.get::<SessionData<T>>(&key)? {
                if written.version == new_version {
                    return Ok(data);
                }
                continue;
            }

            return Ok(data);
        }

        Err(CacheError::ConcurrentModification(
            "max retries exceeded".to_string(),
        ))
    }

    fn session_key(&self, id: &SessionId) -> String {
        format!("session:{}", id)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_round_trips() {
        let id = SessionId::new("sess_choc");
        assert_eq!(id.as_str(), "sess_choc");
        assert_eq!(format!("{}", id), "sess_choc");

        let from_str: SessionId = "sess_other".into();
        assert_eq!(from_str.as_str(), "sess_other");
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();

        assert!(s.starts_with("sess_"));
        // 18 random bytes -> 24 base64 chars, plus the prefix
        assert_eq!(s.len(), 29);
    }

    #[test]
    fn test_session_id_generate_uniqueness() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_session_id_serialization_is_transparent() {
        let id = SessionId::new("sess_json");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""sess_json""#);

        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_session_id_usable_as_map_key() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(SessionId::new("a"));
        set.insert(SessionId::new("b"));
        set.insert(SessionId::new("a"));
        assert_eq!(set.len(), 2);
    }
}
