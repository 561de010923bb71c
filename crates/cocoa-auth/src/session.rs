//! Bearer-token sessions.

use crate::token::BearerToken;
use crate::user::{Role, User};
use crate::AuthError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// An authenticated session, stored keyed by its bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    /// The bearer token identifying this session.
    pub token: BearerToken,
    /// The authenticated user's row id.
    pub user_id: i64,
    /// Role captured at login time.
    pub role: Role,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp when the session expires.
    pub expires_at: i64,
}

impl AuthSession {
    /// Default session duration: 24 hours.
    pub const DEFAULT_DURATION_SECS: i64 = 24 * 60 * 60;

    /// Create a session for a user with a freshly generated token.
    pub fn for_user(user: &User) -> Self {
        let now = current_timestamp();
        Self {
            token: BearerToken::generate(),
            user_id: user.id,
            role: user.role,
            created_at: now,
            expires_at: now + Self::DEFAULT_DURATION_SECS,
        }
    }

    /// Override the session duration.
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.expires_at = self.created_at + duration_secs;
        self
    }

    /// Check if the session is expired.
    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    /// Validate the session, returning an error if expired.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Get time until expiration in seconds.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - current_timestamp()).max(0)
    }

    /// Get the store key for this session.
    pub fn cache_key(&self) -> String {
        session_key(&self.token)
    }
}

/// Store key for a session token.
fn session_key(token: &BearerToken) -> String {
    format!("session:{}", token)
}

/// Persistence seam for sessions.
///
/// The storefront uses [`KvSessionStore`] in production and
/// [`MemorySessionStore`] in tests (the Key-Value store is only live on
/// `wasm32`).
pub trait SessionStore {
    /// Look up a session by token.
    fn get(&self, token: &BearerToken) -> Result<Option<AuthSession>, AuthError>;

    /// Persist a session.
    fn put(&self, session: &AuthSession) -> Result<(), AuthError>;

    /// Remove a session.
    fn revoke(&self, token: &BearerToken) -> Result<(), AuthError>;
}

/// Session store over the Key-Value cache.
pub struct KvSessionStore {
    cache: cocoa_cache::Cache,
}

impl KvSessionStore {
    /// Open the default Key-Value store.
    pub fn open_default() -> Result<Self, AuthError> {
        Ok(Self {
            cache: cocoa_cache::Cache::open_default()?,
        })
    }
}

impl SessionStore for KvSessionStore {
    fn get(&self, token: &BearerToken) -> Result<Option<AuthSession>, AuthError> {
        Ok(self.cache.get(&session_key(token))?)
    }

    fn put(&self, session: &AuthSession) -> Result<(), AuthError> {
        Ok(self.cache.set(&session.cache_key(), session)?)
    }

    fn revoke(&self, token: &BearerToken) -> Result<(), AuthError> {
        Ok(self.cache.delete(&session_key(token))?)
    }
}

/// In-memory session store for tests and native development.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, AuthSession>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, token: &BearerToken) -> Result<Option<AuthSession>, AuthError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Internal("session store poisoned".to_string()))?;
        Ok(sessions.get(token.as_str()).cloned())
    }

    fn put(&self, session: &AuthSession) -> Result<(), AuthError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Internal("session store poisoned".to_string()))?;
        sessions.insert(session.token.as_str().to_string(), session.clone());
        Ok(())
    }

    fn revoke(&self, token: &BearerToken) -> Result<(), AuthError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| AuthError::Internal("session store poisoned".to_string()))?;
        sessions.remove(token.as_str());
        Ok(())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> User {
        User::new(7, "praline@example.com", "$argon2id$...")
    }

    #[test]
    fn test_session_for_user() {
        let session = AuthSession::for_user(&customer());
        assert_eq!(session.user_id, 7);
        assert_eq!(session.role, Role::Customer);
        assert!(!session.is_expired());
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_session_expiry() {
        let session = AuthSession::for_user(&customer()).with_duration(-1);
        assert!(session.is_expired());
        assert!(matches!(
            session.validate(),
            Err(AuthError::SessionExpired)
        ));
        assert_eq!(session.time_to_expiry(), 0);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let session = AuthSession::for_user(&customer());
        store.put(&session).unwrap();

        let found = store.get(&session.token).unwrap();
        assert_eq!(found, Some(session.clone()));

        store.revoke(&session.token).unwrap();
        assert_eq!(store.get(&session.token).unwrap(), None);
    }

    #[test]
    fn test_memory_store_unknown_token() {
        let store = MemorySessionStore::new();
        let missing = store.get(&BearerToken::new("tok_missing")).unwrap();
        assert!(missing.is_none());
    }
}
