//! Login and token verification.

use crate::password::PasswordHasher;
use crate::session::{AuthSession, SessionStore};
use crate::token::BearerToken;
use crate::user::User;
use crate::AuthError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Lookup seam for user records.
///
/// Production uses a SQL-backed implementation in the storefront; tests
/// inject [`MemoryUserStore`].
pub trait UserStore {
    /// Find a user by email.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
}

/// In-memory user store for tests and native development.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user, keyed by email.
    pub fn insert(&self, user: User) {
        let mut users = self.users.lock().expect("user store poisoned");
        users.insert(user.email.clone(), user);
    }
}

impl UserStore for MemoryUserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self
            .users
            .lock()
            .map_err(|_| AuthError::Internal("user store poisoned".to_string()))?;
        Ok(users.get(email).cloned())
    }
}

/// Authentication service: password login and bearer-token verification.
pub struct Authenticator<U, S> {
    users: U,
    sessions: S,
    hasher: PasswordHasher,
}

impl<U: UserStore, S: SessionStore> Authenticator<U, S> {
    /// Create an authenticator over the given stores.
    pub fn new(users: U, sessions: S) -> Self {
        Self {
            users,
            sessions,
            hasher: PasswordHasher::new(),
        }
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`,
    /// so callers can't enumerate accounts.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let session = AuthSession::for_user(&user);
        self.sessions.put(&session)?;
        Ok(session)
    }

    /// Resolve a bearer token into a live session.
    ///
    /// Expired sessions are revoked on sight.
    pub fn authenticate(&self, token: &BearerToken) -> Result<AuthSession, AuthError> {
        let session = self
            .sessions
            .get(token)?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired() {
            self.sessions.revoke(token)?;
            return Err(AuthError::SessionExpired);
        }

        Ok(session)
    }

    /// End a session.
    pub fn logout(&self, token: &BearerToken) -> Result<(), AuthError> {
        self.sessions.revoke(token)
    }

    /// Access the session store.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn authenticator_with_user(
        email: &str,
        password: &str,
    ) -> Authenticator<MemoryUserStore, MemorySessionStore> {
        let hasher = PasswordHasher::new();
        let users = MemoryUserStore::new();
        users.insert(User::new(1, email, hasher.hash(password).unwrap()));
        Authenticator::new(users, MemorySessionStore::new())
    }

    #[test]
    fn test_login_success() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let session = auth.login("ganache@example.com", "DarkSecret1").unwrap();
        assert_eq!(session.user_id, 1);

        // The token round-trips through authenticate
        let resolved = auth.authenticate(&session.token).unwrap();
        assert_eq!(resolved, session);
    }

    #[test]
    fn test_login_wrong_password() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let result = auth.login("ganache@example.com", "WrongSecret1");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_login_unknown_email_same_error() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let result = auth.login("nobody@example.com", "DarkSecret1");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_unknown_token() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let result = auth.authenticate(&BearerToken::new("tok_forged"));
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn test_authenticate_expired_session_is_revoked() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let session = auth.login("ganache@example.com", "DarkSecret1").unwrap();

        // Force expiry and re-store
        let expired = session.clone().with_duration(-1);
        auth.sessions().put(&expired).unwrap();

        let result = auth.authenticate(&session.token);
        assert!(matches!(result, Err(AuthError::SessionExpired)));

        // A second attempt finds nothing at all
        let result = auth.authenticate(&session.token);
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn test_logout() {
        let auth = authenticator_with_user("ganache@example.com", "DarkSecret1");
        let session = auth.login("ganache@example.com", "DarkSecret1").unwrap();
        auth.logout(&session.token).unwrap();
        assert!(auth.authenticate(&session.token).is_err());
    }
}
