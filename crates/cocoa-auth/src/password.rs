//! Password hashing.
//!
//! Argon2id via the `argon2` crate, using the PHC string format so hashes
//! are self-describing and parameters can be tightened without migrating
//! stored rows.

use crate::AuthError;
use argon2::password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Password hasher with default Argon2id parameters.
#[derive(Default)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password, returning a PHC-format string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC-format hash.
    pub fn verify(&self, password: &str, hash_str: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash_str).map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(self
            .argon
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Validate password strength before hashing.
    pub fn validate_password(password: &str) -> Result<(), AuthError> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());

        if !has_upper || !has_lower || !has_digit {
            return Err(AuthError::WeakPassword(
                "password must contain uppercase, lowercase, and numbers".to_string(),
            ));
        }

        Ok(())
    }
}
