//! User types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A registered user, as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Database row id.
    pub id: i64,
    /// Email address (unique).
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Authorization role.
    pub role: Role,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl User {
    /// Create a new user record.
    pub fn new(id: i64, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = current_timestamp();
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::Customer,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Check if the user has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.role.has_permission(required)
    }

    /// Update the password hash.
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.updated_at = current_timestamp();
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

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Role::Customer));
        assert!(Role::Admin.has_permission(Role::Admin));
        assert!(!Role::Customer.has_permission(Role::Admin));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("customer".parse(), Ok(Role::Customer));
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert_eq!("superuser".parse::<Role>(), Err(()));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        // Matches the TEXT values in the users table.
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""customer""#).unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_user_defaults_to_customer() {
        let user = User::new(1, "truffle@example.com", "$argon2id$...");
        assert_eq!(user.role, Role::Customer);
        assert!(!user.has_permission(Role::Admin));
    }

    #[test]
    fn test_user_with_role() {
        let admin = User::new(2, "shop@example.com", "$argon2id$...").with_role(Role::Admin);
        assert!(admin.has_permission(Role::Admin));
    }
}
