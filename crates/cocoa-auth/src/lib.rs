//! Customer and admin authentication for CocoaCraft.
//!
//! Password login (Argon2id), bearer-token sessions in the Key-Value store,
//! and role-based authorization for protected storefront endpoints.

mod error;
mod password;
mod service;
mod session;
mod token;
mod user;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use service::{Authenticator, MemoryUserStore, UserStore};
pub use session::{AuthSession, KvSessionStore, MemorySessionStore, SessionStore};
pub use token::BearerToken;
pub use user::{Role, User};
