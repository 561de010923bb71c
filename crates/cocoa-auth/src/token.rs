//! Bearer tokens.

use serde::{Deserialize, Serialize};

/// An opaque bearer token identifying an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token from an existing string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a cryptographically secure token.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 24] = rand::thread_rng().gen();
        Self(format!("tok_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Extract a token from an `Authorization` header value.
    ///
    /// Returns `None` unless the value has the `Bearer <token>` shape.
    pub fn from_header(value: &str) -> Option<Self> {
        let rest = value.strip_prefix("Bearer ")?;
        let rest = rest.trim();
        if rest.is_empty() {
            None
        } else {
            Some(Self(rest.to_string()))
        }
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BearerToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BearerToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let token = BearerToken::generate();
        let s = token.as_str();

        assert!(s.starts_with("tok_"));
        // 24 random bytes -> 32 base64 chars, plus the prefix
        assert_eq!(s.len(), 36);
        assert!(s[4..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generated_tokens_unique() {
        let tokens: Vec<String> = (0..100)
            .map(|_| BearerToken::generate().0)
            .collect();

        for i in 0..tokens.len() {
            for j in (i + 1)..tokens.len() {
                assert_ne!(tokens[i], tokens[j]);
            }
        }
    }

    #[test]
    fn test_from_header() {
        let token = BearerToken::from_header("Bearer tok_abc123").unwrap();
        assert_eq!(token.as_str(), "tok_abc123");
    }

    #[test]
    fn test_from_header_rejects_other_schemes() {
        assert!(BearerToken::from_header("Basic dXNlcjpwYXNz").is_none());
        assert!(BearerToken::from_header("tok_abc123").is_none());
        assert!(BearerToken::from_header("Bearer ").is_none());
        assert!(BearerToken::from_header("").is_none());
    }
}
