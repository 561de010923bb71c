//! Host-independent request and response types.
//!
//! Handlers speak these instead of the Spin types, so the whole dispatch
//! surface is testable on native targets; the `wasm32` component layer
//! converts at the boundary.

use cocoa_auth::BearerToken;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// HTTP method of an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl ApiMethod {
    /// Parse from a method string, case-insensitively.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GET" => ApiMethod::Get,
            "POST" => ApiMethod::Post,
            "PUT" => ApiMethod::Put,
            "DELETE" => ApiMethod::Delete,
            _ => ApiMethod::Other,
        }
    }
}

/// An incoming request, reduced to what the handlers need.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Request method.
    pub method: ApiMethod,
    /// Request path, without query string.
    pub path: String,
    /// Headers, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Create a request with no headers or body.
    pub fn new(method: ApiMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Attach a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize>(mut self, value: &T) -> Self {
        self.body = serde_json::to_vec(value).unwrap_or_default();
        self
    }

    /// Get a header value, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_lowercase()).map(|s| s.as_str())
    }

    /// Extract the bearer token from the Authorization header.
    pub fn bearer_token(&self) -> Option<BearerToken> {
        self.header("authorization").and_then(BearerToken::from_header)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// Content type. Always JSON today.
    pub content_type: &'static str,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// A JSON response with the given status.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Self::error(500, "internal error")
            }
        }
    }

    /// A 200 JSON response.
    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(200, value)
    }

    /// A 201 JSON response.
    pub fn created<T: Serialize>(value: &T) -> Self {
        Self::json(201, value)
    }

    /// A `{success: false, message}` failure response.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let body = json!({ "success": false, "message": message.into() });
        Self {
            status,
            content_type: "application/json",
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }
    }

    /// A 404 response.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(404, message)
    }

    /// A 401 response.
    pub fn unauthorized() -> Self {
        Self::error(401, "authentication required")
    }

    /// Parse the body as JSON (test helper).
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(ApiMethod::from_str("get"), ApiMethod::Get);
        assert_eq!(ApiMethod::from_str("POST"), ApiMethod::Post);
        assert_eq!(ApiMethod::from_str("PATCH"), ApiMethod::Other);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let req = ApiRequest::new(ApiMethod::Post, "/orders/custom")
            .with_header("Authorization", "Bearer tok_abc");
        assert_eq!(req.bearer_token().unwrap().as_str(), "tok_abc");

        let bare = ApiRequest::new(ApiMethod::Post, "/orders/custom");
        assert!(bare.bearer_token().is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ApiResponse::error(400, "no such key");
        assert_eq!(resp.status, 400);
        let body = resp.json_body();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "no such key");
    }
}
