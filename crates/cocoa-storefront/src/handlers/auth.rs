//! Login endpoint.

use crate::api::{ApiRequest, ApiResponse};
use cocoa_auth::{Authenticator, SessionStore, UserStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: i64,
}

/// `POST /auth/login`
pub fn login<U: UserStore, S: SessionStore>(
    auth: &Authenticator<U, S>,
    req: &ApiRequest,
) -> ApiResponse {
    let body: LoginRequest = match req.json() {
        Ok(body) => body,
        Err(_) => return ApiResponse::error(400, "malformed login body"),
    };

    match auth.login(&body.email, &body.password) {
        Ok(session) => {
            tracing::info!(user_id = session.user_id, "login succeeded");
            ApiResponse::ok(&LoginResponse {
                token: session.token.as_str().to_string(),
                expires_at: session.expires_at,
            })
        }
        Err(e) if e.is_auth_failure() => ApiResponse::error(401, "invalid credentials"),
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            ApiResponse::error(500, "login unavailable")
        }
    }
}

/// Resolve the request's bearer token into a session, or a 401.
pub fn require_session<U: UserStore, S: SessionStore>(
    auth: &Authenticator<U, S>,
    req: &ApiRequest,
) -> Result<cocoa_auth::AuthSession, ApiResponse> {
    let token = match req.bearer_token() {
        Some(token) => token,
        None => return Err(ApiResponse::unauthorized()),
    };

    match auth.authenticate(&token) {
        Ok(session) => Ok(session),
        Err(e) if e.is_auth_failure() => Err(ApiResponse::unauthorized()),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            Err(ApiResponse::error(500, "authentication unavailable"))
        }
    }
}
