//! Custom order submission.

use crate::api::{ApiRequest, ApiResponse};
use crate::handlers::auth::require_session;
use cocoa_auth::{Authenticator, SessionStore, UserStore};
use cocoa_commerce::checkout::{CustomOrderRequest, OrderAssembler, OrderStore};
use cocoa_commerce::CommerceError;
use serde::Serialize;

/// Wire shape of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptDto {
    order_id: i64,
    custom_config_id: i64,
    total_price: f64,
}

/// `POST /orders/custom`
///
/// Bearer-token protected. Resolution failures come back as 400,
/// persistence failures as 500; the client never supplies a total.
pub fn submit<O, U, S>(
    assembler: &OrderAssembler<O>,
    auth: &Authenticator<U, S>,
    req: &ApiRequest,
) -> ApiResponse
where
    O: OrderStore,
    U: UserStore,
    S: SessionStore,
{
    let session = match require_session(auth, req) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let body: CustomOrderRequest = match req.json() {
        Ok(body) => body,
        Err(e) => return ApiResponse::error(400, format!("malformed order body: {}", e)),
    };

    match assembler.submit(&body, session.user_id) {
        Ok(receipt) => ApiResponse::created(&ReceiptDto {
            order_id: receipt.order_id,
            custom_config_id: receipt.custom_config_id,
            total_price: receipt.total_price.to_decimal(),
        }),
        Err(CommerceError::Validation(message)) => {
            tracing::warn!(%message, "order rejected");
            ApiResponse::error(400, message)
        }
        Err(CommerceError::Persistence(message)) => {
            tracing::error!(%message, "order persistence failed");
            ApiResponse::error(500, "order could not be saved")
        }
        Err(e) => {
            tracing::error!(error = %e, "order submission failed");
            ApiResponse::error(500, "order could not be saved")
        }
    }
}
