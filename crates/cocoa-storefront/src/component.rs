//! Spin HTTP component wiring (`wasm32` only).

use crate::api::{ApiMethod, ApiRequest};
use crate::router::Storefront;
use crate::store::{SqliteProductStore, SqliteUserStore};
use cocoa_auth::{Authenticator, KvSessionStore};
use cocoa_commerce::checkout::{OrderAssembler, SqliteOrderStore};
use spin_sdk::http::{IntoResponse, Method, Request, Response};
use spin_sdk::http_component;

#[http_component]
fn handle_storefront(req: Request) -> anyhow::Result<impl IntoResponse> {
    let storefront = Storefront::new(
        SqliteProductStore::open_default()?,
        OrderAssembler::new(SqliteOrderStore::open_default()?),
        Authenticator::new(SqliteUserStore::open_default()?, KvSessionStore::open_default()?),
    );

    let api_request = to_api_request(req);
    let api_response = storefront.dispatch(&api_request);

    Ok(Response::builder()
        .status(api_response.status)
        .header("content-type", api_response.content_type)
        .body(api_response.body)
        .build())
}

fn to_api_request(req: Request) -> ApiRequest {
    let method = match *req.method() {
        Method::Get => ApiMethod::Get,
        Method::Post => ApiMethod::Post,
        Method::Put => ApiMethod::Put,
        Method::Delete => ApiMethod::Delete,
        _ => ApiMethod::Other,
    };

    let path = req.path().to_string();

    let mut api_request = ApiRequest::new(method, path);
    for (key, value) in req.headers() {
        api_request = api_request.with_header(key, value.as_str().unwrap_or(""));
    }
    api_request.body = req.into_body();
    api_request
}
