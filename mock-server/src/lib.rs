//! In-process imitation of the Pingdom API used by the client tests.
//!
//! Routes:
//! - `GET /` returns `{"A":"a"}` with Pingdom's rate-limit headers
//! - `POST|PUT /echo` returns the JSON body it received
//! - `GET /checks`, `GET /checks/{id}` require `Authorization: Bearer <token>`
//! - `GET /status/{code}` answers `code` with a Pingdom error envelope
//! - `GET /mismatch` answers 500 with an envelope whose `statuscode` is 400
//! - `GET /plain-error` answers 502 with a plain-text body
//! - `GET /headers` echoes the request's authorization and content-type
//! - `GET /binary` answers 200 with a body that is not UTF-8
//! - `GET /oversized` answers 200 with a body of `OVERSIZED_BODY_BYTES`

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub id: u64,
    pub name: String,
    pub hostname: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckList {
    pub checks: Vec<Check>,
}

#[derive(Debug)]
pub struct AppState {
    token: String,
    checks: Vec<Check>,
}

type Shared = Arc<AppState>;

pub const RATE_LIMIT_SHORT: &str = "Remaining: 394 Time until reset: 3589";
pub const RATE_LIMIT_LONG: &str = "Remaining: 47873 Time until reset: 2592000";

/// One byte over the client's response body limit.
pub const OVERSIZED_BODY_BYTES: usize = 10 * 1024 * 1024 + 1;

pub fn fixture_checks() -> Vec<Check> {
    vec![
        Check {
            id: 85975,
            name: "My check 1".to_string(),
            hostname: "example.com".to_string(),
        },
        Check {
            id: 161748,
            name: "My check 2".to_string(),
            hostname: "mydomain.com".to_string(),
        },
    ]
}

/// Router accepting `token` as the only valid bearer credential.
pub fn app(token: &str) -> Router {
    let state: Shared = Arc::new(AppState {
        token: token.to_string(),
        checks: fixture_checks(),
    });
    Router::new()
        .route("/", get(root))
        .route("/echo", post(echo).put(echo))
        .route("/checks", get(list_checks))
        .route("/checks/{id}", get(get_check))
        .route("/status/{code}", get(status))
        .route("/mismatch", get(mismatch))
        .route("/plain-error", get(plain_error))
        .route("/headers", get(echo_headers).post(echo_headers))
        .route("/binary", get(binary))
        .route("/oversized", get(oversized))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock Pingdom API listening");
    }
    axum::serve(listener, app(token)).await
}

/// Pingdom-shaped error response.
pub fn error_response(status: StatusCode, inner_code: u16, message: &str) -> Response {
    let desc = StatusCode::from_u16(inner_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default();
    let body = json!({
        "error": {
            "statuscode": inner_code,
            "statusdesc": desc,
            "errormessage": message,
        }
    });
    (status, Json(body)).into_response()
}

async fn root() -> Response {
    (
        [("req-limit-short", RATE_LIMIT_SHORT), ("req-limit-long", RATE_LIMIT_LONG)],
        Json(json!({"A": "a"})),
    )
        .into_response()
}

async fn binary() -> Response {
    (StatusCode::OK, vec![0xffu8, 0xfe, 0xfd]).into_response()
}

async fn oversized() -> Response {
    (StatusCode::OK, "a".repeat(OVERSIZED_BODY_BYTES)).into_response()
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

fn authorized(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", state.token);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(error_response(StatusCode::FORBIDDEN, 403, "Invalid token")),
        None => Err(error_response(StatusCode::UNAUTHORIZED, 401, "Missing authorization header")),
    }
}

async fn list_checks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&state, &headers) {
        return rejection;
    }
    Json(CheckList {
        checks: state.checks.clone(),
    })
    .into_response()
}

async fn get_check(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(rejection) = authorized(&state, &headers) {
        return rejection;
    }
    match state.checks.iter().find(|c| c.id == id) {
        Some(check) => Json(json!({ "check": check })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, 404, &format!("Check id {id} not found")),
    }
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => error_response(status, code, "This is an error"),
        Err(_) => error_response(StatusCode::BAD_REQUEST, 400, "Invalid status code"),
    }
}

async fn mismatch() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, 400, "inner code differs from status line")
}

async fn plain_error() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let value_of = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "authorization": value_of(header::AUTHORIZATION),
        "content_type": value_of(header::CONTENT_TYPE),
    }))
}
