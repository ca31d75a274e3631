//! HTTP routes for fishdex

pub mod fish;
pub mod health;
pub mod stats;

pub use fish::{handle_catches, handle_get_fish, handle_list_fish, handle_unlock};
pub use health::health_check;
pub use stats::handle_stats;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::types::FishdexError;

/// API error body
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
    code: &'static str,
}

/// Build a JSON response with CORS headers
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(data) {
        Ok(body) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-store")
            .header("Access-Control-Allow-Origin", "*")
            .body(Full::new(Bytes::from(body)))
            .unwrap_or_else(|_| fallback_response()),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            fallback_response()
        }
    }
}

/// Render an error, logging server-side causes
pub fn error_response(err: &FishdexError) -> Response<Full<Bytes>> {
    if err.is_server_error() {
        error!(code = err.code(), "Request failed: {}", err);
    } else {
        warn!(code = err.code(), "Request rejected: {}", err);
    }

    json_response(
        err.status_code(),
        &ApiError {
            error: err.public_message(),
            code: err.code(),
        },
    )
}

fn fallback_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(
        br#"{"error":"Internal server error","code":"INTERNAL_ERROR"}"#,
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
