//! Liveness probe
//!
//! `/health` and `/healthz` answer 200 while the process is serving. Storage is
//! not touched; a broken store shows up as 500s on the API routes instead.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::json_response;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// "mongodb" or "memory"
    pub storage: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
}

pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        storage: state.fish.backend(),
        uptime: state.started_at.elapsed().as_secs(),
    };

    json_response(StatusCode::OK, &response)
}
