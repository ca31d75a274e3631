//! Aggregate stats route

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use super::{error_response, json_response};
use crate::services::FishService;

/// Handle GET /api/stats
pub async fn handle_stats(service: &FishService) -> Response<Full<Bytes>> {
    match service.stats().await {
        Ok(stats) => json_response(StatusCode::OK, &stats),
        Err(e) => error_response(&e),
    }
}
