//! Fish catalog routes
//!
//! - `GET /api/fish` - full catalog (capped)
//! - `GET /api/fish/{id}` - one species
//! - `POST /api/fish/{id}/unlock` - record a catch
//! - `GET /api/fish/{id}/catches` - catches recorded for a species

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use super::{error_response, json_response};
use crate::services::{FishService, UnlockRequest};
use crate::types::FishdexError;

/// Handle GET /api/fish
pub async fn handle_list_fish(service: &FishService) -> Response<Full<Bytes>> {
    match service.list_all().await {
        Ok(fish) => json_response(StatusCode::OK, &fish),
        Err(e) => error_response(&e),
    }
}

/// Handle GET /api/fish/{id}
pub async fn handle_get_fish(service: &FishService, id: &str) -> Response<Full<Bytes>> {
    match service.get_by_id(id).await {
        Ok(fish) => json_response(StatusCode::OK, &fish),
        Err(e) => error_response(&e),
    }
}

/// Handle POST /api/fish/{id}/unlock
///
/// The body is validated before anything reaches storage.
pub async fn handle_unlock(service: &FishService, id: &str, body: &[u8]) -> Response<Full<Bytes>> {
    let request: UnlockRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return error_response(&FishdexError::from(e)),
    };

    match service.unlock(id, request).await {
        Ok(ack) => json_response(StatusCode::OK, &ack),
        Err(e) => error_response(&e),
    }
}

/// Handle GET /api/fish/{id}/catches
pub async fn handle_catches(service: &FishService, id: &str) -> Response<Full<Bytes>> {
    match service.catches_for(id).await {
        Ok(catches) => json_response(StatusCode::OK, &catches),
        Err(e) => error_response(&e),
    }
}
