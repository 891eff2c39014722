// src/handlers/shots.rs

//! Shot endpoints: latest result, history and on-demand calculation.

use actix_web::{http::StatusCode, web, HttpResponse};
use log::{error, info};
use serde_json::json;

use crate::error::CalcError;
use crate::handlers::types::HistoryQuery;
use crate::hub::{ShotHub, ShotSource};

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;
pub const MAX_HISTORY_LIMIT: u32 = 500;

pub async fn latest_shot(hub: web::Data<ShotHub>) -> HttpResponse {
    match hub.latest() {
        Some(summary) => HttpResponse::Ok().json(summary),
        None => HttpResponse::NotFound().json(json!({ "error": "No shots yet" })),
    }
}

/// Number of history rows to return for a requested `limit`.
pub fn history_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

pub async fn recent_shots(query: web::Query<HistoryQuery>, hub: web::Data<ShotHub>) -> HttpResponse {
    match hub.database().recent_shots(history_limit(query.limit)) {
        Ok(shots) => HttpResponse::Ok().json(shots),
        Err(e) => {
            error!("Failed to load shot history: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to load shot history"
            }))
        }
    }
}

pub async fn clear_history(hub: web::Data<ShotHub>) -> HttpResponse {
    match hub.database().clear() {
        Ok(removed) => {
            info!("Cleared {} shots from history", removed);
            HttpResponse::Ok().json(json!({ "removed": removed }))
        }
        Err(e) => {
            error!("Failed to clear shot history: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to clear shot history"
            }))
        }
    }
}

/// Runs a shot posted as a JSON body through the same pipeline as the native
/// socket.
pub async fn calculate_shot(body: String, hub: web::Data<ShotHub>) -> HttpResponse {
    let shot = match serde_json::from_str(&body) {
        Ok(shot) => shot,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "error": format!("Invalid JSON: {}", e)
            }));
        }
    };

    match hub.process(ShotSource::Http, shot) {
        Ok(result) => {
            info!("Calculated shot posted over HTTP");
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            let status = if matches!(e, CalcError::InvalidJson(_) | CalcError::NotAnObject) {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            HttpResponse::build(status).json(json!({ "error": format!("Calculation error: {}", e) }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_limit_is_clamped() {
        assert_eq!(history_limit(None), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history_limit(Some(0)), 1);
        assert_eq!(history_limit(Some(42)), 42);
        assert_eq!(history_limit(Some(10_000)), MAX_HISTORY_LIMIT);
    }
}
