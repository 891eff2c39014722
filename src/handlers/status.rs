// src/handlers/status.rs

use actix_web::{web, HttpResponse};
use log::warn;

use crate::handlers::types::StatusResponse;
use crate::hub::ShotHub;

pub async fn get_status(hub: web::Data<ShotHub>) -> HttpResponse {
    let status = hub.status();
    let db = hub.database();

    let shots_recorded = db
        .shot_count()
        .map_err(|e| warn!("Failed to count shots: {}", e))
        .ok();
    let last_shot_at = db
        .last_received_at()
        .map_err(|e| warn!("Failed to read last shot time: {}", e))
        .ok()
        .flatten();

    HttpResponse::Ok().json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        left_handed: hub.is_left_handed(),
        listeners: status.listeners,
        active_connections: status.active_connections,
        last_event: status.last_event,
        last_source: status.last_source,
        shots_recorded,
        last_shot_at,
    })
}
