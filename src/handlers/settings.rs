// src/handlers/settings.rs

use actix_web::{web, HttpResponse};

use crate::handlers::types::{HandednessPayload, SettingsResponse};
use crate::hub::ShotHub;

pub async fn get_settings(hub: web::Data<ShotHub>) -> HttpResponse {
    HttpResponse::Ok().json(SettingsResponse::new(hub.is_left_handed()))
}

pub async fn set_handedness(payload: web::Json<HandednessPayload>, hub: web::Data<ShotHub>) -> HttpResponse {
    hub.set_left_handed(payload.left_handed);
    HttpResponse::Ok().json(SettingsResponse::new(hub.is_left_handed()))
}
