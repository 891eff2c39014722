// src/routes.rs

//! Route configuration for the status server.

use actix_web::web;

use crate::handlers::{settings, shots, status};
use crate::shot_socket;

/// Configures all routes for the web server.
///
/// # Routes
/// - `/ws` - Live shot feed
/// - `/api` - JSON API:
///   - `GET /status` - Listener and history status
///   - `GET /shots/latest` - Most recent shot summary
///   - `GET /shots?limit=N` - Shot history, newest first
///   - `DELETE /shots` - Clear shot history
///   - `POST /shots/calculate` - Calculate a posted shot
///   - `GET /settings` - Current handedness
///   - `PUT /settings/handedness` - Switch handedness
///
/// # Arguments
/// * `cfg` - Service configuration to add routes to
pub fn setup_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(shot_socket::handle_ws_start)))
        .service(
            web::scope("/api")
                .route("/status", web::get().to(status::get_status))
                .route("/shots", web::get().to(shots::recent_shots))
                .route("/shots", web::delete().to(shots::clear_history))
                .route("/shots/latest", web::get().to(shots::latest_shot))
                .route("/shots/calculate", web::post().to(shots::calculate_shot))
                .route("/settings", web::get().to(settings::get_settings))
                .route("/settings/handedness", web::put().to(settings::set_handedness)),
        );
}
