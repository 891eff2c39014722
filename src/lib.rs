// src/lib.rs

//! # Shotlink
//!
//! A golf shot server for launch monitors and simulator software. Features
//! include:
//!
//! - Derived shot values (carry, offline, spin split, shot shape and rank)
//! - A native JSON shot socket and an OpenAPI Connect V1 ingest socket
//! - Shot history, a live feed and a small JSON API over HTTP
//! - A bridge that discovers a launch monitor and relays its shots
//!
//! ## Architecture
//!
//! - `shot`: Wire records, unit conversion, spin and handedness
//! - `engine`: The calculator seam and the built-in flight model
//! - `protocol`: Socket framing, native replies and OpenAPI records
//! - `hub`: Shared pipeline every listener feeds
//! - `server`: Native and OpenAPI TCP listeners
//! - `routes` / `handlers` / `shot_socket`: HTTP API and live WebSocket feed
//! - `db`: Shot history in SQLite
//! - `bridge`: Launch monitor discovery and relay

pub mod config;
pub mod error;
pub mod shot;
pub mod engine;
pub mod protocol;
pub mod hub;
pub mod server;
pub mod bridge;

pub mod routes;
pub mod handlers {
    pub mod settings;
    pub mod shots;
    pub mod status;
    pub mod types;
}
pub mod shot_socket;

/// Persistent shot history
pub mod db {
    pub mod database;
}

pub use engine::{calculate_derived_values, ShotCalculator, RESULT_KEY};
pub use hub::{ShotHub, ShotSummary};
