// src/handlers/types.rs

use serde::{Deserialize, Serialize};

use crate::hub::ShotSource;

/// Snapshot returned by `GET /api/status`.
#[derive(Serialize, Debug)]
pub struct StatusResponse {
    pub version: &'static str,
    pub left_handed: bool,
    pub listeners: Vec<String>,
    pub active_connections: usize,
    pub last_event: String,
    pub last_source: Option<ShotSource>,
    /// Shots in the history table, or `None` if it could not be read
    pub shots_recorded: Option<i64>,
    pub last_shot_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandednessPayload {
    pub left_handed: bool,
}

#[derive(Serialize, Debug)]
pub struct SettingsResponse {
    pub left_handed: bool,
    pub handedness: &'static str,
}

impl SettingsResponse {
    pub fn new(left_handed: bool) -> Self {
        Self {
            left_handed,
            handedness: if left_handed { "left" } else { "right" },
        }
    }
}
