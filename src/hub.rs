// src/hub.rs

//! Shared shot pipeline.
//!
//! Every listener (native socket, OpenAPI socket, HTTP) hands parsed shot
//! objects to one [`ShotHub`]. The hub applies handedness, runs the
//! calculator, keeps the latest result, writes history and fans the summary
//! out to live subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, Utc};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::db::database::{Database, NewShot};
use crate::engine::{derive_with, ShotCalculator, RESULT_KEY};
use crate::error::CalcError;
use crate::shot::mirror_for_left_handed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotSource {
    Native,
    OpenApi,
    Http,
}

impl ShotSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ShotSource::Native => "native",
            ShotSource::OpenApi => "open_api",
            ShotSource::Http => "http",
        }
    }
}

/// The headline numbers of one processed shot, as shown to a player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotSummary {
    pub shot_name: String,
    pub shot_rank: String,
    pub shot_color_rgb: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    /// RFC 3339 UTC time the shot was processed.
    pub received_at: String,
    pub source: ShotSource,
    pub carry_distance_yards: Option<f64>,
    pub offline_distance_yards: Option<f64>,
    pub total_distance_yards: Option<f64>,
    pub peak_height_yards: Option<f64>,
    pub hang_time_seconds: Option<f64>,
    pub descent_angle_degrees: Option<f64>,
    pub club_speed_mph: Option<f64>,
    pub smash_factor: Option<f64>,
    pub optimal_maximum_distance_meters: Option<f64>,
    pub distance_efficiency_percent: Option<f64>,
    pub club_path_degrees: Option<f64>,
    pub club_face_to_path_degrees: Option<f64>,
    pub club_face_to_target_degrees: Option<f64>,
}

fn text(obj: &Value, key: &str, fallback: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

impl ShotSummary {
    /// Extracts a summary from a derived result. `None` if the result has no
    /// derived section.
    pub fn from_result(result: &Value, source: ShotSource) -> Option<Self> {
        let derived = result.get(RESULT_KEY)?;
        let us_units = derived.get("us_customary_units");
        let yards = |key: &str| us_units.and_then(|u| u.get(key)).and_then(Value::as_f64);
        let number = |key: &str| derived.get(key).and_then(Value::as_f64);

        Some(Self {
            shot_name: text(derived, "shot_name", "Unknown"),
            shot_rank: text(derived, "shot_rank", "Unknown"),
            shot_color_rgb: text(derived, "shot_color_rgb", "0xFFFFFF"),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            received_at: Utc::now().to_rfc3339(),
            source,
            carry_distance_yards: yards("carry_distance_yards"),
            offline_distance_yards: yards("offline_distance_yards"),
            total_distance_yards: yards("total_distance_yards"),
            peak_height_yards: yards("peak_height_yards"),
            hang_time_seconds: number("hang_time_seconds"),
            descent_angle_degrees: number("descent_angle_degrees"),
            club_speed_mph: yards("club_speed_mph"),
            smash_factor: number("smash_factor"),
            optimal_maximum_distance_meters: number("optimal_maximum_distance_meters"),
            distance_efficiency_percent: number("distance_efficiency_percent"),
            club_path_degrees: number("club_path_degrees"),
            club_face_to_path_degrees: number("club_face_to_path_degrees"),
            club_face_to_target_degrees: number("club_face_to_target_degrees"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerStatus {
    pub listeners: Vec<String>,
    pub active_connections: usize,
    pub last_event: String,
    pub last_source: Option<ShotSource>,
}

pub struct ShotHub {
    calculator: Arc<dyn ShotCalculator>,
    left_handed: AtomicBool,
    latest: Mutex<Option<ShotSummary>>,
    status: Mutex<ServerStatus>,
    db: Database,
    feed: broadcast::Sender<ShotSummary>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ShotHub {
    pub fn new(calculator: Arc<dyn ShotCalculator>, db: Database, feed_capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(feed_capacity);
        Self {
            calculator,
            left_handed: AtomicBool::new(false),
            latest: Mutex::new(None),
            status: Mutex::new(ServerStatus {
                last_event: "Starting...".to_string(),
                ..Default::default()
            }),
            db,
            feed,
        }
    }

    pub fn is_left_handed(&self) -> bool {
        self.left_handed.load(Ordering::Relaxed)
    }

    pub fn set_left_handed(&self, left_handed: bool) {
        self.left_handed.store(left_handed, Ordering::Relaxed);
        info!("Handedness set to {}", if left_handed { "left" } else { "right" });
    }

    pub fn latest(&self) -> Option<ShotSummary> {
        lock(&self.latest).clone()
    }

    pub fn status(&self) -> ServerStatus {
        lock(&self.status).clone()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// New receiver for every summary processed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ShotSummary> {
        self.feed.subscribe()
    }

    pub fn register_listener(&self, description: String) {
        let mut status = lock(&self.status);
        status.last_event = format!("Listening on {}", description);
        status.listeners.push(description);
    }

    pub fn connection_opened(&self, peer: &str) {
        let mut status = lock(&self.status);
        status.active_connections += 1;
        status.last_event = format!("Connected: {}", peer);
    }

    pub fn connection_closed(&self, peer: &str) {
        let mut status = lock(&self.status);
        status.active_connections = status.active_connections.saturating_sub(1);
        status.last_event = format!("Client {} disconnected", peer);
    }

    /// Runs one shot through the pipeline.
    ///
    /// # Arguments
    /// * `source` - Which listener the shot arrived on
    /// * `shot` - A shot object in the native format
    ///
    /// # Returns
    /// * `Ok(Value)` - The shot with derived values attached
    /// * `Err(CalcError)` - If the shot could not be calculated
    pub fn process(&self, source: ShotSource, mut shot: Value) -> Result<Value, CalcError> {
        if self.is_left_handed() {
            mirror_for_left_handed(&mut shot);
        }

        let result = derive_with(self.calculator.as_ref(), shot)?;

        if let Some(summary) = ShotSummary::from_result(&result, source) {
            self.persist(&summary, &result);
            {
                let mut status = lock(&self.status);
                status.last_source = Some(source);
                status.last_event = format!("{} shot: {}", source.as_str(), summary.shot_name);
            }
            *lock(&self.latest) = Some(summary.clone());

            if self.feed.send(summary).is_err() {
                debug!("No live subscribers for shot feed");
            }
        }

        Ok(result)
    }

    fn persist(&self, summary: &ShotSummary, result: &Value) {
        let derived = result.get(RESULT_KEY);
        let meters = |key: &str| derived.and_then(|d| d.get(key)).and_then(Value::as_f64);

        let record = NewShot {
            received_at: &summary.received_at,
            source: summary.source.as_str(),
            shot_name: &summary.shot_name,
            shot_rank: &summary.shot_rank,
            carry_distance_meters: meters("carry_distance_meters"),
            offline_distance_meters: meters("offline_distance_meters"),
            total_distance_meters: meters("total_distance_meters"),
            result,
        };

        if let Err(e) = self.db.record_shot(&record) {
            error!("Failed to record shot history: {}", e);
        }
    }
}
