// src/protocol/openapi.rs

//! OpenAPI Connect V1 shot records as sent by launch monitors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::shot::units::mph_to_mps;
use crate::shot::{ShotInput, UsCustomaryInput};

/// Field-level leniency: a value of the wrong type reads as absent instead of
/// rejecting the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BallData {
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub spin_axis: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_spin: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub back_spin: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub side_spin: Option<f64>,
    #[serde(rename = "HLA", default, deserialize_with = "lenient")]
    pub hla: Option<f64>,
    #[serde(rename = "VLA", default, deserialize_with = "lenient")]
    pub vla: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClubData {
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub angle_of_attack: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub face_to_target: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShotDataOptions {
    #[serde(default, deserialize_with = "lenient")]
    pub contains_ball_data: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub contains_club_data: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_heart_beat: Option<bool>,
}

/// One record on an OpenAPI Connect V1 stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenApiShot {
    #[serde(rename = "DeviceID", default, deserialize_with = "lenient")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub units: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub shot_number: Option<u64>,
    #[serde(rename = "APIversion", default, deserialize_with = "lenient")]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ball_data: Option<BallData>,
    #[serde(default, deserialize_with = "lenient")]
    pub club_data: Option<ClubData>,
    #[serde(default, deserialize_with = "lenient")]
    pub shot_data_options: Option<ShotDataOptions>,
}

impl OpenApiShot {
    /// Heartbeats and records without ball data carry no shot.
    pub fn is_shot(&self) -> bool {
        let options = self.shot_data_options.clone().unwrap_or_default();
        if options.is_heart_beat == Some(true) || options.contains_ball_data == Some(false) {
            return false;
        }
        self.ball_data.is_some()
    }

    /// Yards and mph records report speeds in mph; anything else is metric.
    pub fn uses_imperial_units(&self) -> bool {
        let units = self.units.as_deref().unwrap_or("Yards").to_ascii_lowercase();
        units.contains("yard") || units.contains("mph")
    }

    /// Converts the record into the native shot format.
    pub fn to_shot_input(&self) -> ShotInput {
        let imperial = self.uses_imperial_units();
        let speed_mps = |speed: f64| if imperial { mph_to_mps(speed) } else { speed };
        let speed_mph = |speed: f64| if imperial { speed } else { speed / mph_to_mps(1.0) };

        let ball = self.ball_data.clone().unwrap_or_default();
        let club = self.club_data.clone().unwrap_or_default();
        let club_speed = club.speed;

        let mut us_customary = UsCustomaryInput::default();
        if imperial {
            us_customary.ball_speed_mph = ball.speed;
        }
        us_customary.club_speed_mph = club_speed.map(speed_mph);

        ShotInput {
            ball_speed_meters_per_second: ball.speed.map(speed_mps),
            vertical_launch_angle_degrees: ball.vla,
            horizontal_launch_angle_degrees: ball.hla,
            total_spin_rpm: ball.total_spin,
            spin_axis_degrees: ball.spin_axis,
            backspin_rpm: ball.back_spin,
            sidespin_rpm: ball.side_spin,
            club_speed_meters_per_second: club_speed.map(speed_mps),
            club_path_degrees: club.path,
            club_face_to_target_degrees: club.face_to_target,
            us_customary_units: if us_customary == UsCustomaryInput::default() {
                None
            } else {
                Some(us_customary)
            },
            ..Default::default()
        }
    }
}

/// True if the record is already a native shot.
pub fn is_native_shot(record: &Value) -> bool {
    record.get("ball_speed_meters_per_second").is_some()
        && record.get("vertical_launch_angle_degrees").is_some()
}

/// True if the record is a keep-alive rather than a shot.
pub fn is_heartbeat(record: &Value) -> bool {
    record
        .pointer("/ShotDataOptions/IsHeartBeat")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Maps whatever a launch monitor sent into a native shot object.
///
/// Native records pass through untouched. Returns `None` when the record is
/// neither native nor an OpenAPI shot with any usable ball data.
pub fn map_launch_monitor_record(record: &Value) -> Option<Value> {
    if is_native_shot(record) {
        return Some(record.clone());
    }

    let shot: OpenApiShot = serde_json::from_value(record.clone()).ok()?;
    if !shot.is_shot() {
        return None;
    }

    match serde_json::to_value(shot.to_shot_input()) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(Value::Object(map)),
        _ => None,
    }
}

/// Line a server sends to a freshly connected OpenAPI client.
pub fn handshake_line(game_id: &str) -> String {
    format!("{}\n", json!({ "Code": 201, "GameId": game_id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "DeviceID": "Monitor-1",
            "Units": "Yards",
            "ShotNumber": 1,
            "APIversion": "1",
            "BallData": {
                "Speed": 156.5,
                "SpinAxis": 6.0,
                "TotalSpin": 2800.0,
                "HLA": -2.0,
                "VLA": 12.5
            },
            "ShotDataOptions": {
                "ContainsBallData": true,
                "ContainsClubData": false
            }
        })
    }

    #[test]
    fn parses_vendor_record() {
        let shot: OpenApiShot = serde_json::from_value(sample()).unwrap();
        assert_eq!(shot.device_id.as_deref(), Some("Monitor-1"));
        assert_eq!(shot.shot_number, Some(1));
        assert_eq!(shot.api_version.as_deref(), Some("1"));
        assert_eq!(shot.ball_data.as_ref().unwrap().vla, Some(12.5));
        assert!(shot.is_shot());
    }

    #[test]
    fn imperial_record_is_converted_to_metric() {
        let native = map_launch_monitor_record(&sample()).unwrap();
        let speed = native["ball_speed_meters_per_second"].as_f64().unwrap();
        assert!((speed - 156.5 * 0.44704).abs() < 1e-9);
        assert_eq!(native["vertical_launch_angle_degrees"], json!(12.5));
        assert_eq!(native["horizontal_launch_angle_degrees"], json!(-2.0));
        assert_eq!(native["spin_axis_degrees"], json!(6.0));
        assert_eq!(native["us_customary_units"]["ball_speed_mph"], json!(156.5));
    }

    #[test]
    fn metric_record_keeps_speed_and_reports_club_mph() {
        let record = json!({
            "Units": "Meters",
            "BallData": { "Speed": 70.0, "VLA": 12.0 },
            "ClubData": { "Speed": 44.704 }
        });
        let native = map_launch_monitor_record(&record).unwrap();
        assert_eq!(native["ball_speed_meters_per_second"], json!(70.0));
        assert_eq!(native["club_speed_meters_per_second"], json!(44.704));
        let club_mph = native["us_customary_units"]["club_speed_mph"].as_f64().unwrap();
        assert!((club_mph - 100.0).abs() < 1e-9);
        assert!(native["us_customary_units"].get("ball_speed_mph").is_none());
    }

    #[test]
    fn club_face_and_path_are_mapped() {
        let record = json!({
            "BallData": { "Speed": 150.0, "VLA": 13.0 },
            "ClubData": { "Speed": 100.0, "Path": -2.5, "FaceToTarget": 0.5 }
        });
        let native = map_launch_monitor_record(&record).unwrap();
        assert_eq!(native["club_path_degrees"], json!(-2.5));
        assert_eq!(native["club_face_to_target_degrees"], json!(0.5));
    }

    #[test]
    fn spin_components_survive_an_axis_without_total() {
        let record = json!({
            "BallData": {
                "Speed": 145.0,
                "VLA": 14.0,
                "SpinAxis": 10.0,
                "BackSpin": 3000.0,
                "SideSpin": -530.0
            }
        });
        let native = map_launch_monitor_record(&record).unwrap();
        let input: ShotInput = serde_json::from_value(native).unwrap();
        let spin = input.resolve().unwrap().spin;
        assert!((spin.total_rpm() - 3000f64.hypot(530.0)).abs() < 1e-9);
    }

    #[test]
    fn mistyped_metadata_does_not_drop_the_shot() {
        let mistyped = [
            ("DeviceID", json!(42)),
            ("ShotNumber", json!("7")),
            ("APIversion", json!(1)),
        ];
        for (key, value) in mistyped {
            let mut record = sample();
            record[key] = value;
            let native = map_launch_monitor_record(&record)
                .unwrap_or_else(|| panic!("shot dropped for mistyped {}", key));
            assert_eq!(native["vertical_launch_angle_degrees"], json!(12.5));
        }

        let mut record = sample();
        record["ClubData"] = json!({ "Speed": "fast", "Path": 1.0 });
        let native = map_launch_monitor_record(&record).unwrap();
        assert!(native.get("club_speed_meters_per_second").is_none());
        assert_eq!(native["club_path_degrees"], json!(1.0));
    }

    #[test]
    fn native_records_pass_through() {
        let record = json!({
            "ball_speed_meters_per_second": 70.0,
            "vertical_launch_angle_degrees": 12.0,
            "extra": true
        });
        assert_eq!(map_launch_monitor_record(&record), Some(record));
    }

    #[test]
    fn heartbeats_and_empty_records_are_skipped() {
        let heartbeat = json!({
            "DeviceID": "Monitor-1",
            "ShotDataOptions": { "IsHeartBeat": true, "ContainsBallData": false }
        });
        assert!(is_heartbeat(&heartbeat));
        assert!(!is_heartbeat(&sample()));
        assert_eq!(map_launch_monitor_record(&heartbeat), None);
        assert_eq!(map_launch_monitor_record(&json!({ "hello": "world" })), None);
    }

    #[test]
    fn handshake_is_one_json_line() {
        let line = handshake_line("shotlink");
        assert!(line.ends_with('\n'));
        let value: Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["Code"], json!(201));
        assert_eq!(value["GameId"], json!("shotlink"));
    }
}
