// src/engine/mod.rs

//! Derived-value calculation.
//!
//! The entry point mirrors the JSON-in/JSON-out contract used by simulator
//! integrations: a shot object goes in, the same object comes back with a
//! [`RESULT_KEY`] member holding everything derived from it. The actual
//! numbers come from a [`ShotCalculator`]; [`FlightModel`] is the built-in
//! one.

pub mod classify;
pub mod club;
pub mod flight;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CalcError;
use crate::shot::units::{meters_to_yards, mps_to_mph};
use crate::shot::{LaunchConditions, ShotInput, Vector3Json};

pub use classify::{classify, Classification, Rank};
pub use club::{club_delivery, ClubDelivery};
pub use flight::{FlightModel, Trajectory};

/// Key under which derived values are attached to the echoed shot.
pub const RESULT_KEY: &str = "open_golf_coach";

static DEFAULT_MODEL: Lazy<FlightModel> = Lazy::new(FlightModel::default);

/// Convenience conversions attached to every result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsCustomaryUnits {
    pub ball_speed_mph: f64,
    pub club_speed_mph: f64,
    pub carry_distance_yards: f64,
    pub total_distance_yards: f64,
    pub offline_distance_yards: f64,
    pub peak_height_yards: f64,
    pub landing_position_yards: Vector3Json,
    pub landing_velocity_mph: Vector3Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    pub ball_speed_meters_per_second: f64,
    pub carry_distance_meters: f64,
    pub total_distance_meters: f64,
    pub offline_distance_meters: f64,
    pub peak_height_meters: f64,
    pub hang_time_seconds: f64,
    pub descent_angle_degrees: f64,
    pub total_spin_rpm: f64,
    pub spin_axis_degrees: f64,
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    pub landing_position_meters: Vector3Json,
    pub landing_velocity_meters_per_second: Vector3Json,
    /// Measured club speed, or one estimated from a typical smash factor.
    pub club_speed_meters_per_second: f64,
    pub smash_factor: f64,
    /// Positive is out to the right (in-to-out for a right-hander).
    pub club_path_degrees: f64,
    /// Positive is open.
    pub club_face_to_target_degrees: f64,
    pub club_face_to_path_degrees: f64,
    /// Best straight carry the model finds for this ball speed.
    pub optimal_maximum_distance_meters: f64,
    /// Carry as a percentage of the optimal carry.
    pub distance_efficiency_percent: f64,
    pub shot_name: String,
    pub shot_rank: String,
    pub shot_color_rgb: String,
    pub us_customary_units: UsCustomaryUnits,
}

/// Something that can turn launch conditions into derived values.
pub trait ShotCalculator: Send + Sync {
    fn calculate(&self, launch: &LaunchConditions) -> Result<DerivedValues, CalcError>;
}

impl ShotCalculator for FlightModel {
    fn calculate(&self, launch: &LaunchConditions) -> Result<DerivedValues, CalcError> {
        let trajectory = self.fly(launch)?;
        let carry = trajectory.carry_m();
        let offline = trajectory.offline_m();
        let total = carry + self.roll_m(&trajectory);
        let Classification { name, rank } = classify(launch, carry, offline);

        let landing_position = Vector3Json::from(trajectory.landing_position);
        let landing_velocity = Vector3Json::from(trajectory.landing_velocity);
        let club = club_delivery(launch);
        let optimal = self.optimal_carry_m(launch.ball_speed_mps).max(carry);
        let efficiency = if optimal > 0.0 { carry / optimal * 100.0 } else { 0.0 };

        Ok(DerivedValues {
            ball_speed_meters_per_second: launch.ball_speed_mps,
            carry_distance_meters: carry,
            total_distance_meters: total,
            offline_distance_meters: offline,
            peak_height_meters: trajectory.peak_height_m,
            hang_time_seconds: trajectory.hang_time_seconds,
            descent_angle_degrees: trajectory.descent_angle_degrees(),
            total_spin_rpm: launch.spin.total_rpm(),
            spin_axis_degrees: launch.spin.axis_degrees(),
            backspin_rpm: launch.spin.backspin_rpm,
            sidespin_rpm: launch.spin.sidespin_rpm,
            landing_position_meters: landing_position,
            landing_velocity_meters_per_second: landing_velocity,
            club_speed_meters_per_second: club.club_speed_mps,
            smash_factor: club.smash_factor,
            club_path_degrees: club.club_path_degrees,
            club_face_to_target_degrees: club.club_face_to_target_degrees,
            club_face_to_path_degrees: club.club_face_to_path_degrees,
            optimal_maximum_distance_meters: optimal,
            distance_efficiency_percent: efficiency,
            shot_name: name,
            shot_rank: rank.as_str().to_string(),
            shot_color_rgb: rank.color_rgb().to_string(),
            us_customary_units: UsCustomaryUnits {
                ball_speed_mph: mps_to_mph(launch.ball_speed_mps),
                club_speed_mph: mps_to_mph(club.club_speed_mps),
                carry_distance_yards: meters_to_yards(carry),
                total_distance_yards: meters_to_yards(total),
                offline_distance_yards: meters_to_yards(offline),
                peak_height_yards: meters_to_yards(trajectory.peak_height_m),
                landing_position_yards: landing_position.scaled(meters_to_yards(1.0)),
                landing_velocity_mph: landing_velocity.scaled(mps_to_mph(1.0)),
            },
        })
    }
}

/// Runs `calculator` on a parsed shot object and returns the object with the
/// derived values attached.
pub fn derive_with(calculator: &dyn ShotCalculator, mut shot: Value) -> Result<Value, CalcError> {
    if !shot.is_object() {
        return Err(CalcError::NotAnObject);
    }

    let input: ShotInput = serde_json::from_value(shot.clone())?;
    let derived = calculator.calculate(&input.resolve()?)?;

    if let Some(obj) = shot.as_object_mut() {
        obj.insert(RESULT_KEY.to_string(), serde_json::to_value(derived)?);
    }
    Ok(shot)
}

/// JSON-in/JSON-out calculation with the built-in flight model.
///
/// # Arguments
/// * `json_input` - A shot object in the native format
///
/// # Returns
/// * `Ok(String)` - Compact JSON of the input with derived values attached
/// * `Err(CalcError)` - If the input cannot be parsed, validated or flown
pub fn calculate_derived_values(json_input: &str) -> Result<String, CalcError> {
    let shot: Value = serde_json::from_str(json_input)?;
    let result = derive_with(&*DEFAULT_MODEL, shot)?;
    Ok(serde_json::to_string(&result)?)
}

/// The process-wide built-in flight model.
pub fn default_model() -> &'static FlightModel {
    &DEFAULT_MODEL
}
