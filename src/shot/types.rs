// src/shot/types.rs

use serde::{Deserialize, Serialize};

use super::spin::SpinComponents;
use super::units::mph_to_mps;
use crate::error::CalcError;

/// US customary values a launch monitor may attach to a native record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsCustomaryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_speed_mph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_speed_mph: Option<f64>,
}

/// A shot as it arrives on the wire in the native format.
///
/// Every field is optional here; [`ShotInput::resolve`] decides what is
/// required and how alternative spellings are prioritised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_speed_meters_per_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_speed_mph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_launch_angle_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_launch_angle_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spin_rpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_axis_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backspin_rpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidespin_rpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_speed_meters_per_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_speed_mph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_path_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_face_to_target_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_customary_units: Option<UsCustomaryInput>,
}

/// Validated launch state in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchConditions {
    pub ball_speed_mps: f64,
    pub vertical_launch_degrees: f64,
    pub horizontal_launch_degrees: f64,
    pub spin: SpinComponents,
    pub club_speed_mps: Option<f64>,
    /// Measured club path, positive out to the right.
    pub club_path_degrees: Option<f64>,
    /// Measured face angle to the target line, positive open.
    pub club_face_to_target_degrees: Option<f64>,
}

/// Wire shape for 3D vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3Json {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<nalgebra::Vector3<f64>> for Vector3Json {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl Vector3Json {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::InvalidValue { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, CalcError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidValue { field, value })
    }
}

fn launch_angle(field: &'static str, value: f64) -> Result<f64, CalcError> {
    let value = finite(field, value)?;
    if value > -90.0 && value < 90.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidValue { field, value })
    }
}

impl ShotInput {
    fn nested_mph(&self, pick: impl Fn(&UsCustomaryInput) -> Option<f64>) -> Option<f64> {
        self.us_customary_units.as_ref().and_then(pick)
    }

    fn ball_speed(&self) -> Result<f64, CalcError> {
        if let Some(mps) = self.ball_speed_meters_per_second {
            return positive("ball_speed_meters_per_second", mps);
        }
        let mph = self
            .ball_speed_mph
            .or_else(|| self.nested_mph(|u| u.ball_speed_mph))
            .ok_or(CalcError::MissingField("ball_speed_meters_per_second"))?;
        Ok(mph_to_mps(positive("ball_speed_mph", mph)?))
    }

    fn club_speed(&self) -> Result<Option<f64>, CalcError> {
        if let Some(mps) = self.club_speed_meters_per_second {
            return positive("club_speed_meters_per_second", mps).map(Some);
        }
        match self
            .club_speed_mph
            .or_else(|| self.nested_mph(|u| u.club_speed_mph))
        {
            Some(mph) => Ok(Some(mph_to_mps(positive("club_speed_mph", mph)?))),
            None => Ok(None),
        }
    }

    /// Total spin with its axis wins when a total is given. Otherwise the
    /// components are used; an axis on its own carries no spin rate.
    fn spin(&self) -> Result<SpinComponents, CalcError> {
        if let Some(total) = self.total_spin_rpm {
            let total = finite("total_spin_rpm", total)?;
            if total < 0.0 {
                return Err(CalcError::InvalidValue {
                    field: "total_spin_rpm",
                    value: total,
                });
            }
            let axis = finite("spin_axis_degrees", self.spin_axis_degrees.unwrap_or(0.0))?;
            return Ok(SpinComponents::from_total_and_axis(total, axis));
        }

        let back = finite("backspin_rpm", self.backspin_rpm.unwrap_or(0.0))?;
        let side = finite("sidespin_rpm", self.sidespin_rpm.unwrap_or(0.0))?;
        Ok(SpinComponents::new(back, side))
    }

    fn optional_angle(field: &'static str, value: Option<f64>) -> Result<Option<f64>, CalcError> {
        value.map(|v| finite(field, v)).transpose()
    }

    /// Validates the record and converts it to SI launch conditions.
    pub fn resolve(&self) -> Result<LaunchConditions, CalcError> {
        let vertical = self
            .vertical_launch_angle_degrees
            .ok_or(CalcError::MissingField("vertical_launch_angle_degrees"))?;

        Ok(LaunchConditions {
            ball_speed_mps: self.ball_speed()?,
            vertical_launch_degrees: launch_angle("vertical_launch_angle_degrees", vertical)?,
            horizontal_launch_degrees: launch_angle(
                "horizontal_launch_angle_degrees",
                self.horizontal_launch_angle_degrees.unwrap_or(0.0),
            )?,
            spin: self.spin()?,
            club_speed_mps: self.club_speed()?,
            club_path_degrees: Self::optional_angle("club_path_degrees", self.club_path_degrees)?,
            club_face_to_target_degrees: Self::optional_angle(
                "club_face_to_target_degrees",
                self.club_face_to_target_degrees,
            )?,
        })
    }
}
