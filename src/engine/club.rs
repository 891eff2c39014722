// src/engine/club.rs

//! Club delivery estimates.
//!
//! Launch monitors that only see the ball report no club data, so club speed
//! and the face and path angles are inferred from the launch. Measured values
//! always take precedence over the estimates.

use crate::shot::LaunchConditions;

const MAX_SMASH_FACTOR: f64 = 1.50;
const MIN_SMASH_FACTOR: f64 = 1.15;
/// Smash drops as loft, and so launch angle, goes up.
const SMASH_LOSS_PER_LAUNCH_DEGREE: f64 = 0.012;
const SMASH_REFERENCE_LAUNCH_DEGREES: f64 = 10.0;

/// Degrees of spin axis tilt per degree of face-to-path.
const AXIS_PER_FACE_TO_PATH: f64 = 2.5;
/// Share of the start direction set by the face; the rest follows the path.
const FACE_START_SHARE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClubDelivery {
    pub club_speed_mps: f64,
    pub smash_factor: f64,
    pub club_path_degrees: f64,
    pub club_face_to_target_degrees: f64,
    pub club_face_to_path_degrees: f64,
}

/// Smash factor a typical strike produces at the given launch angle.
pub fn typical_smash_factor(vertical_launch_degrees: f64) -> f64 {
    let loss = SMASH_LOSS_PER_LAUNCH_DEGREE * (vertical_launch_degrees - SMASH_REFERENCE_LAUNCH_DEGREES);
    (MAX_SMASH_FACTOR - loss).clamp(MIN_SMASH_FACTOR, MAX_SMASH_FACTOR)
}

/// Club speed, smash and face/path for a shot, measured where available.
pub fn club_delivery(launch: &LaunchConditions) -> ClubDelivery {
    let (club_speed_mps, smash_factor) = match launch.club_speed_mps {
        Some(club) => (club, launch.ball_speed_mps / club),
        None => {
            let smash = typical_smash_factor(launch.vertical_launch_degrees);
            (launch.ball_speed_mps / smash, smash)
        }
    };

    let (path, face) = match (launch.club_path_degrees, launch.club_face_to_target_degrees) {
        (Some(path), Some(face)) => (path, face),
        (path, face) => {
            // Start line sits mostly along the face, curve follows face-to-path.
            let hla = launch.horizontal_launch_degrees;
            let face_to_path = launch.spin.axis_degrees() / AXIS_PER_FACE_TO_PATH;
            let estimated_path = hla - FACE_START_SHARE * face_to_path;
            let estimated_face = hla + (1.0 - FACE_START_SHARE) * face_to_path;
            (path.unwrap_or(estimated_path), face.unwrap_or(estimated_face))
        }
    };

    ClubDelivery {
        club_speed_mps,
        smash_factor,
        club_path_degrees: path,
        club_face_to_target_degrees: face,
        club_face_to_path_degrees: face - path,
    }
}
