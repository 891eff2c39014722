//! Shot domain types: the native wire record, validated launch conditions,
//! spin decomposition and unit conversions.

pub mod handedness;
pub mod spin;
pub mod types;
pub mod units;

pub use handedness::mirror_for_left_handed;
pub use spin::SpinComponents;
pub use types::{LaunchConditions, ShotInput, UsCustomaryInput, Vector3Json};
