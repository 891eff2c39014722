// src/shot/units.rs

//! Conversions between the SI units used internally and the US customary
//! units reported by launch monitors.

pub const METERS_PER_SECOND_PER_MPH: f64 = 0.44704;
pub const METERS_PER_YARD: f64 = 0.9144;

pub fn mph_to_mps(mph: f64) -> f64 {
    mph * METERS_PER_SECOND_PER_MPH
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps / METERS_PER_SECOND_PER_MPH
}

pub fn meters_to_yards(meters: f64) -> f64 {
    meters / METERS_PER_YARD
}

pub fn yards_to_meters(yards: f64) -> f64 {
    yards * METERS_PER_YARD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_conversions_match_reference_values() {
        assert!((mph_to_mps(156.5) - 69.96176).abs() < 1e-9);
        assert!((mps_to_mph(44.704) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn one_hundred_yards_is_91_44_meters() {
        assert!((yards_to_meters(100.0) - 91.44).abs() < 1e-9);
        assert!((meters_to_yards(91.44) - 100.0).abs() < 1e-9);
    }
}
