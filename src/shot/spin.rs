// src/shot/spin.rs

use serde::{Deserialize, Serialize};

/// Spin expressed as its backspin and sidespin components.
///
/// A positive spin axis curves the ball to the right (fade/slice for a
/// right-handed golfer). The matching sidespin is negative: `sidespin =
/// -total·sin(axis)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinComponents {
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
}

impl SpinComponents {
    pub fn new(backspin_rpm: f64, sidespin_rpm: f64) -> Self {
        Self {
            backspin_rpm,
            sidespin_rpm,
        }
    }

    /// Decomposes a total spin rate tilted by `axis_degrees`.
    pub fn from_total_and_axis(total_rpm: f64, axis_degrees: f64) -> Self {
        let axis = axis_degrees.to_radians();
        Self {
            backspin_rpm: total_rpm * axis.cos(),
            sidespin_rpm: -total_rpm * axis.sin(),
        }
    }

    pub fn total_rpm(&self) -> f64 {
        self.backspin_rpm.hypot(self.sidespin_rpm)
    }

    /// Tilt of the spin axis in degrees. Zero spin has a zero axis.
    pub fn axis_degrees(&self) -> f64 {
        if self.total_rpm() == 0.0 {
            return 0.0;
        }
        (-self.sidespin_rpm).atan2(self.backspin_rpm).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_backspin_has_zero_axis() {
        let spin = SpinComponents::from_total_and_axis(2500.0, 0.0);
        assert!((spin.backspin_rpm - 2500.0).abs() < 1e-9);
        assert!(spin.sidespin_rpm.abs() < 1e-9);
        assert_eq!(spin.axis_degrees(), 0.0);
    }

    #[test]
    fn components_recover_total_and_axis() {
        let spin = SpinComponents::new(3500.0, -800.0);
        let rebuilt = SpinComponents::from_total_and_axis(spin.total_rpm(), spin.axis_degrees());
        assert!((rebuilt.backspin_rpm - 3500.0).abs() < 1e-6);
        assert!((rebuilt.sidespin_rpm + 800.0).abs() < 1e-6);
        assert!(spin.axis_degrees() > 0.0);
    }

    #[test]
    fn fade_axis_has_negative_sidespin() {
        let fade = SpinComponents::from_total_and_axis(2800.0, 6.0);
        assert!(fade.sidespin_rpm < 0.0);
        assert!((fade.sidespin_rpm + 2800.0 * 6f64.to_radians().sin()).abs() < 1e-9);

        let slice_components = SpinComponents::new(3500.0, -800.0);
        let expected = 800f64.atan2(3500.0).to_degrees();
        assert!((slice_components.axis_degrees() - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_spin_is_well_defined() {
        let spin = SpinComponents::default();
        assert_eq!(spin.total_rpm(), 0.0);
        assert_eq!(spin.axis_degrees(), 0.0);
    }
}
