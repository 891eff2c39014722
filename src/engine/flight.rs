// src/engine/flight.rs

//! Point-mass ball flight.
//!
//! The ball is integrated with a fixed-step RK4 scheme under gravity,
//! quadratic drag and Magnus lift. The frame is x downrange along the target
//! line, y up, z to the right of the target line. Spin decays exponentially
//! and its axis stays fixed in space for the whole flight.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::CalcError;
use crate::shot::{LaunchConditions, SpinComponents};

const RPM_TO_RAD_PER_SECOND: f64 = 2.0 * PI / 60.0;

/// Landing spin at which a ball checks up completely on a fairway.
const FULL_CHECK_SPIN_RPM: f64 = 8000.0;
/// Share of horizontal speed kept through the first bounce of a flat landing.
const BOUNCE_RETENTION: f64 = 0.6;
/// Rolling resistance expressed as a fraction of gravity.
const ROLLING_RESISTANCE: f64 = 0.2;

/// Launch angles and backspin rates searched for the optimal carry.
const OPTIMAL_LAUNCH_DEGREES: [f64; 9] = [6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0];
const OPTIMAL_BACKSPIN_RPM: [f64; 6] = [1500.0, 2200.0, 3000.0, 4000.0, 5500.0, 7000.0];

/// Physical constants and integration settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightModel {
    pub air_density_kg_per_m3: f64,
    pub gravity_m_per_s2: f64,
    pub ball_mass_kg: f64,
    pub ball_radius_m: f64,
    pub time_step_seconds: f64,
    pub spin_decay_seconds: f64,
    pub max_flight_seconds: f64,
}

impl Default for FlightModel {
    fn default() -> Self {
        Self {
            air_density_kg_per_m3: 1.225,
            gravity_m_per_s2: 9.81,
            ball_mass_kg: 0.04593,
            ball_radius_m: 0.021335,
            time_step_seconds: 0.005,
            spin_decay_seconds: 25.0,
            max_flight_seconds: 30.0,
        }
    }
}

/// Result of integrating one flight up to first ground contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub landing_position: Vector3<f64>,
    pub landing_velocity: Vector3<f64>,
    pub peak_height_m: f64,
    pub hang_time_seconds: f64,
    pub landing_spin_rpm: f64,
}

impl Trajectory {
    pub fn carry_m(&self) -> f64 {
        self.landing_position.x
    }

    pub fn offline_m(&self) -> f64 {
        self.landing_position.z
    }

    fn horizontal_landing_speed(&self) -> f64 {
        self.landing_velocity.x.hypot(self.landing_velocity.z)
    }

    /// Angle below horizontal at which the ball meets the ground.
    pub fn descent_angle_degrees(&self) -> f64 {
        (-self.landing_velocity.y)
            .atan2(self.horizontal_landing_speed())
            .to_degrees()
    }
}

/// Lift/drag coefficients as a function of the spin factor `r·ω / |v|`.
fn drag_coefficient(spin_factor: f64) -> f64 {
    0.24 + 0.18 * spin_factor.min(0.5)
}

fn lift_coefficient(spin_factor: f64) -> f64 {
    if spin_factor <= 0.0 {
        0.0
    } else {
        0.54 * spin_factor.min(0.5).powf(0.4)
    }
}

impl FlightModel {
    fn spin_rate(&self, initial_rad_per_second: f64, t: f64) -> f64 {
        initial_rad_per_second * (-t / self.spin_decay_seconds).exp()
    }

    fn acceleration(&self, velocity: &Vector3<f64>, spin_axis: &Vector3<f64>, omega: f64) -> Vector3<f64> {
        let gravity = Vector3::new(0.0, -self.gravity_m_per_s2, 0.0);
        let speed = velocity.norm();
        if speed < f64::EPSILON {
            return gravity;
        }

        let area = PI * self.ball_radius_m * self.ball_radius_m;
        let k = 0.5 * self.air_density_kg_per_m3 * area / self.ball_mass_kg;
        let spin_factor = self.ball_radius_m * omega / speed;

        let drag = velocity * (-k * drag_coefficient(spin_factor) * speed);
        let lift = spin_axis.cross(velocity) * (k * lift_coefficient(spin_factor) * speed);

        gravity + drag + lift
    }

    /// Integrates the flight until the ball first crosses ground level.
    pub fn fly(&self, launch: &LaunchConditions) -> Result<Trajectory, CalcError> {
        let vla = launch.vertical_launch_degrees.to_radians();
        let hla = launch.horizontal_launch_degrees.to_radians();
        let mut velocity = Vector3::new(
            vla.cos() * hla.cos(),
            vla.sin(),
            vla.cos() * hla.sin(),
        ) * launch.ball_speed_mps;
        let mut position = Vector3::zeros();

        // Backspin turns about +z. Negative sidespin (a positive axis) tilts
        // the axis towards -y so the Magnus force pushes the ball right.
        let spin_vector = Vector3::new(0.0, launch.spin.sidespin_rpm, launch.spin.backspin_rpm);
        let total_rpm = launch.spin.total_rpm();
        let spin_axis = if total_rpm > 0.0 {
            spin_vector / total_rpm
        } else {
            Vector3::zeros()
        };
        let omega0 = total_rpm * RPM_TO_RAD_PER_SECOND;

        let accel = |v: &Vector3<f64>, at: f64| self.acceleration(v, &spin_axis, self.spin_rate(omega0, at));
        let dt = self.time_step_seconds;
        let mut t = 0.0;
        let mut peak = 0.0_f64;

        loop {
            if t >= self.max_flight_seconds {
                return Err(CalcError::NoLanding(self.max_flight_seconds));
            }

            let k1v = accel(&velocity, t);
            let k1p = velocity;
            let k2p = velocity + k1v * (dt / 2.0);
            let k2v = accel(&k2p, t + dt / 2.0);
            let k3p = velocity + k2v * (dt / 2.0);
            let k3v = accel(&k3p, t + dt / 2.0);
            let k4p = velocity + k3v * dt;
            let k4v = accel(&k4p, t + dt);

            let next_position = position + (k1p + k2p * 2.0 + k3p * 2.0 + k4p) * (dt / 6.0);
            let next_velocity = velocity + (k1v + k2v * 2.0 + k3v * 2.0 + k4v) * (dt / 6.0);

            if next_position.y < 0.0 {
                let fraction = position.y / (position.y - next_position.y);
                let hang_time = t + dt * fraction;
                return Ok(Trajectory {
                    landing_position: position + (next_position - position) * fraction,
                    landing_velocity: velocity + (next_velocity - velocity) * fraction,
                    peak_height_m: peak,
                    hang_time_seconds: hang_time,
                    landing_spin_rpm: self.spin_rate(omega0, hang_time) / RPM_TO_RAD_PER_SECOND,
                });
            }

            position = next_position;
            velocity = next_velocity;
            peak = peak.max(position.y);
            t += dt;
        }
    }

    /// Longest straight carry this model finds for `ball_speed_mps` over a
    /// grid of launch angles and backspin rates.
    pub fn optimal_carry_m(&self, ball_speed_mps: f64) -> f64 {
        let mut best = 0.0_f64;
        for vla in OPTIMAL_LAUNCH_DEGREES {
            for backspin in OPTIMAL_BACKSPIN_RPM {
                let launch = LaunchConditions {
                    ball_speed_mps,
                    vertical_launch_degrees: vla,
                    horizontal_launch_degrees: 0.0,
                    spin: SpinComponents::new(backspin, 0.0),
                    club_speed_mps: None,
                    club_path_degrees: None,
                    club_face_to_target_degrees: None,
                };
                if let Ok(trajectory) = self.fly(&launch) {
                    best = best.max(trajectory.carry_m());
                }
            }
        }
        best
    }

    /// Estimated roll-out after landing, measured along the target line.
    pub fn roll_m(&self, trajectory: &Trajectory) -> f64 {
        let horizontal = trajectory.horizontal_landing_speed();
        if horizontal < f64::EPSILON {
            return 0.0;
        }

        let check = (1.0 - trajectory.landing_spin_rpm / FULL_CHECK_SPIN_RPM).max(0.0);
        let retained = horizontal
            * BOUNCE_RETENTION
            * trajectory.descent_angle_degrees().to_radians().cos()
            * check;
        let roll = retained * retained / (2.0 * ROLLING_RESISTANCE * self.gravity_m_per_s2);

        roll * trajectory.landing_velocity.x / horizontal
    }
}
