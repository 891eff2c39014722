// src/engine/classify.rs

//! Shot naming and ranking.
//!
//! Names follow the usual right-handed vocabulary: start direction from the
//! horizontal launch angle (pull left, push right) and curve from the spin
//! axis (draw/hook left, fade/slice right). Left-handed shots are mirrored
//! before they get here.

use serde::Serialize;

use crate::shot::LaunchConditions;

const MIN_CLEAN_LAUNCH_DEGREES: f64 = 5.0;
const SHANK_DEGREES: f64 = 10.0;
const STRAIGHT_START_DEGREES: f64 = 1.0;
const STRAIGHT_AXIS_DEGREES: f64 = 2.0;
const BABY_CURVE_DEGREES: f64 = 5.0;
const HEAVY_CURVE_DEGREES: f64 = 20.0;

/// Upper bounds of |offline| / carry for each rank, best first.
const RANK_LIMITS: [(f64, Rank); 5] = [
    (0.02, Rank::SPlus),
    (0.04, Rank::S),
    (0.07, Rank::A),
    (0.12, Rank::B),
    (0.20, Rank::C),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    #[serde(rename = "S+")]
    SPlus,
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::SPlus => "S+",
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        }
    }

    /// Display colour as `0xRRGGBB`.
    pub fn color_rgb(self) -> &'static str {
        match self {
            Rank::SPlus => "0x23C4FF",
            Rank::S => "0x3CD070",
            Rank::A => "0x9BE15D",
            Rank::B => "0xF5D547",
            Rank::C => "0xF59E42",
            Rank::D => "0xE5484D",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub name: String,
    pub rank: Rank,
}

fn mishit(launch: &LaunchConditions) -> Option<&'static str> {
    if launch.vertical_launch_degrees < MIN_CLEAN_LAUNCH_DEGREES {
        Some("Bladed")
    } else if launch.horizontal_launch_degrees >= SHANK_DEGREES {
        Some("Right Shank")
    } else if launch.horizontal_launch_degrees <= -SHANK_DEGREES {
        Some("Left Shank")
    } else {
        None
    }
}

fn start_direction(hla: f64) -> Option<&'static str> {
    if hla.abs() < STRAIGHT_START_DEGREES {
        None
    } else if hla < 0.0 {
        Some("Pull")
    } else {
        Some("Push")
    }
}

/// Returns the curve word and whether it is a "baby" version of it.
fn curve(axis: f64) -> Option<(&'static str, bool)> {
    let magnitude = axis.abs();
    if magnitude < STRAIGHT_AXIS_DEGREES {
        return None;
    }
    let word = match (axis < 0.0, magnitude < HEAVY_CURVE_DEGREES) {
        (true, true) => "Draw",
        (true, false) => "Hook",
        (false, true) => "Fade",
        (false, false) => "Slice",
    };
    Some((word, magnitude < BABY_CURVE_DEGREES))
}

fn rank_for(carry_m: f64, offline_m: f64) -> Rank {
    if carry_m <= 0.0 {
        return Rank::D;
    }
    let ratio = offline_m.abs() / carry_m;
    RANK_LIMITS
        .iter()
        .find(|(limit, _)| ratio <= *limit)
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::D)
}

pub fn classify(launch: &LaunchConditions, carry_m: f64, offline_m: f64) -> Classification {
    if let Some(name) = mishit(launch) {
        return Classification {
            name: name.to_string(),
            rank: Rank::D,
        };
    }

    let start = start_direction(launch.horizontal_launch_degrees);
    let curve = curve(launch.spin.axis_degrees());

    let mut words = Vec::with_capacity(3);
    if let Some((_, true)) = curve {
        words.push("Baby");
    }
    words.extend(start);
    if let Some((word, _)) = curve {
        words.push(word);
    }

    let name = if words.is_empty() {
        "Straight".to_string()
    } else {
        words.join(" ")
    };

    Classification {
        name,
        rank: rank_for(carry_m, offline_m),
    }
}
