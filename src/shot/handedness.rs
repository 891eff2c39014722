// src/shot/handedness.rs

use serde_json::{json, Value};

/// Fields whose sign flips when a left-handed shot is viewed as its
/// right-handed mirror image.
const MIRRORED_FIELDS: [&str; 5] = [
    "horizontal_launch_angle_degrees",
    "spin_axis_degrees",
    "sidespin_rpm",
    "club_path_degrees",
    "club_face_to_target_degrees",
];

/// Mirrors a native shot record in place so that right-handed shot
/// classification produces the correct names for a left-handed golfer.
pub fn mirror_for_left_handed(shot: &mut Value) {
    let Some(obj) = shot.as_object_mut() else {
        return;
    };

    for field in MIRRORED_FIELDS {
        if let Some(value) = obj.get(field).and_then(Value::as_f64) {
            obj.insert(field.to_string(), json!(-value));
        }
    }
}
