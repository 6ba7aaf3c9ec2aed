//! Direct-line steering toward a goal (no obstacle search).

use mc_mobs_world::Vec3;

/// Bearing from `from` to `to` in the XZ plane, as `atan2(dz, dx)`.
pub fn heading(from: Vec3, to: Vec3) -> f32 {
    (to.z - from.z).atan2(to.x - from.x)
}

/// Horizontal step along a bearing: `(dx, dz)`.
pub fn step_along(heading: f32, distance: f32) -> (f32, f32) {
    (heading.cos() * distance, heading.sin() * distance)
}

/// Yaw (0..360 degrees) for a bearing.
///
/// Convention: 0 = south (+Z), 90 = west (-X), 180 = north (-Z), 270 = east (+X).
pub fn yaw_for_heading(heading: f32) -> f32 {
    let yaw = (heading - std::f32::consts::FRAC_PI_2).to_degrees();
    ((yaw % 360.0) + 360.0) % 360.0
}

/// Pitch in degrees to look from `from` at `to`; negative looks up.
pub fn pitch_toward(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    let horizontal = (d.x * d.x + d.z * d.z).sqrt();
    (-d.y.atan2(horizontal)).to_degrees()
}
