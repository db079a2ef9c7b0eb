//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use crate::polar_to_cartesian;

/// Number of tips on the core star
pub const STAR_POINTS: usize = 8;
/// Polygon vertices: one outer tip and one inner notch per point
pub const STAR_VERTICES: usize = STAR_POINTS * 2;
/// Inner radius of the star relative to its outer radius
pub const STAR_INNER_RATIO: f32 = 0.45;

/// Star polygon around `center`, rotated by `rotation` radians.
///
/// Even vertices sit on the outer radius, odd ones on the inner radius.
pub fn star_polygon(center: Vec2, outer_radius: f32, rotation: f32) -> [Vec2; STAR_VERTICES] {
    let inner_radius = outer_radius * STAR_INNER_RATIO;
    let step = 2.0 * PI / STAR_VERTICES as f32;
    std::array::from_fn(|i| {
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        center + polar_to_cartesian(r, rotation + step * i as f32)
    })
}
