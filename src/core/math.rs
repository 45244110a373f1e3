// Math utilities and unit conversion

use glam::Vec2;
use rapier2d::prelude::{vector, Real, Vector};

/// Pixels per physics world unit (map and sprite data are authored in pixels)
pub const PIXELS_PER_METER: f32 = 32.0;

/// Clamp a value between min and max
///
/// Unlike `f32::clamp` this never panics when `min > max`; the lower bound wins,
/// which is what a map narrower than the player needs.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Convert a length in pixels to world units
pub fn to_meters(pixels: f32) -> f32 {
    pixels / PIXELS_PER_METER
}

/// Convert a length in world units to pixels
pub fn to_pixels(meters: f32) -> f32 {
    meters * PIXELS_PER_METER
}

/// glam -> rapier
pub fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

/// rapier -> glam
pub fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_inverted_bounds_prefers_min() {
        assert_eq!(clamp(3.0, 4.0, 2.0), 4.0);
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(to_meters(PIXELS_PER_METER), 1.0);
        assert_eq!(to_pixels(2.0), 2.0 * PIXELS_PER_METER);
        approx::assert_relative_eq!(to_pixels(to_meters(37.0)), 37.0, epsilon = 1e-4);
    }

    #[test]
    fn test_vector_conversion() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(to_vec2(&to_vector(v)), v);
    }
}
