//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Colour used for a point that has no normal to shade it with
pub const UNSHADED_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Map a unit normal onto an RGB colour, each component taken from `[-1, 1]` to `[0, 1]`
pub fn normal_color(normal: &Vector3f) -> [f32; 3] {
    [
        (normal.x + 1.0) / 2.0,
        (normal.y + 1.0) / 2.0,
        (normal.z + 1.0) / 2.0,
    ]
}

/// Normalize a vector, leaving degenerate (zero-length) vectors as zero
pub fn unit_or_zero(vector: Vector3f) -> Vector3f {
    vector.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_color_maps_axes() {
        assert_eq!(normal_color(&Vector3f::new(1.0, 0.0, -1.0)), [1.0, 0.5, 0.0]);
        assert_eq!(normal_color(&Vector3f::zeros()), UNSHADED_COLOR);
    }

    #[test]
    fn test_unit_or_zero() {
        let n = unit_or_zero(Vector3f::new(0.0, 3.0, 4.0));
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.y, 0.6, epsilon = 1e-6);

        assert_eq!(unit_or_zero(Vector3f::zeros()), Vector3f::zeros());
    }
}
