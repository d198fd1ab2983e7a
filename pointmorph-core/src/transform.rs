//! 3D transformation utilities

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// A 3D transformation stored as a homogeneous matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a rotation about the +Y axis
    pub fn rotation_y(radians: f32) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vector3::y_axis(), radians).to_homogeneous(),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f32) -> bool {
        let identity = Matrix4::identity();
        (self.matrix - identity).norm() < epsilon
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_y_quarter_turn() {
        let t = Transform3D::rotation_y(FRAC_PI_2);
        let p = t.transform_point(&Point3::new(1.0, 2.0, 0.0));

        // +X swings onto -Z, Y is untouched
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_y_keeps_axis_points() {
        let t = Transform3D::rotation_y(1.3);
        let p = t.transform_point(&Point3::new(0.0, -4.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, -4.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_identity() {
        assert!(Transform3D::default().is_identity(1e-6));
        assert!(Transform3D::rotation_y(0.0).is_identity(1e-6));
        assert!(!Transform3D::rotation_y(0.1).is_identity(1e-6));
    }
}
