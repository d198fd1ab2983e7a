//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use crate::transform::Transform3D;
use std::ops::Index;

/// Degrees added to the rotation by [`PointCloud::update`]
pub const DEFAULT_SPIN_DEGREES: f32 = 1.0;

/// A centered, scaled point cloud with per-vertex unit normals and a spin transform.
///
/// `vertices` and `normals` are index aligned. The positions are fixed once a
/// cloud is loaded; only the rotation (`angle` and `to_world`) changes per
/// frame. A morph works on its own copy of the vertex buffer.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub vertices: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    scale: f32,
    angle: f32,
    to_world: Transform3D,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            scale: 1.0,
            angle: 0.0,
            to_world: Transform3D::identity(),
        }
    }

    /// Create a point cloud from aligned vertices and normals.
    ///
    /// Fails with [`Error::InvalidArgument`] when the two sequences differ in length.
    pub fn from_parts(vertices: Vec<Point3f>, normals: Vec<Vector3f>, scale: f32) -> Result<Self> {
        if vertices.len() != normals.len() {
            return Err(Error::InvalidArgument(format!(
                "{} normals for {} vertices",
                normals.len(),
                vertices.len()
            )));
        }

        Ok(Self {
            vertices,
            normals,
            scale,
            ..Self::new()
        })
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether every vertex has exactly one normal
    pub fn is_aligned(&self) -> bool {
        self.vertices.len() == self.normals.len()
    }

    /// Scale factor applied when the cloud was loaded
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Accumulated rotation about +Y, in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Model-to-world transform for the current rotation
    pub fn to_world(&self) -> &Transform3D {
        &self.to_world
    }

    /// Get an iterator over the vertices
    pub fn iter(&self) -> std::slice::Iter<'_, Point3f> {
        self.vertices.iter()
    }

    /// Add `degrees` to the rotation and rebuild the transform.
    ///
    /// The angle resets to zero once its magnitude passes a full turn.
    pub fn spin(&mut self, degrees: f32) {
        let mut angle = self.angle + degrees;
        if !(-360.0..=360.0).contains(&angle) {
            angle = 0.0;
        }
        self.set_angle(angle);
    }

    /// Set the rotation to `degrees` and rebuild the transform
    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = degrees;
        self.to_world = Transform3D::rotation_y(degrees.to_radians());
    }

    /// Per-tick update: spin by [`DEFAULT_SPIN_DEGREES`]
    pub fn update(&mut self) {
        self.spin(DEFAULT_SPIN_DEGREES);
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3f;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vertices[index]
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3f;
    type IntoIter = std::slice::Iter<'a, Point3f>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cloud() -> PointCloud {
        PointCloud::from_parts(
            vec![Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)],
            vec![Vector3f::x(), Vector3f::y()],
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_rejects_mismatched_normals() {
        let result =
            PointCloud::from_parts(vec![Point3f::origin(); 3], vec![Vector3f::z(); 2], 1.0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_spin_accumulates() {
        let mut cloud = unit_cloud();
        cloud.spin(30.0);
        cloud.spin(60.0);
        assert_relative_eq!(cloud.angle(), 90.0);

        let p = cloud.to_world().transform_point(&cloud[0]);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_spin_wraps_past_full_turn() {
        let mut cloud = unit_cloud();
        cloud.set_angle(359.0);
        cloud.spin(2.0);
        assert_eq!(cloud.angle(), 0.0);
        assert!(cloud.to_world().is_identity(1e-6));
    }

    #[test]
    fn test_spin_wraps_negative() {
        let mut cloud = unit_cloud();
        cloud.set_angle(-359.5);
        cloud.spin(-1.0);
        assert_eq!(cloud.angle(), 0.0);
    }

    #[test]
    fn test_spin_keeps_exact_full_turn() {
        let mut cloud = unit_cloud();
        cloud.set_angle(359.0);
        cloud.spin(1.0);
        assert_relative_eq!(cloud.angle(), 360.0);
    }

    #[test]
    fn test_update_spins_one_degree() {
        let mut cloud = unit_cloud();
        for _ in 0..10 {
            cloud.update();
        }
        assert_relative_eq!(cloud.angle(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_accessors() {
        let cloud = unit_cloud();
        assert_eq!(cloud.len(), 2);
        assert!(!cloud.is_empty());
        assert!(cloud.is_aligned());
        assert_eq!(cloud.scale(), 1.0);
        assert_eq!(cloud.iter().count(), 2);
        assert!(PointCloud::default().is_empty());
    }
}
