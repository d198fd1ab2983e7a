//! Core traits for pointmorph

use crate::{error::Result, point::*, point_cloud::PointCloud, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

/// The render-and-present contract.
///
/// One frame is `begin_frame`, `set_model_transform`, `draw_points` and
/// `end_frame`, which presents the result. `normals` may be shorter than
/// `positions`; implementations must not index past its end.
pub trait FrameRenderer {
    /// Start a new frame
    fn begin_frame(&mut self);

    /// Set the model-to-world transform used for the following draws
    fn set_model_transform(&mut self, transform: &Transform3D);

    /// Queue points for drawing
    fn draw_points(&mut self, positions: &[Point3f], normals: &[Vector3f]);

    /// Finish the frame and present it
    fn end_frame(&mut self) -> Result<()>;
}

/// Draw `cloud` as one complete frame
pub fn render_cloud<R: FrameRenderer + ?Sized>(renderer: &mut R, cloud: &PointCloud) -> Result<()> {
    renderer.begin_frame();
    renderer.set_model_transform(cloud.to_world());
    renderer.draw_points(&cloud.vertices, &cloud.normals);
    renderer.end_frame()
}

impl Drawable for PointCloud {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for p in &self.vertices {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        (min, max)
    }
}
