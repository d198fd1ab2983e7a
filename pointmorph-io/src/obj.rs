//! OBJ point model support
//!
//! Only the records a point model needs are interpreted:
//! - `v x y z [r g b]` positions, with the colour fields parsed and dropped
//! - `vn x y z` normals, normalized on read
//!
//! Faces, texture coordinates, comments and anything else are skipped.

use crate::error::LoadError;
use crate::ModelReader;
use log::{debug, info};
use pointmorph_core::{unit_or_zero, Point3f, PointCloud, Vector3f};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

pub struct ObjPointReader;

/// Running per-axis extent of the positions seen so far
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Point3f,
    max: Point3f,
}

impl Extent {
    fn new() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    fn include(&mut self, p: &Point3f) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);

        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }
}

impl ObjPointReader {
    /// Parse a point model from any buffered source.
    ///
    /// `source_name` only appears in error messages.
    pub fn from_reader<R: BufRead>(
        reader: R,
        scale: f32,
        source_name: &str,
    ) -> Result<PointCloud, LoadError> {
        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut extent = Extent::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_number = index + 1;
            let mut fields = line.split_whitespace();

            match fields.next() {
                Some("v") => {
                    let values = Self::parse_floats(fields, line_number)?;
                    // x y z, optionally followed by r g b which the model does not keep
                    if values.len() < 3 {
                        return Err(LoadError::Parse {
                            line: line_number,
                            message: format!(
                                "vertex record needs 3 coordinates, found {}",
                                values.len()
                            ),
                        });
                    }
                    let p = Point3f::new(values[0], values[1], values[2]);
                    extent.include(&p);
                    vertices.push(p);
                }
                Some("vn") => {
                    let values = Self::parse_floats(fields, line_number)?;
                    if values.len() != 3 {
                        return Err(LoadError::Parse {
                            line: line_number,
                            message: format!(
                                "normal record needs 3 components, found {}",
                                values.len()
                            ),
                        });
                    }
                    normals.push(unit_or_zero(Vector3f::new(values[0], values[1], values[2])));
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(LoadError::Empty {
                source_name: source_name.to_string(),
            });
        }

        if normals.len() != vertices.len() {
            return Err(LoadError::NormalCountMismatch {
                source_name: source_name.to_string(),
                vertices: vertices.len(),
                normals: normals.len(),
            });
        }

        let center = extent.center();
        debug!("{}: bounding box center {:?}, scale {}", source_name, center, scale);

        for v in &mut vertices {
            *v = Point3f::from((*v - center) * scale);
        }

        // Lengths were checked above
        PointCloud::from_parts(vertices, normals, scale).map_err(|e| LoadError::Parse {
            line: 0,
            message: e.to_string(),
        })
    }

    /// Parse every remaining field as a finite `f32`.
    ///
    /// `inf` and `nan` are rejected.
    fn parse_floats<'a>(
        fields: impl Iterator<Item = &'a str>,
        line: usize,
    ) -> Result<Vec<f32>, LoadError> {
        fields
            .map(|field| match field.parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(_) => Err(LoadError::Parse {
                    line,
                    message: format!("non-finite number '{}'", field),
                }),
                Err(_) => Err(LoadError::Parse {
                    line,
                    message: format!("invalid number '{}'", field),
                }),
            })
            .collect()
    }
}

impl ModelReader for ObjPointReader {
    fn read_model<P: AsRef<Path>>(path: P, scale: f32) -> Result<PointCloud, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LoadError::Io(e),
        })?;

        let cloud = Self::from_reader(BufReader::new(file), scale, &path.display().to_string())?;
        info!("Loaded {} points from {}", cloud.len(), path.display());
        Ok(cloud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pointmorph_core::Drawable;
    use std::fs;
    use std::io::Cursor;

    fn parse(content: &str, scale: f32) -> Result<PointCloud, LoadError> {
        ObjPointReader::from_reader(Cursor::new(content), scale, "test")
    }

    #[test]
    fn test_centers_three_points() {
        let content = "v 0 0 0 1 0 0\nv 2 0 0 0 1 0\nv 0 2 0 0 0 1\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\n";
        let cloud = parse(content, 1.0).unwrap();

        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud[0], Point3f::new(-1.0, -1.0, 0.0));
        assert_eq!(cloud[1], Point3f::new(1.0, -1.0, 0.0));
        assert_eq!(cloud[2], Point3f::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale_is_applied_after_centering() {
        let content = "v 1 1 1\nv 3 5 7\nvn 1 0 0\nvn 0 1 0\n";
        let cloud = parse(content, 2.0).unwrap();

        assert_eq!(cloud[0], Point3f::new(-2.0, -4.0, -6.0));
        assert_eq!(cloud[1], Point3f::new(2.0, 4.0, 6.0));
        assert_eq!(cloud.scale(), 2.0);
    }

    #[test]
    fn test_center_round_trip() {
        let content = "v 10.5 -3 4 0 0 0\nv 12 -1 9 0 0 0\nv 11 -2.5 6 0 0 0\n\
                       vn 1 0 0\nvn 1 0 0\nvn 1 0 0\n";
        let scale = 7.5;
        let original_center =
            Point3f::new((10.5 + 12.0) / 2.0, (-3.0 + -1.0) / 2.0, (4.0 + 9.0) / 2.0);
        let cloud = parse(content, scale).unwrap();

        let recovered = cloud.center().coords / scale + original_center.coords;
        assert_relative_eq!(recovered, original_center.coords, epsilon = 1e-5);
        assert_relative_eq!(cloud.center().coords.norm(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normals_are_normalized() {
        let content = "v 0 0 0\nv 1 1 1\nvn 0 3 4\nvn 0 0 0\n";
        let cloud = parse(content, 1.0).unwrap();

        assert_eq!(cloud.normals.len(), cloud.vertices.len());
        assert_relative_eq!(cloud.normals[0].norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(cloud.normals[0].z, 0.8, epsilon = 1e-6);
        assert_eq!(cloud.normals[1], Vector3f::zeros());
    }

    #[test]
    fn test_other_records_are_skipped() {
        let content = "# exported model\nmtllib bunny.mtl\nv 0 0 0\nvt 0.5 0.5\nvn 1 0 0\n\
                       v 4 0 0\nvn 1 0 0\nf 1//1 2//2 1//1\n\n";
        let cloud = parse(content, 1.0).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1], Point3f::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_source() {
        let result = parse("# nothing here\nvn 0 0 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Empty { .. })));

        let result = parse("", 1.0);
        assert!(matches!(result, Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_normal_count_mismatch() {
        let result = parse("v 0 0 0\nv 1 0 0\nvn 0 0 1\n", 1.0);
        match result {
            Err(LoadError::NormalCountMismatch { vertices, normals, .. }) => {
                assert_eq!(vertices, 2);
                assert_eq!(normals, 1);
            }
            other => panic!("Expected NormalCountMismatch, got {:?}", other),
        }

        let result = parse("v 0 0 0\n", 1.0);
        assert!(matches!(result, Err(LoadError::NormalCountMismatch { .. })));
    }

    #[test]
    fn test_malformed_records() {
        let result = parse("v 0 0\nvn 0 0 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Parse { line: 1, .. })));

        let result = parse("v 0 0 0\nvn 0 zero 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Parse { line: 2, .. })));

        let result = parse("v 0 0 0 red 0 0\nvn 0 0 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let result = parse("v 0 0 0\nv inf 0 0\nv 2 2 0\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Parse { line: 2, .. })));

        let result = parse("v 0 0 0\nvn nan 0 1\n", 1.0);
        assert!(matches!(result, Err(LoadError::Parse { line: 2, .. })));

        let result = parse("v 0 0 0 -Infinity 0 0\nvn 0 0 1\n", 1.0);
        match result {
            Err(LoadError::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("non-finite"), "unexpected message: {}", message);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_model_from_file() {
        let temp_file = "test_obj_read_model.obj";
        fs::write(temp_file, "v 0 0 0 1 1 1\nv 0 0 2 1 1 1\nvn 0 1 0\nvn 0 1 0\n").unwrap();

        let cloud = ObjPointReader::read_model(temp_file, 0.5).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0], Point3f::new(0.0, 0.0, -0.5));
        assert_eq!(cloud[1], Point3f::new(0.0, 0.0, 0.5));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_missing_file() {
        let result = ObjPointReader::read_model("does_not_exist.obj", 1.0);
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }
}
