//! Model loading for pointmorph
//! 
//! This crate reads point models from OBJ-style text files into centered,
//! scaled [`PointCloud`]s, and provides the named presets of the bundled models.

pub mod obj;
pub mod presets;
pub mod error;

pub use error::*;
pub use obj::ObjPointReader;
pub use presets::ModelPreset;

use pointmorph_core::PointCloud;
use std::path::Path;

/// Trait for reading point models from files
pub trait ModelReader {
    /// Read a model, recentering it on its bounding box and applying `scale`
    fn read_model<P: AsRef<Path>>(path: P, scale: f32) -> Result<PointCloud, LoadError>;
}

/// Auto-detect format and read a point model
pub fn read_model<P: AsRef<Path>>(path: P, scale: f32) -> Result<PointCloud, LoadError> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()) {
        Some(ext) if ext == "obj" => obj::ObjPointReader::read_model(path, scale),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointmorph_core::Point3f;
    use std::fs;

    #[test]
    fn test_auto_detect_obj() {
        let temp_file = "test_auto_detect.OBJ";
        fs::write(temp_file, "v -1 0 0\nv 1 0 0\nvn 1 0 0\nvn -1 0 0\n").unwrap();

        let cloud = read_model(temp_file, 3.0).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1], Point3f::new(3.0, 0.0, 0.0));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_unsupported_format() {
        let result = read_model("model.ply", 1.0);
        assert!(matches!(result, Err(LoadError::UnsupportedFormat { .. })));

        let result = read_model("model", 1.0);
        assert!(matches!(result, Err(LoadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_load_error_converts_to_core_error() {
        let err: pointmorph_core::Error = LoadError::Empty {
            source_name: "x.obj".to_string(),
        }
        .into();
        assert!(matches!(err, pointmorph_core::Error::Load(_)));
    }
}
