//! Error types for model loading

use thiserror::Error;

/// Errors that can occur while loading a point model
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    
    #[error("Unsupported model format: {path}")]
    UnsupportedFormat { path: String },
    
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    
    #[error("No vertex records found in {source_name}")]
    Empty { source_name: String },
    
    #[error("{source_name} has {normals} normals for {vertices} vertices")]
    NormalCountMismatch { source_name: String, vertices: usize, normals: usize },
    
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LoadError> for pointmorph_core::Error {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Io(io) => pointmorph_core::Error::Io(io),
            other => pointmorph_core::Error::Load(other.to_string()),
        }
    }
}
