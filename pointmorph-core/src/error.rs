//! Error types for pointmorph

use thiserror::Error;

/// Main error type for pointmorph operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Invalid data: {0}")]
    InvalidData(String),
    
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    
    #[error("Load error: {0}")]
    Load(String),
    
    #[error("GPU error: {0}")]
    Gpu(String),
    
    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for pointmorph operations
pub type Result<T> = std::result::Result<T, Error>;
