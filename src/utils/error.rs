//! Error Handling Module
//!
//! Defines the error type shared by the classifier, the dataset loader and
//! the registration store. Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Agri Assist operations
#[derive(Error, Debug)]
pub enum AgriAssistError {
    /// Bytes or file could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// Error loading an image from disk
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Error with model construction or weight loading
    #[error("Model error: {0}")]
    Model(String),

    /// Error with inference
    #[error("Inference error: {0}")]
    Inference(String),

    /// Query or insert failure
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool failure
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required form field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl From<image::ImageError> for AgriAssistError {
    fn from(err: image::ImageError) -> Self {
        AgriAssistError::ImageDecode(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for AgriAssistError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AgriAssistError::Pool(err.to_string())
    }
}

/// Convenience Result type for Agri Assist operations
pub type Result<T> = std::result::Result<T, AgriAssistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgriAssistError::Model("test error".to_string());
        assert_eq!(format!("{}", err), "Model error: test error");
    }

    #[test]
    fn test_missing_field_names_field() {
        let err = AgriAssistError::MissingField("district");
        assert_eq!(err.to_string(), "Missing required field: district");
    }

    #[test]
    fn test_image_load_error() {
        let path = PathBuf::from("/path/to/leaf.jpg");
        let err = AgriAssistError::ImageLoad(path, "file not found".to_string());
        assert!(format!("{}", err).contains("leaf.jpg"));
    }

    #[test]
    fn test_diesel_error_converts() {
        let err: AgriAssistError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, AgriAssistError::Database(_)));
    }
}
