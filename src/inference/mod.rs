//! Inference module
//!
//! Wraps the trained network behind a single image→label function. The
//! server loads one [`DiseaseClassifier`] at start-up and shares it
//! read-only between requests.

pub mod predictor;

pub use predictor::{DiseaseClassifier, Prediction};

/// Square input size the served classifier resizes every image to
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Default location of the trained weights (`.mpk` is appended by the recorder)
pub const DEFAULT_MODEL_PATH: &str = "models/plant_disease_model";
