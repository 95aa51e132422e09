//! # Agri Assist
//!
//! Core library behind the Agri Assist web application: plant-disease
//! classification from leaf photos, crop and fertilizer advice from fixed
//! tables, and farmer registration storage.
//!
//! ## Modules
//!
//! - `dataset`: Disease vocabulary, image preprocessing and training data loading
//! - `model`: ResNet-18 classifier built with Burn
//! - `inference`: Loading trained weights and classifying single images
//! - `training`: Offline supervised training loop
//! - `advisor`: Soil→crop and crop→fertilizer tables
//! - `db`: SQLite farmer store (diesel)
//! - `utils`: Errors and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agri_assist::backend::{default_device, DefaultBackend};
//! use agri_assist::inference::DiseaseClassifier;
//!
//! let classifier = DiseaseClassifier::<DefaultBackend>::load(
//!     "models/plant_disease_model",
//!     agri_assist::IMAGE_SIZE,
//!     default_device(),
//! )?;
//! let prediction = classifier.predict_bytes(&std::fs::read("leaf.jpg")?)?;
//! println!("{}", prediction.label);
//! ```

pub mod advisor;
pub mod backend;
pub mod dataset;
pub mod db;
pub mod inference;
pub mod model;
pub mod training;
pub mod utils;

// Re-export commonly used items for convenience
pub use advisor::{recommend_crop, recommend_fertilizer, RecommendationMap};
pub use dataset::{DiseaseLabel, CLASS_NAMES, NUM_CLASSES};
pub use db::{Farmer, FarmerForm, FarmerStore, NewFarmer};
pub use inference::{DiseaseClassifier, Prediction, DEFAULT_MODEL_PATH};
pub use model::{PlantDiseaseNet, PlantDiseaseNetConfig};
pub use utils::error::{AgriAssistError, Result};

/// Square size uploads are resized to before classification
pub const IMAGE_SIZE: u32 = inference::DEFAULT_IMAGE_SIZE;

/// Default SQLite database file
pub const DEFAULT_DATABASE_URL: &str = "farmers.db";

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
