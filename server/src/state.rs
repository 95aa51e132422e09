//! Application state for the Agri Assist server
//!
//! Holds the farmer store and the classifier loaded at start-up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use agri_assist::backend::DefaultBackend;
use agri_assist::{DiseaseClassifier, FarmerStore, DEFAULT_DATABASE_URL, DEFAULT_MODEL_PATH, IMAGE_SIZE};

/// The classifier type served by this process
pub type Classifier = DiseaseClassifier<DefaultBackend>;

/// Server configuration
#[derive(Clone, Debug, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding farmer registrations
    pub database_url: String,
    /// Trained weights (`.mpk` may be omitted)
    pub model_path: PathBuf,
    /// Square size uploads are resized to
    pub image_size: u32,
    /// Largest accepted `/predict` request body
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            image_size: IMAGE_SIZE,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    pub store: Arc<FarmerStore>,
    /// Never replaced after start-up; handlers work on a clone
    classifier: Mutex<Classifier>,
    /// Server start time
    pub started_at: Instant,
    pub started_at_utc: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<FarmerStore>, classifier: Classifier) -> Self {
        Self {
            config,
            store,
            classifier: Mutex::new(classifier),
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
        }
    }

    /// A handle to the classifier that can be moved onto a blocking thread
    pub fn classifier(&self) -> Classifier {
        self.classifier.lock().clone()
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
