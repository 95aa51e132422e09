//! Offline supervised training
//!
//! Trains the ResNet-18 classifier on an image folder and writes the weights
//! the server loads at start-up. Not reachable from the web application.

pub mod supervised;

pub use supervised::{run_training, TrainConfig, TrainingSummary};

/// Default number of training epochs
pub const DEFAULT_EPOCHS: usize = 10;

/// Default batch size
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Default learning rate
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;

/// Square size training images are resized to
pub const DEFAULT_TRAIN_IMAGE_SIZE: usize = 128;
