//! Dataset module for plant disease images
//!
//! This module provides:
//! - The fixed 15-class disease vocabulary ([`DiseaseLabel`])
//! - The image→tensor transform shared by training and serving
//! - An image-folder loader (one sub-directory per class)
//! - Burn `Dataset`/`Batcher` implementations for the training loop

pub mod burn_dataset;
pub mod loader;
pub mod transform;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use burn_dataset::{LeafBatch, LeafBatcher, LeafDataset, LeafItem};
pub use loader::{DatasetStats, ImageFolder, ImageSample};
pub use transform::image_to_chw;

/// Number of disease classes the classifier predicts
pub const NUM_CLASSES: usize = 15;

/// Class names in classifier output order
///
/// Index `i` of the model's logits corresponds to `CLASS_NAMES[i]`.
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "Pepper__bell___Bacterial_spot",
    "Pepper__bell___healthy",
    "Potato___Early_blight",
    "Potato___healthy",
    "Potato___Late_blight",
    "Tomato_Target_Spot",
    "Tomato_Tomato_mosaic_virus",
    "Tomato_Tomato_YellowLeaf_Curl_Virus",
    "Tomato_Bacterial_spot",
    "Tomato_Early_blight",
    "Tomato_healthy",
    "Tomato_Late_blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_leaf_spot",
    "Tomato_Spider_mites_Two_spotted_spider_mite",
];

/// One of the fixed plant-health tags produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiseaseLabel(usize);

impl DiseaseLabel {
    /// All labels in output order
    pub fn all() -> impl Iterator<Item = DiseaseLabel> {
        (0..NUM_CLASSES).map(DiseaseLabel)
    }

    /// Label for a classifier output index
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_CLASSES).then_some(DiseaseLabel(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        CLASS_NAMES[self.0]
    }

    /// Whether the tag marks a healthy plant
    pub fn is_healthy(self) -> bool {
        self.as_str().ends_with("healthy")
    }

    /// Crop the tag refers to ("Pepper", "Potato" or "Tomato")
    pub fn plant_name(self) -> &'static str {
        self.as_str()
            .split('_')
            .next()
            .unwrap_or_else(|| self.as_str())
    }
}

impl fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASS_NAMES
            .iter()
            .position(|&name| name == s)
            .map(DiseaseLabel)
            .ok_or_else(|| format!("unknown disease label: {}", s))
    }
}
