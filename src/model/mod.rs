//! Model module for the disease classifier network
//!
//! The classifier is a stock ResNet-18 feature extractor whose final fully
//! connected layer is replaced by a linear head over the disease vocabulary.

pub mod resnet;

pub use resnet::{BasicBlock, PlantDiseaseNet, PlantDiseaseNetConfig, ResNetFeatures};

/// Width of the feature vector produced by the ResNet-18 extractor
pub const FEATURE_DIM: usize = 512;
