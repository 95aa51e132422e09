//! Burn Dataset Integration
//!
//! Implements Burn's `Dataset` trait and `Batcher` for the leaf images used by
//! the offline training loop.

use std::path::Path;

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::prelude::*;
use image::ImageReader;

use super::loader::ImageSample;
use super::transform::image_to_chw;
use crate::utils::error::{AgriAssistError, Result};
use crate::utils::logging::ProgressLogger;

/// A single preprocessed image ready for batching
#[derive(Clone, Debug)]
pub struct LeafItem {
    /// Image data as flattened CHW float array [3 * H * W]
    pub image: Vec<f32>,
    /// Class index in classifier output order
    pub label: usize,
}

impl LeafItem {
    /// Load and preprocess an image from disk
    pub fn from_path(path: &Path, label: usize, image_size: usize) -> Result<Self> {
        let img = ImageReader::open(path)
            .map_err(|e| AgriAssistError::ImageLoad(path.to_path_buf(), e.to_string()))?
            .with_guessed_format()
            .map_err(|e| AgriAssistError::ImageLoad(path.to_path_buf(), e.to_string()))?
            .decode()
            .map_err(|e| AgriAssistError::ImageLoad(path.to_path_buf(), e.to_string()))?;

        Ok(Self {
            image: image_to_chw(&img, image_size as u32),
            label,
        })
    }
}

/// In-memory dataset of preprocessed leaf images
///
/// Images are decoded once up front; the training loop revisits every item
/// each epoch.
#[derive(Debug, Clone)]
pub struct LeafDataset {
    items: Vec<LeafItem>,
}

impl LeafDataset {
    /// Decode and preprocess all samples
    pub fn load(samples: &[ImageSample], image_size: usize) -> Result<Self> {
        let mut progress = ProgressLogger::new("Preprocessing images", samples.len());
        let mut items = Vec::with_capacity(samples.len());

        for sample in samples {
            items.push(LeafItem::from_path(&sample.path, sample.label.index(), image_size)?);
            progress.increment();
        }
        progress.finish();

        Ok(Self { items })
    }

    pub fn from_items(items: Vec<LeafItem>) -> Self {
        Self { items }
    }
}

impl Dataset<LeafItem> for LeafDataset {
    fn get(&self, index: usize) -> Option<LeafItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// A batch of leaf images
#[derive(Clone, Debug)]
pub struct LeafBatch<B: Backend> {
    /// Images with shape [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,
    /// Labels with shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Batcher stacking [`LeafItem`]s into tensors
#[derive(Clone, Debug)]
pub struct LeafBatcher {
    image_size: usize,
}

impl LeafBatcher {
    pub fn new(image_size: usize) -> Self {
        Self { image_size }
    }
}

impl<B: Backend> Batcher<B, LeafItem, LeafBatch<B>> for LeafBatcher {
    fn batch(&self, items: Vec<LeafItem>, device: &B::Device) -> LeafBatch<B> {
        let batch_size = items.len();
        let size = self.image_size;

        let images_data: Vec<f32> = items.iter().flat_map(|item| item.image.iter().copied()).collect();
        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, 3, size, size]),
            device,
        );

        let targets_data: Vec<i64> = items.iter().map(|item| item.label as i64).collect();
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets_data, [batch_size]),
            device,
        );

        LeafBatch { images, targets }
    }
}

#[cfg(all(test, feature = "ndarray"))]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let items = vec![
            LeafItem { image: vec![0.5; 3 * 8 * 8], label: 3 },
            LeafItem { image: vec![0.1; 3 * 8 * 8], label: 14 },
        ];

        let batch: LeafBatch<TestBackend> = LeafBatcher::new(8).batch(items, &device);
        assert_eq!(batch.images.dims(), [2, 3, 8, 8]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_dataset_get() {
        let dataset = LeafDataset::from_items(vec![LeafItem { image: vec![0.0; 3], label: 1 }]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get(0).map(|i| i.label), Some(1));
        assert!(dataset.get(1).is_none());
    }
}
