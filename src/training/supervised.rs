//! Supervised Training Implementation
//!
//! A plain epoch/batch loop over Burn's optimizer API: Adam, cross-entropy,
//! seeded shuffling, optional held-out accuracy, and a `CompactRecorder`
//! checkpoint at the end.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    module::{AutodiffModule, Module},
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    record::CompactRecorder,
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion, Int, Tensor,
    },
};
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::{DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE, DEFAULT_TRAIN_IMAGE_SIZE};
use crate::dataset::{ImageFolder, LeafBatch, LeafBatcher, LeafDataset};
use crate::inference::DEFAULT_MODEL_PATH;
use crate::model::{PlantDiseaseNet, PlantDiseaseNetConfig};
use crate::utils::logging::TrainingLogger;

/// Settings for one training run
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Image folder with one sub-directory per disease class
    pub data_dir: PathBuf,
    /// Checkpoint path; the recorder appends `.mpk`
    pub output: PathBuf,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub image_size: usize,
    /// Share of samples held out for accuracy reporting (0 disables it)
    pub validation_fraction: f64,
    pub seed: u64,
    /// Cap on the number of samples used, after shuffling
    pub max_samples: Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/PlantVillage"),
            output: PathBuf::from(DEFAULT_MODEL_PATH),
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            image_size: DEFAULT_TRAIN_IMAGE_SIZE,
            validation_fraction: 0.0,
            seed: 42,
            max_samples: None,
        }
    }
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub train_samples: usize,
    pub val_samples: usize,
    /// Sample-weighted mean loss of the last epoch
    pub final_loss: f64,
    /// Fraction in [0, 1]
    pub final_train_accuracy: f64,
    /// Fraction in [0, 1]; `None` without a validation split
    pub val_accuracy: Option<f64>,
    pub model_path: PathBuf,
}

/// Run training with the given configuration
///
/// # Type Parameters
/// * `B` - The autodiff backend to use (e.g., `Autodiff<NdArray>` or `Autodiff<Cuda>`)
pub fn run_training<B>(config: &TrainConfig, device: &B::Device) -> Result<TrainingSummary>
where
    B: AutodiffBackend,
{
    if config.batch_size == 0 {
        bail!("batch size must be at least 1");
    }
    if config.image_size == 0 {
        bail!("image size must be at least 1");
    }

    println!("{}", "Loading Dataset...".cyan());
    let mut folder = ImageFolder::new(&config.data_dir)
        .with_context(|| format!("Failed to read dataset at {:?}", config.data_dir))?;
    let stats = folder.stats();
    stats.print();

    if folder.is_empty() {
        bail!(
            "no images found under {:?}; expected {{class_name}}/*.jpg sub-directories",
            config.data_dir
        );
    }
    if !folder.skipped_dirs.is_empty() {
        warn!(
            "{} directories did not match a disease class and were ignored",
            folder.skipped_dirs.len()
        );
    }

    folder.shuffle(config.seed);
    if let Some(max) = config.max_samples {
        folder.samples.truncate(max);
    }
    let (train_samples, val_samples) = folder.split(config.validation_fraction);
    if train_samples.is_empty() {
        bail!("validation fraction {} leaves no training samples", config.validation_fraction);
    }

    println!();
    println!("{}", "Pre-loading Training Data...".cyan().bold());
    let train_dataset = LeafDataset::load(&train_samples, config.image_size)?;
    let val_dataset = if val_samples.is_empty() {
        None
    } else {
        println!("{}", "Pre-loading Validation Data...".cyan().bold());
        Some(LeafDataset::load(&val_samples, config.image_size)?)
    };

    let batcher = LeafBatcher::new(config.image_size);
    let mut model = PlantDiseaseNet::<B>::new(&PlantDiseaseNetConfig::default(), device);
    let mut optimizer = AdamConfig::new().init();
    let loss_fn = CrossEntropyLossConfig::new().init(device);

    println!();
    println!("{}", "Training Configuration:".cyan().bold());
    println!("  🏷️  Training samples:   {}", train_samples.len());
    println!("  ✅ Validation samples: {}", val_samples.len());
    println!("  🔄 Epochs:             {}", config.epochs);
    println!("  📦 Batch size:         {}", config.batch_size);
    println!("  📈 Learning rate:      {}", config.learning_rate);
    println!("  🖼️  Image size:         {}x{}", config.image_size, config.image_size);
    println!("  🧠 Device:             {:?}", device);
    println!();

    let mut logger = TrainingLogger::new(config.epochs);
    let mut epoch_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut final_loss = 0.0f64;
    let mut final_train_accuracy = 0.0f64;
    let mut val_accuracy = None;

    for epoch in 0..config.epochs {
        logger.start_epoch(epoch);

        let mut indices: Vec<usize> = (0..train_dataset.len()).collect();
        indices.shuffle(&mut epoch_rng);

        let mut loss_sum = 0.0f64;
        let mut correct = 0usize;
        let mut seen = 0usize;

        for (batch_idx, chunk) in indices.chunks(config.batch_size).enumerate() {
            let items: Vec<_> = chunk.iter().filter_map(|&i| train_dataset.get(i)).collect();
            let batch_len = items.len();
            let batch: LeafBatch<B> = batcher.batch(items, device);

            let output = model.forward(batch.images);
            let loss = loss_fn.forward(output.clone(), batch.targets.clone());

            let loss_value: f64 = loss.clone().into_scalar().elem();
            loss_sum += loss_value * batch_len as f64;
            correct += count_correct(output.argmax(1), batch.targets);
            seen += batch_len;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(config.learning_rate, model, grads);

            debug!("Batch {}: loss = {:.4}", batch_idx + 1, loss_value);
        }

        final_loss = loss_sum / seen.max(1) as f64;
        final_train_accuracy = correct as f64 / seen.max(1) as f64;
        val_accuracy = val_dataset
            .as_ref()
            .map(|ds| evaluate::<B>(&model, ds, &batcher, config.batch_size));

        logger.end_epoch(final_loss, final_train_accuracy, val_accuracy);
    }
    logger.log_complete(final_loss);

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    println!("{}", "Saving Model...".cyan());
    model
        .save_file(&config.output, &CompactRecorder::new())
        .map_err(|e| anyhow::anyhow!("Failed to save model: {:?}", e))?;
    info!("Model saved to {:?}", config.output);

    Ok(TrainingSummary {
        train_samples: train_samples.len(),
        val_samples: val_samples.len(),
        final_loss,
        final_train_accuracy,
        val_accuracy,
        model_path: config.output.clone(),
    })
}

/// Number of rows whose arg-max (shape [batch, 1]) matches the target
fn count_correct<B: Backend>(predictions: Tensor<B, 2, Int>, targets: Tensor<B, 1, Int>) -> usize {
    let [batch_size, _] = predictions.dims();
    let matches: i64 = predictions
        .reshape([batch_size])
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem();
    matches as usize
}

/// Accuracy in [0, 1] of the model (in inference mode) on a dataset
fn evaluate<B: AutodiffBackend>(
    model: &PlantDiseaseNet<B>,
    dataset: &LeafDataset,
    batcher: &LeafBatcher,
    batch_size: usize,
) -> f64 {
    let device = <B::InnerBackend as Backend>::Device::default();
    let inner_model = model.clone().valid();

    let len = dataset.len();
    let mut correct = 0usize;

    for start in (0..len).step_by(batch_size) {
        let end = (start + batch_size).min(len);
        let items: Vec<_> = (start..end).filter_map(|i| dataset.get(i)).collect();
        let batch: LeafBatch<B::InnerBackend> = batcher.batch(items, &device);

        let output = inner_model.forward(batch.images);
        correct += count_correct(output.argmax(1), batch.targets);
    }

    if len == 0 {
        0.0
    } else {
        correct as f64 / len as f64
    }
}

#[cfg(all(test, feature = "ndarray"))]
mod tests {
    use super::*;
    use crate::inference::DiseaseClassifier;
    use burn::backend::Autodiff;
    use burn_ndarray::NdArray;
    use image::{Rgb, RgbImage};
    use std::path::Path;
    use tempfile::tempdir;

    type TestBackend = Autodiff<NdArray>;

    fn write_class(root: &Path, class: &str, color: [u8; 3], count: usize) {
        let dir = root.join(class);
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            RgbImage::from_pixel(20, 20, Rgb(color))
                .save(dir.join(format!("{}.png", i)))
                .unwrap();
        }
    }

    #[test]
    fn test_training_writes_loadable_checkpoint() {
        let tmp = tempdir().unwrap();
        let data_dir = tmp.path().join("data");
        write_class(&data_dir, "Potato___healthy", [20, 200, 20], 3);
        write_class(&data_dir, "Potato___Late_blight", [120, 60, 10], 3);

        let config = TrainConfig {
            data_dir,
            output: tmp.path().join("models").join("plant_disease_model"),
            epochs: 1,
            batch_size: 4,
            image_size: 32,
            validation_fraction: 0.34,
            ..TrainConfig::default()
        };

        let summary = run_training::<TestBackend>(&config, &Default::default()).unwrap();
        assert_eq!(summary.train_samples + summary.val_samples, 6);
        assert_eq!(summary.val_samples, 2);
        assert!(summary.final_loss.is_finite());
        assert!((0.0..=1.0).contains(&summary.final_train_accuracy));
        assert!(summary.val_accuracy.is_some());

        let classifier =
            DiseaseClassifier::<NdArray>::load(&summary.model_path, 32, Default::default()).unwrap();
        assert_eq!(classifier.image_size(), 32);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let tmp = tempdir().unwrap();
        let config = TrainConfig {
            data_dir: tmp.path().to_path_buf(),
            output: tmp.path().join("model"),
            ..TrainConfig::default()
        };

        assert!(run_training::<TestBackend>(&config, &Default::default()).is_err());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let tmp = tempdir().unwrap();
        let config = TrainConfig {
            data_dir: tmp.path().to_path_buf(),
            batch_size: 0,
            ..TrainConfig::default()
        };

        let err = run_training::<TestBackend>(&config, &Default::default()).unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }
}
