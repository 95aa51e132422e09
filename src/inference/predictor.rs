//! Disease classifier wrapper
//!
//! Loads trained weights into the fixed ResNet-18 architecture and exposes a
//! single forward pass per image. No batching, thresholding or top-k.

use std::path::{Path, PathBuf};
use std::time::Instant;

use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::activation::softmax;
use burn::tensor::{backend::Backend, Tensor, TensorData};
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::transform::{decode_image, image_to_chw};
use crate::dataset::DiseaseLabel;
use crate::model::{PlantDiseaseNet, PlantDiseaseNetConfig};
use crate::utils::error::{AgriAssistError, Result};

/// Outcome of classifying one image
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: DiseaseLabel,
    /// Softmax probability of `label`
    pub confidence: f32,
    pub inference_time_ms: f64,
}

impl Prediction {
    /// Build a prediction from per-class probabilities (arg-max wins)
    pub fn from_probabilities(probabilities: &[f32], inference_time_ms: f64) -> Result<Self> {
        let (index, &confidence) = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| AgriAssistError::Inference("model produced no scores".to_string()))?;

        let label = DiseaseLabel::from_index(index).ok_or_else(|| {
            AgriAssistError::Inference(format!("class index {} outside the vocabulary", index))
        })?;

        Ok(Self {
            label,
            confidence,
            inference_time_ms,
        })
    }
}

/// A trained network plus the preprocessing it expects
pub struct DiseaseClassifier<B: Backend> {
    model: PlantDiseaseNet<B>,
    image_size: u32,
    device: B::Device,
}

impl<B: Backend> Clone for DiseaseClassifier<B> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            image_size: self.image_size,
            device: self.device.clone(),
        }
    }
}

impl<B: Backend> DiseaseClassifier<B> {
    pub fn new(model: PlantDiseaseNet<B>, image_size: u32, device: B::Device) -> Self {
        Self {
            model,
            image_size,
            device,
        }
    }

    /// A classifier with freshly initialised weights
    ///
    /// Produces arbitrary (but valid) labels; used for smoke runs and tests.
    pub fn untrained(image_size: u32, device: B::Device) -> Self {
        let model = PlantDiseaseNet::new(&PlantDiseaseNetConfig::default(), &device);
        Self::new(model, image_size, device)
    }

    /// Load weights saved with `CompactRecorder`
    ///
    /// `path` may be given with or without the `.mpk` extension.
    pub fn load<P: AsRef<Path>>(path: P, image_size: u32, device: B::Device) -> Result<Self> {
        let path = path.as_ref();
        let weights = resolve_weights_path(path)
            .ok_or_else(|| AgriAssistError::PathNotFound(path.to_path_buf()))?;

        info!("Loading classifier weights from {:?}", weights);
        let model = PlantDiseaseNet::new(&PlantDiseaseNetConfig::default(), &device)
            .load_file(weights, &CompactRecorder::new(), &device)
            .map_err(|e| AgriAssistError::Model(format!("Failed to load model: {:?}", e)))?;

        Ok(Self::new(model, image_size, device))
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Classify a decoded image
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction> {
        let size = self.image_size as usize;
        let data = image_to_chw(image, self.image_size);
        let input = Tensor::<B, 4>::from_floats(TensorData::new(data, [1, 3, size, size]), &self.device);

        let start = Instant::now();
        let probabilities = softmax(self.model.forward(input), 1);
        let probabilities: Vec<f32> = probabilities
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| AgriAssistError::Inference(format!("{:?}", e)))?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let prediction = Prediction::from_probabilities(&probabilities, elapsed_ms)?;
        debug!(
            "Predicted {} ({:.1}%) in {:.1} ms",
            prediction.label,
            prediction.confidence * 100.0,
            elapsed_ms
        );
        Ok(prediction)
    }

    /// Decode raw upload bytes and classify them
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Prediction> {
        let image = decode_image(bytes)?;
        self.predict(&image)
    }
}

fn resolve_weights_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let with_ext = path.with_extension("mpk");
    with_ext.is_file().then_some(with_ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_takes_argmax() {
        let mut probs = vec![0.01; 15];
        probs[7] = 0.86;
        let prediction = Prediction::from_probabilities(&probs, 3.0).unwrap();

        assert_eq!(prediction.label.index(), 7);
        assert_eq!(prediction.label.as_str(), "Tomato_Tomato_YellowLeaf_Curl_Virus");
        assert_eq!(prediction.confidence, 0.86);
    }

    #[test]
    fn test_prediction_rejects_empty_and_oversized_outputs() {
        assert!(Prediction::from_probabilities(&[], 0.0).is_err());

        let mut probs = vec![0.0; 20];
        probs[18] = 1.0;
        assert!(Prediction::from_probabilities(&probs, 0.0).is_err());
    }

    #[cfg(feature = "ndarray")]
    mod ndarray {
        use super::super::*;
        use burn_ndarray::NdArray;
        use image::{ImageFormat, Rgb, RgbImage};
        use std::io::Cursor;
        use tempfile::tempdir;

        type TestBackend = NdArray;

        fn leaf_png(width: u32, height: u32) -> Vec<u8> {
            let img = RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 90])
            });
            let mut bytes = Vec::new();
            DynamicImage::ImageRgb8(img)
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .unwrap();
            bytes
        }

        #[test]
        fn test_predict_bytes_returns_vocabulary_label() {
            let classifier = DiseaseClassifier::<TestBackend>::untrained(32, Default::default());

            let prediction = classifier.predict_bytes(&leaf_png(50, 23)).unwrap();
            assert!(DiseaseLabel::all().any(|l| l == prediction.label));
            assert!((0.0..=1.0).contains(&prediction.confidence));
        }

        #[test]
        fn test_predict_bytes_rejects_corrupt_upload() {
            let classifier = DiseaseClassifier::<TestBackend>::untrained(32, Default::default());

            let err = classifier.predict_bytes(b"\x89PNG but truncated").unwrap_err();
            assert!(matches!(err, AgriAssistError::ImageDecode(_)));
        }

        #[test]
        fn test_load_missing_weights() {
            let tmp = tempdir().unwrap();
            let result =
                DiseaseClassifier::<TestBackend>::load(tmp.path().join("absent"), 32, Default::default());
            assert!(matches!(result, Err(AgriAssistError::PathNotFound(_))));
        }

        #[test]
        fn test_saved_weights_reload_to_same_prediction() {
            let tmp = tempdir().unwrap();
            let device = Default::default();
            let classifier = DiseaseClassifier::<TestBackend>::untrained(32, device);
            let path = tmp.path().join("model");

            classifier
                .model
                .clone()
                .save_file(&path, &CompactRecorder::new())
                .unwrap();

            let reloaded = DiseaseClassifier::<TestBackend>::load(&path, 32, Default::default()).unwrap();
            let bytes = leaf_png(40, 40);
            assert_eq!(
                classifier.predict_bytes(&bytes).unwrap().label,
                reloaded.predict_bytes(&bytes).unwrap().label
            );
        }
    }
}
