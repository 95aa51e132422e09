//! Image-folder dataset loader
//!
//! Walks a directory with one sub-directory per disease class and collects
//! the image files inside. Directory names are matched against the fixed
//! disease vocabulary so that label indices always line up with the
//! classifier's output order, regardless of how many classes are present.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{DiseaseLabel, NUM_CLASSES};
use crate::utils::error::{AgriAssistError, Result};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// A single image sample with its label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSample {
    pub path: PathBuf,
    pub label: DiseaseLabel,
}

/// All labelled images found under a root directory
#[derive(Debug)]
pub struct ImageFolder {
    pub root_dir: PathBuf,
    pub samples: Vec<ImageSample>,
    /// Sub-directories that did not name a known disease class
    pub skipped_dirs: Vec<String>,
}

impl ImageFolder {
    /// Scan a dataset directory structured as:
    /// ```text
    /// root_dir/
    /// ├── Potato___Early_blight/
    /// │   ├── image1.jpg
    /// │   └── image2.jpg
    /// ├── Tomato_healthy/
    /// │   └── ...
    /// └── ...
    /// ```
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        info!("Loading image folder from: {:?}", root_dir);

        if !root_dir.is_dir() {
            return Err(AgriAssistError::PathNotFound(root_dir));
        }

        let mut class_dirs: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(&root_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    class_dirs.push(name.to_string());
                }
            }
        }
        class_dirs.sort();

        let mut samples = Vec::new();
        let mut skipped_dirs = Vec::new();

        for class_name in class_dirs {
            let label = match class_name.parse::<DiseaseLabel>() {
                Ok(label) => label,
                Err(_) => {
                    warn!("Skipping directory '{}': not a known disease class", class_name);
                    skipped_dirs.push(class_name);
                    continue;
                }
            };

            let before = samples.len();
            for entry in WalkDir::new(root_dir.join(&class_name))
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if is_image_file(path) {
                    samples.push(ImageSample {
                        path: path.to_path_buf(),
                        label,
                    });
                }
            }

            debug!(
                "Class '{}' (label {}): {} samples",
                class_name,
                label.index(),
                samples.len() - before
            );
        }

        info!("Loaded {} total samples", samples.len());

        Ok(Self {
            root_dir,
            samples,
            skipped_dirs,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shuffle the samples in place with a given seed
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.samples.shuffle(&mut rng);
    }

    /// Split off the last `validation_fraction` of the samples
    ///
    /// Returns `(train, validation)`. Shuffle first for a random split.
    pub fn split(self, validation_fraction: f64) -> (Vec<ImageSample>, Vec<ImageSample>) {
        let fraction = validation_fraction.clamp(0.0, 1.0);
        let mut train = self.samples;
        let val_len = (train.len() as f64 * fraction).round() as usize;
        let validation = train.split_off(train.len() - val_len);
        (train, validation)
    }

    pub fn stats(&self) -> DatasetStats {
        let mut class_counts = vec![0usize; NUM_CLASSES];
        for sample in &self.samples {
            class_counts[sample.label.index()] += 1;
        }

        DatasetStats {
            total_samples: self.samples.len(),
            class_counts,
        }
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Per-class sample counts, indexed by label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_samples: usize,
    pub class_counts: Vec<usize>,
}

impl DatasetStats {
    /// Number of classes with at least one sample
    pub fn classes_present(&self) -> usize {
        self.class_counts.iter().filter(|&&c| c > 0).count()
    }

    /// Print statistics to console
    pub fn print(&self) {
        println!("\n📊 Dataset Statistics:");
        println!("  Total samples: {}", self.total_samples);
        println!("  Classes present: {}/{}", self.classes_present(), NUM_CLASSES);
        println!("\n  Samples per class:");

        for label in DiseaseLabel::all() {
            let count = self.class_counts[label.index()];
            let bar_len = (count as f32 / self.total_samples.max(1) as f32 * 40.0) as usize;
            println!(
                "    {:3}. {:45} {:5} {}",
                label.index(),
                label.as_str(),
                count,
                "█".repeat(bar_len)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir).unwrap();
        RgbImage::from_pixel(4, 4, Rgb([0, 128, 0]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_labels_follow_vocabulary_not_directory_order() {
        let tmp = tempdir().unwrap();
        write_image(&tmp.path().join("Tomato_healthy"), "a.png");
        write_image(&tmp.path().join("Potato___Early_blight"), "b.png");
        write_image(&tmp.path().join("Potato___Early_blight"), "c.jpg");

        let folder = ImageFolder::new(tmp.path()).unwrap();
        assert_eq!(folder.len(), 3);

        let stats = folder.stats();
        assert_eq!(stats.class_counts[2], 2);
        assert_eq!(stats.class_counts[10], 1);
        assert_eq!(stats.classes_present(), 2);
    }

    #[test]
    fn test_unknown_directories_and_files_are_skipped() {
        let tmp = tempdir().unwrap();
        write_image(&tmp.path().join("Apple___Apple_scab"), "x.png");
        write_image(&tmp.path().join("Tomato_Leaf_Mold"), "y.png");
        std::fs::write(tmp.path().join("Tomato_Leaf_Mold").join("notes.txt"), "n/a").unwrap();

        let folder = ImageFolder::new(tmp.path()).unwrap();
        assert_eq!(folder.len(), 1);
        assert_eq!(folder.skipped_dirs, vec!["Apple___Apple_scab".to_string()]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = ImageFolder::new(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, AgriAssistError::PathNotFound(_)));
    }

    #[test]
    fn test_split_sizes() {
        let tmp = tempdir().unwrap();
        for i in 0..10 {
            write_image(&tmp.path().join("Tomato_Early_blight"), &format!("{}.png", i));
        }

        let mut folder = ImageFolder::new(tmp.path()).unwrap();
        folder.shuffle(42);
        let (train, val) = folder.split(0.2);
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
    }
}
