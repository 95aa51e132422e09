//! Agri Assist CLI
//!
//! Offline tooling around the web application: training the disease
//! classifier, running it on local images, and inspecting the farmer
//! database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use agri_assist::backend::{backend_name, default_device, DefaultBackend, TrainingBackend};
use agri_assist::inference::DiseaseClassifier;
use agri_assist::training::{
    run_training, TrainConfig, DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE,
    DEFAULT_TRAIN_IMAGE_SIZE,
};
use agri_assist::utils::logging::{init_logging, LogConfig};
use agri_assist::{FarmerStore, DEFAULT_DATABASE_URL, DEFAULT_MODEL_PATH, IMAGE_SIZE};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Agri Assist offline tools
#[derive(Parser, Debug)]
#[command(name = "agri-assist")]
#[command(version)]
#[command(about = "Plant disease model training and farmer database tools", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train the disease classifier on an image folder
    Train {
        /// Dataset directory with one sub-directory per disease class
        #[arg(short, long, default_value = "data/PlantVillage")]
        data_dir: PathBuf,

        /// Where to write the weights (`.mpk` is appended)
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_EPOCHS)]
        epochs: usize,

        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        #[arg(short, long, default_value_t = DEFAULT_LEARNING_RATE)]
        learning_rate: f64,

        /// Square image size used during training
        #[arg(long, default_value_t = DEFAULT_TRAIN_IMAGE_SIZE)]
        image_size: usize,

        /// Fraction of samples held out for validation accuracy (0.0-1.0)
        #[arg(long, default_value = "0.0")]
        validation_fraction: f64,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Only use this many samples (after shuffling)
        #[arg(long)]
        max_samples: Option<usize>,
    },

    /// Classify a single image or every image in a directory
    Infer {
        /// Path to input image or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Path to trained weights
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Square image size the model expects
        #[arg(long, default_value_t = IMAGE_SIZE)]
        image_size: u32,
    },

    /// Create the farmer database (or apply pending migrations)
    InitDb {
        #[arg(long, env = "AGRI_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },

    /// List registered farmers
    Farmers {
        #[arg(long, env = "AGRI_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    let _ = init_logging(&log_config);

    match cli.command {
        Commands::Train {
            data_dir,
            output,
            epochs,
            batch_size,
            learning_rate,
            image_size,
            validation_fraction,
            seed,
            max_samples,
        } => {
            let config = TrainConfig {
                data_dir,
                output,
                epochs,
                batch_size,
                learning_rate,
                image_size,
                validation_fraction,
                seed,
                max_samples,
            };
            cmd_train(&config)?;
        }

        Commands::Infer {
            input,
            model,
            image_size,
        } => {
            cmd_infer(&input, &model, image_size)?;
        }

        Commands::InitDb { database_url } => {
            let store = FarmerStore::open(&database_url)
                .with_context(|| format!("Failed to open {}", database_url))?;
            println!(
                "{} {} ({} farmers registered)",
                "Database ready:".green().bold(),
                database_url,
                store.count()?
            );
        }

        Commands::Farmers { database_url } => {
            cmd_farmers(&database_url)?;
        }
    }

    Ok(())
}

fn cmd_train(config: &TrainConfig) -> Result<()> {
    info!("Training on {:?} with backend {}", config.data_dir, backend_name());
    println!("{}", "Initializing Training...".green().bold());

    let device = default_device();
    let summary = run_training::<TrainingBackend>(config, &device)?;

    println!();
    println!("{}", "Training Complete!".green().bold());
    println!("  📉 Final loss:        {:.4}", summary.final_loss);
    println!("  🎯 Train accuracy:    {:.2}%", summary.final_train_accuracy * 100.0);
    if let Some(acc) = summary.val_accuracy {
        println!("  ✅ Val accuracy:      {:.2}%", acc * 100.0);
    }
    println!("  💾 Saved to:          {:?}", summary.model_path);
    println!();
    println!("{}", "Next steps:".cyan().bold());
    println!(
        "  • Run inference: agri-assist infer --model {:?} --input <image>",
        summary.model_path
    );
    println!(
        "  • Serve it: agri-assist-server --model-path {:?}",
        summary.model_path
    );

    Ok(())
}

fn cmd_infer(input: &Path, model: &Path, image_size: u32) -> Result<()> {
    println!("{}", "Inference Configuration:".cyan().bold());
    println!("  📷 Input:   {:?}", input);
    println!("  🧠 Model:   {:?}", model);
    println!("  🖥️  Backend: {}", backend_name());
    println!();

    let files: Vec<PathBuf> = if input.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| has_image_extension(p))
            .collect();
        files.sort();
        files
    } else if input.is_file() {
        vec![input.to_path_buf()]
    } else {
        anyhow::bail!("Input path not found: {:?}", input);
    };

    let classifier = DiseaseClassifier::<DefaultBackend>::load(model, image_size, default_device())?;

    for path in &files {
        let bytes = std::fs::read(path)?;
        match classifier.predict_bytes(&bytes) {
            Ok(prediction) => println!(
                "  {} → {} ({:.1}%, {:.1} ms)",
                path.display(),
                prediction.label.to_string().green().bold(),
                prediction.confidence * 100.0,
                prediction.inference_time_ms
            ),
            Err(e) => println!("  {} → {} {}", path.display(), "Error:".red(), e),
        }
    }

    Ok(())
}

fn cmd_farmers(database_url: &str) -> Result<()> {
    let store = FarmerStore::open(database_url)?;
    let farmers = store.list()?;

    println!("{} {}", "Registered farmers:".cyan().bold(), farmers.len());
    for f in farmers {
        println!(
            "  #{:<4} {:20} {:12} {:8} {:10} {:10} {:14} {}",
            f.id, f.name, f.farm_type, f.soil_type, f.area, f.region, f.state, f.district
        );
    }

    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
