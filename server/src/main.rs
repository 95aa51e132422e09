//! Agri Assist Server
//!
//! Loads the disease classifier and the farmer database, then serves the
//! web application.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use agri_assist::backend::{backend_name, default_device};
use agri_assist::utils::logging::{init_logging, LogConfig, LogLevel};
use agri_assist::FarmerStore;
use agri_assist_server::{build_router, AppState, Classifier, ServerConfig};

/// Agri Assist web server
#[derive(Parser, Debug)]
#[command(name = "agri-assist-server")]
#[command(version)]
#[command(about = "Plant disease detection, crop advice and farmer registration")]
struct Cli {
    /// Host to bind to
    #[arg(long, env = "AGRI_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AGRI_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "AGRI_DATABASE_URL")]
    database_url: Option<String>,

    /// Trained classifier weights
    #[arg(long, env = "AGRI_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Square image size the classifier was trained for
    #[arg(long, env = "AGRI_IMAGE_SIZE")]
    image_size: Option<u32>,

    /// Upload size limit for /predict, in MiB
    #[arg(long, env = "AGRI_MAX_UPLOAD_MB")]
    max_upload_mb: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AGRI_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Plain log lines without ANSI colors, for log collectors
    #[arg(long, env = "AGRI_PLAIN_LOGS", default_value = "false")]
    plain_logs: bool,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        let config = match (self.plain_logs, self.verbose) {
            (true, true) => LogConfig::production().with_level(LogLevel::Debug),
            (true, false) => LogConfig::production(),
            (false, true) => LogConfig::verbose(),
            (false, false) => LogConfig::default(),
        };
        match self.log_level.as_deref() {
            Some(level) => config.with_level(LogLevel::parse(level)),
            None => config,
        }
    }

    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        if let Some(model_path) = self.model_path {
            config.model_path = model_path;
        }
        if let Some(image_size) = self.image_size {
            config.image_size = image_size;
        }
        if let Some(mb) = self.max_upload_mb {
            config.max_upload_bytes = mb * 1024 * 1024;
        }

        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_config())?;

    let config = cli.into_config();

    info!("Agri Assist Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Database:   {}", config.database_url);
    info!("  Model:      {:?}", config.model_path);
    info!("  Image size: {}", config.image_size);
    info!("  Backend:    {}", backend_name());

    let store = FarmerStore::open(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let classifier = Classifier::load(&config.model_path, config.image_size, default_device())
        .with_context(|| {
            format!(
                "Failed to load classifier from {:?}; train one with `agri-assist train`",
                config.model_path
            )
        })?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::new(config, Arc::new(store), classifier));
    let app = build_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
