//! Leafguard Prediction Server
//!
//! HTTP API for the plant-disease classifier. The model, label map, and
//! disease knowledge base are loaded once at startup and shared read-only
//! with every request handler; a missing model or label file aborts startup.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use leafguard::backend::{backend_name, default_device, DefaultBackend};
use leafguard::config::AppConfig;
use leafguard::inference::load_predictor;

use crate::state::AppState;

/// Maximum accepted upload size (16 MiB)
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Leafguard Prediction Server
#[derive(Parser, Debug)]
#[command(name = "leafguard-server")]
#[command(version)]
#[command(about = "HTTP upload API for plant disease classification")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to a JSON configuration file
    #[arg(short, long, env = "LEAFGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the model weights (overrides the configuration file)
    #[arg(long, env = "LEAFGUARD_MODEL")]
    model: Option<PathBuf>,

    /// Path to the class index JSON file
    #[arg(long, env = "LEAFGUARD_CLASS_INDICES")]
    class_indices: Option<PathBuf>,

    /// Path to the disease knowledge base JSON file
    #[arg(long, env = "LEAFGUARD_DISEASE_INFO")]
    disease_info: Option<PathBuf>,

    /// Directory for uploaded images
    #[arg(long, env = "LEAFGUARD_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    // Build configuration from file (or defaults) plus CLI overrides.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(class_indices) = cli.class_indices {
        config.class_indices_path = class_indices;
    }
    if let Some(disease_info) = cli.disease_info {
        config.disease_info_path = disease_info;
    }
    if let Some(upload_dir) = cli.upload_dir {
        config.upload_dir = upload_dir;
    }

    info!("Leafguard Prediction Server v{}", leafguard::VERSION);
    info!("Backend: {}", backend_name());
    info!("Configuration:");
    info!("  Model:        {:?}", config.model_path);
    info!("  Class index:  {:?}", config.class_indices_path);
    info!("  Disease info: {:?}", config.disease_info_path);
    info!("  Upload dir:   {:?}", config.upload_dir);
    info!("  Threshold:    {}", config.confidence_threshold);

    // Fatal on any missing startup file; no retry.
    let device = default_device();
    let predictor = load_predictor::<DefaultBackend>(&config, &device)?;
    info!(
        "Predictor ready: {} classes, background sentinel '{}'",
        predictor.labels().num_classes(),
        predictor.settings().background_class
    );

    let state = Arc::new(AppState::new(config, predictor));

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/predict", post(routes::predict::predict))
        .route("/classes", get(routes::diseases::list_classes))
        .route("/diseases/:class", get(routes::diseases::get_disease))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
