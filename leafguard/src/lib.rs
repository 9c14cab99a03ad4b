//! # Leafguard
//!
//! A plant-disease image classification library built on the Burn framework,
//! with a robust inference pipeline: test-time augmentation consensus plus
//! confidence and background guardrails.
//!
//! ## Modules
//!
//! - `labels`: normalized class index <-> name mapping with format auto-detection
//! - `knowledge`: static disease records (severity, symptoms, treatment, prevention)
//! - `model`: CNN classifier built with Burn, weights loaded at startup
//! - `inference`: the `RobustPredictor` and its `Classifier` seam
//! - `config`: application configuration (paths, threshold, sentinel class)
//! - `utils`: error types and logging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leafguard::backend::{default_device, DefaultBackend};
//! use leafguard::config::AppConfig;
//! use leafguard::inference::load_predictor;
//!
//! let config = AppConfig::default();
//! let predictor = load_predictor::<DefaultBackend>(&config, &default_device())?;
//! let outcome = predictor.predict_path("leaf.jpg".as_ref())?;
//! println!("{}: {}", outcome.status(), outcome.confidence_percent());
//! ```

pub mod backend;
pub mod config;
pub mod inference;
pub mod knowledge;
pub mod labels;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::AppConfig;
pub use inference::{
    load_predictor, BurnClassifier, Classifier, PredictionOutcome, PredictorSettings,
    RobustPredictor,
};
pub use knowledge::{DiagnosisReport, DiseaseRecord, DiseaseStore, Severity, TreatmentStep};
pub use labels::ClassLabelMap;
pub use model::cnn::{LeafClassifier, LeafClassifierConfig};
pub use utils::error::{LeafguardError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
