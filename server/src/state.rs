//! Application state for the Leafguard server
//!
//! The predictor and its tables are loaded once at startup and shared
//! read-only across all requests; there is no mutable state crossing
//! request boundaries, so no locking is required.

use std::sync::Arc;
use std::time::Instant;

use leafguard::backend::DefaultBackend;
use leafguard::config::AppConfig;
use leafguard::inference::{BurnClassifier, RobustPredictor};

/// Shared application state
pub struct AppState {
    /// Classifier service configuration
    pub config: AppConfig,
    /// The predictor, explicitly constructed at startup
    pub predictor: RobustPredictor<BurnClassifier<DefaultBackend>>,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        predictor: RobustPredictor<BurnClassifier<DefaultBackend>>,
    ) -> Self {
        Self {
            config,
            predictor,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
