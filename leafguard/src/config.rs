//! Application Configuration Module
//!
//! Defines the paths and robustness settings the classifier service is
//! constructed from. Everything is loaded once at startup; a missing model
//! or label file is a fatal configuration error with no recovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::error::{LeafguardError, Result};

/// Default input resolution for the classifier (square)
pub const DEFAULT_IMAGE_SIZE: usize = 224;

/// Minimum arg-max probability before a prediction is trusted
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// Class name trained on non-leaf imagery (walls, sky, random objects)
pub const DEFAULT_BACKGROUND_CLASS: &str = "Background_Noise";

/// Brightness scale applied to the fourth augmentation variant
pub const DEFAULT_BRIGHTNESS_FACTOR: f32 = 1.2;

/// Configuration for the Leafguard classifier service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the trained model weights
    pub model_path: PathBuf,

    /// Path to the class index JSON file (either index->name or name->index)
    pub class_indices_path: PathBuf,

    /// Path to the disease knowledge base JSON file
    pub disease_info_path: PathBuf,

    /// Directory where uploaded images are persisted before prediction
    pub upload_dir: PathBuf,

    /// Input image size (width and height, assumed square)
    pub image_size: usize,

    /// Predictions below this confidence are reported as Unsure
    pub confidence_threshold: f32,

    /// Sentinel class name used to reject non-leaf images
    pub background_class: String,

    /// Brightness multiplier for the TTA brightness variant
    pub brightness_factor: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/leaf_classifier.mpk"),
            class_indices_path: PathBuf::from("data/class_indices.json"),
            disease_info_path: PathBuf::from("data/disease_info.json"),
            upload_dir: PathBuf::from("uploads"),
            image_size: DEFAULT_IMAGE_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            background_class: DEFAULT_BACKGROUND_CLASS.to_string(),
            brightness_factor: DEFAULT_BRIGHTNESS_FACTOR,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.image_size == 0 {
            return Err(LeafguardError::Config(
                "image_size must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(LeafguardError::Config(
                "confidence_threshold must be in range [0.0, 1.0]".to_string(),
            ));
        }

        if self.brightness_factor <= 0.0 {
            return Err(LeafguardError::Config(
                "brightness_factor must be positive".to_string(),
            ));
        }

        if self.background_class.is_empty() {
            return Err(LeafguardError::Config(
                "background_class must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that the files required at startup actually exist.
    ///
    /// Called once during initialization; a miss here aborts startup.
    pub fn check_startup_files(&self) -> Result<()> {
        if !self.model_path.exists() {
            return Err(LeafguardError::Config(format!(
                "model weights not found at {:?}",
                self.model_path
            )));
        }

        if !self.class_indices_path.exists() {
            return Err(LeafguardError::Config(format!(
                "class index file not found at {:?}",
                self.class_indices_path
            )));
        }

        if !self.disease_info_path.exists() {
            return Err(LeafguardError::Config(format!(
                "disease info file not found at {:?}",
                self.disease_info_path
            )));
        }

        Ok(())
    }
}
