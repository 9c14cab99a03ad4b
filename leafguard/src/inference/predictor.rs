//! Robust Inference Predictor
//!
//! Runs test-time augmentation consensus over a trained classifier and
//! applies the confidence/background guardrails before surfacing a disease
//! name to the user.
//!
//! The predictor is an explicitly constructed component: the classifier,
//! label map, and knowledge base are injected at build time and shared
//! read-only afterwards, so each `predict` call is pure given the loaded
//! state.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::config::AppConfig;
use crate::knowledge::DiseaseStore;
use crate::labels::ClassLabelMap;
use crate::utils::error::{LeafguardError, Result};

use super::augment;
use super::outcome::PredictionOutcome;

/// The classifier seam the predictor runs against.
///
/// Implemented by the Burn-backed model in production and by stubs in tests.
pub trait Classifier {
    /// Number of output classes
    fn num_classes(&self) -> usize;

    /// Run one batched forward pass over CHW-normalized image buffers,
    /// returning one probability vector per input.
    fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}

/// Robustness settings for the predictor
#[derive(Debug, Clone)]
pub struct PredictorSettings {
    /// Model input resolution (square)
    pub image_size: u32,

    /// Minimum consensus confidence before a prediction is trusted
    pub confidence_threshold: f32,

    /// Sentinel class name trained on non-leaf imagery
    pub background_class: String,

    /// Brightness multiplier for the fourth TTA variant
    pub brightness_factor: f32,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            image_size: crate::config::DEFAULT_IMAGE_SIZE as u32,
            confidence_threshold: crate::config::DEFAULT_CONFIDENCE_THRESHOLD,
            background_class: crate::config::DEFAULT_BACKGROUND_CLASS.to_string(),
            brightness_factor: crate::config::DEFAULT_BRIGHTNESS_FACTOR,
        }
    }
}

impl From<&AppConfig> for PredictorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            image_size: config.image_size as u32,
            confidence_threshold: config.confidence_threshold,
            background_class: config.background_class.clone(),
            brightness_factor: config.brightness_factor,
        }
    }
}

/// Augmented-consensus predictor with confidence and background guardrails
pub struct RobustPredictor<C: Classifier> {
    classifier: C,
    labels: ClassLabelMap,
    knowledge: DiseaseStore,
    settings: PredictorSettings,
}

impl<C: Classifier> RobustPredictor<C> {
    /// Construct a predictor from its injected collaborators.
    ///
    /// The label map must cover exactly the classifier's output classes.
    pub fn new(
        classifier: C,
        labels: ClassLabelMap,
        knowledge: DiseaseStore,
        settings: PredictorSettings,
    ) -> Result<Self> {
        if labels.num_classes() != classifier.num_classes() {
            return Err(LeafguardError::Config(format!(
                "label map has {} classes but classifier outputs {}",
                labels.num_classes(),
                classifier.num_classes()
            )));
        }

        Ok(Self {
            classifier,
            labels,
            knowledge,
            settings,
        })
    }

    /// Load an image from disk and predict.
    ///
    /// An undecodable image propagates a `Decode` error to the caller; there
    /// is no retry and no partial state to roll back.
    pub fn predict_path(&self, path: &Path) -> Result<PredictionOutcome> {
        let image = image::open(path)
            .map_err(|e| LeafguardError::Decode(path.to_path_buf(), e.to_string()))?;
        self.predict_image(&image)
    }

    /// Predict on a decoded RGB image of arbitrary size.
    pub fn predict_image(&self, image: &DynamicImage) -> Result<PredictionOutcome> {
        // 1. Four variants, each at the model resolution.
        let variants = augment::tta_batch(
            image,
            self.settings.image_size,
            self.settings.brightness_factor,
        );
        let batch: Vec<Vec<f32>> = variants.iter().map(augment::to_chw).collect();

        // 2. One batched forward pass.
        let predictions = self.classifier.predict_batch(&batch)?;

        // 3. Element-wise mean over the variants.
        let avg = consensus(&predictions)?;

        // 4. Arg-max gives the predicted class and its confidence.
        let (class_idx, confidence) = argmax(&avg);

        let class_name = self.labels.name(class_idx).unwrap_or("Unknown");
        debug!(
            class = class_name,
            confidence = confidence,
            "consensus prediction"
        );

        // Guardrails: refuse to guess below the confidence bar, reject
        // non-leaf imagery via the background sentinel.
        if confidence < self.settings.confidence_threshold {
            return Ok(PredictionOutcome::unsure(confidence));
        }

        if class_name == self.settings.background_class {
            return Ok(PredictionOutcome::invalid(confidence));
        }

        let report = self.knowledge.report_for(class_name);
        Ok(PredictionOutcome::success(report, confidence))
    }

    /// The normalized class label map
    pub fn labels(&self) -> &ClassLabelMap {
        &self.labels
    }

    /// The disease knowledge base
    pub fn knowledge(&self) -> &DiseaseStore {
        &self.knowledge
    }

    /// The robustness settings in effect
    pub fn settings(&self) -> &PredictorSettings {
        &self.settings
    }
}

/// Element-wise mean of a set of probability vectors.
///
/// All vectors must have the same length.
pub fn consensus(predictions: &[Vec<f32>]) -> Result<Vec<f32>> {
    let first = predictions.first().ok_or_else(|| {
        LeafguardError::Model("classifier returned no probability vectors".to_string())
    })?;

    let len = first.len();
    if predictions.iter().any(|p| p.len() != len) {
        return Err(LeafguardError::Model(
            "classifier returned probability vectors of unequal length".to_string(),
        ));
    }

    let count = predictions.len() as f32;
    let mut avg = vec![0.0f32; len];
    for prediction in predictions {
        for (acc, &p) in avg.iter_mut().zip(prediction) {
            *acc += p;
        }
    }
    for value in &mut avg {
        *value /= count;
    }

    Ok(avg)
}

/// Index and value of the largest probability
fn argmax(probabilities: &[f32]) -> (usize, f32) {
    probabilities
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, &p)| (i, p))
        .unwrap_or((0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use serde_json::json;

    /// Test double returning preset probability vectors regardless of input
    struct StubClassifier {
        responses: Vec<Vec<f32>>,
    }

    impl Classifier for StubClassifier {
        fn num_classes(&self) -> usize {
            self.responses[0].len()
        }

        fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
            assert_eq!(batch.len(), self.responses.len());
            Ok(self.responses.clone())
        }
    }

    fn test_labels() -> ClassLabelMap {
        let value = json!({
            "0": "Background_Noise",
            "1": "Tomato_Early_blight",
            "2": "Tomato_healthy"
        });
        ClassLabelMap::from_value(&value).unwrap()
    }

    fn test_knowledge() -> DiseaseStore {
        DiseaseStore::from_json_str(
            r#"{
                "Tomato_healthy": {
                    "name": "Healthy Tomato Plant",
                    "scientific_name": "Solanum lycopersicum",
                    "severity": "Healthy",
                    "description": "Foliage is intact.",
                    "symptoms": [],
                    "treatment_plan": [],
                    "prevention": []
                }
            }"#,
        )
        .unwrap()
    }

    fn predictor_with(responses: Vec<Vec<f32>>) -> RobustPredictor<StubClassifier> {
        let settings = PredictorSettings {
            image_size: 32,
            ..Default::default()
        };
        RobustPredictor::new(
            StubClassifier { responses },
            test_labels(),
            test_knowledge(),
            settings,
        )
        .unwrap()
    }

    fn test_image() -> DynamicImage {
        DynamicImage::new_rgb8(48, 32)
    }

    #[test]
    fn test_consensus_is_exact_mean() {
        let vectors = vec![
            vec![0.8, 0.1, 0.1],
            vec![0.6, 0.2, 0.2],
            vec![0.4, 0.3, 0.3],
            vec![0.2, 0.4, 0.4],
        ];

        let avg = consensus(&vectors).unwrap();
        assert_eq!(avg, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_consensus_rejects_ragged_vectors() {
        let vectors = vec![vec![0.5, 0.5], vec![1.0]];
        assert!(consensus(&vectors).is_err());
    }

    #[test]
    fn test_below_threshold_is_unsure_with_no_disease_name() {
        // Consensus winner at 0.74, threshold 0.75.
        let responses = vec![vec![0.13, 0.74, 0.13]; 4];
        let predictor = predictor_with(responses);

        let outcome = predictor.predict_image(&test_image()).unwrap();
        assert_eq!(outcome.status(), "Unsure");
        assert!(outcome.report().is_none());

        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("prediction").is_none());
    }

    #[test]
    fn test_background_class_is_invalid() {
        let responses = vec![vec![0.90, 0.05, 0.05]; 4];
        let predictor = predictor_with(responses);

        let outcome = predictor.predict_image(&test_image()).unwrap();
        assert_eq!(outcome.status(), "Invalid");
        assert!((outcome.confidence() - 0.90).abs() < 1e-6);
    }

    #[test]
    fn test_confident_known_class_is_success() {
        let responses = vec![vec![0.05, 0.05, 0.90]; 4];
        let predictor = predictor_with(responses);

        let outcome = predictor.predict_image(&test_image()).unwrap();
        assert_eq!(outcome.status(), "Success");

        let report = outcome.report().unwrap();
        assert_eq!(report.prediction, "Healthy Tomato Plant");
        assert_eq!(report.severity, crate::knowledge::Severity::Healthy);
        assert!(report.symptoms.is_empty());
    }

    #[test]
    fn test_missing_record_yields_fallback_success() {
        // Tomato_Early_blight has no record in the test knowledge base.
        let responses = vec![vec![0.05, 0.90, 0.05]; 4];
        let predictor = predictor_with(responses);

        let outcome = predictor.predict_image(&test_image()).unwrap();
        assert_eq!(outcome.status(), "Success");

        let report = outcome.report().unwrap();
        assert_eq!(report.prediction, "Tomato Early blight");
        assert!(report.symptoms.is_empty());
        assert!(report.treatment_plan.is_empty());
        assert!(report.prevention.is_empty());
    }

    #[test]
    fn test_consensus_decides_over_single_variants() {
        // Three variants vote for the disease, one outlier votes background;
        // the mean still lands on the disease with high confidence.
        let responses = vec![
            vec![0.01, 0.98, 0.01],
            vec![0.01, 0.98, 0.01],
            vec![0.01, 0.98, 0.01],
            vec![0.80, 0.10, 0.10],
        ];
        let predictor = predictor_with(responses);

        let outcome = predictor.predict_image(&test_image()).unwrap();
        assert_eq!(outcome.status(), "Success");
        // Mean of the winning column: (3 * 0.98 + 0.10) / 4 = 0.76
        assert!((outcome.confidence() - 0.76).abs() < 1e-6);
    }

    #[test]
    fn test_label_count_mismatch_rejected_at_construction() {
        let result = RobustPredictor::new(
            StubClassifier {
                responses: vec![vec![0.5, 0.5]; 4],
            },
            test_labels(), // 3 classes
            test_knowledge(),
            PredictorSettings::default(),
        );
        assert!(result.is_err());
    }
}
