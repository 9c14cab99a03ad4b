//! End-to-end robust inference flow against the bundled data files.
//!
//! Uses a fixed-output classifier double so the guardrail policy and the
//! knowledge-base mapping are exercised with the real class index and
//! disease info JSON shipped under `data/`.

use std::path::PathBuf;

use image::DynamicImage;

use leafguard::inference::{Classifier, PredictorSettings, RobustPredictor};
use leafguard::knowledge::DiseaseStore;
use leafguard::labels::ClassLabelMap;
use leafguard::{LeafguardError, Result, Severity};

/// Classifier double that always votes for one class with a fixed confidence
struct FixedClassifier {
    num_classes: usize,
    winner: usize,
    confidence: f32,
}

impl Classifier for FixedClassifier {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let rest = (1.0 - self.confidence) / (self.num_classes - 1) as f32;
        let mut row = vec![rest; self.num_classes];
        row[self.winner] = self.confidence;
        Ok(vec![row; batch.len()])
    }
}

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn predictor_for(class: &str, confidence: f32) -> RobustPredictor<FixedClassifier> {
    let labels = ClassLabelMap::load(&data_path("class_indices.json")).unwrap();
    let knowledge = DiseaseStore::load(&data_path("disease_info.json")).unwrap();

    let winner = labels.index(class).expect("class present in index file");
    let classifier = FixedClassifier {
        num_classes: labels.num_classes(),
        winner,
        confidence,
    };

    let settings = PredictorSettings {
        image_size: 32,
        ..Default::default()
    };

    RobustPredictor::new(classifier, labels, knowledge, settings).unwrap()
}

fn leaf_image() -> DynamicImage {
    DynamicImage::new_rgb8(64, 48)
}

#[test]
fn healthy_tomato_reports_healthy_severity() {
    let predictor = predictor_for("Tomato_healthy", 0.90);
    let outcome = predictor.predict_image(&leaf_image()).unwrap();

    assert_eq!(outcome.status(), "Success");
    let report = outcome.report().unwrap();
    assert_eq!(report.severity, Severity::Healthy);
    assert!(report.symptoms.is_empty());
}

#[test]
fn critical_disease_carries_treatment_plan() {
    let predictor = predictor_for("Potato___Late_blight", 0.90);
    let outcome = predictor.predict_image(&leaf_image()).unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.severity, Severity::Critical);
    assert!(!report.treatment_plan.is_empty());
    assert!(!report.prevention.is_empty());
}

#[test]
fn background_sentinel_is_rejected_as_invalid() {
    let predictor = predictor_for("Background_Noise", 0.90);
    let outcome = predictor.predict_image(&leaf_image()).unwrap();

    assert_eq!(outcome.status(), "Invalid");
}

#[test]
fn low_confidence_never_surfaces_a_disease() {
    let predictor = predictor_for("Potato___Late_blight", 0.60);
    let outcome = predictor.predict_image(&leaf_image()).unwrap();

    assert_eq!(outcome.status(), "Unsure");
    assert!(outcome.report().is_none());
}

#[test]
fn undecodable_file_propagates_a_decode_error() {
    let predictor = predictor_for("Tomato_healthy", 0.90);

    // A file with an image extension but no image content.
    let path = std::env::temp_dir().join("leafguard_not_an_image.jpg");
    std::fs::write(&path, b"this is not image data").unwrap();

    let result = predictor.predict_path(&path);
    std::fs::remove_file(&path).ok();

    match result {
        Err(LeafguardError::Decode(reported, _)) => assert_eq!(reported, path),
        other => panic!("expected a decode error, got {:?}", other.map(|o| o.status())),
    }
}

#[test]
fn every_indexed_class_resolves_to_a_report() {
    let labels = ClassLabelMap::load(&data_path("class_indices.json")).unwrap();
    let knowledge = DiseaseStore::load(&data_path("disease_info.json")).unwrap();

    for name in labels.names() {
        let report = knowledge.report_for(name);
        assert!(!report.prediction.is_empty());
    }
}
