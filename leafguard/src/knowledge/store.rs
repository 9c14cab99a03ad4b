//! Disease Knowledge Store
//!
//! Loads the class-name -> DiseaseRecord lookup table once at startup and
//! serves read-only lookups. A class with no record is not an error: the
//! store degrades to a fallback report derived from the raw class
//! identifier, so a prediction never fails on a knowledge-base gap.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::error::{LeafguardError, Result};

use super::record::{DiseaseRecord, Severity, TreatmentStep};

/// Fallback scientific name when no record exists
const FALLBACK_SCIENTIFIC_NAME: &str = "N/A";

/// Fallback description when no record exists
const FALLBACK_DESCRIPTION: &str = "No description available.";

/// The disease detail attached to a successful prediction.
///
/// This is the knowledge-base half of the response schema: either a full
/// record, or the degraded fallback built from the raw class identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Display name of the condition
    pub prediction: String,

    /// Scientific name of the pathogen
    pub scientific_name: String,

    /// Short description
    pub description: String,

    /// Severity tier
    pub severity: Severity,

    /// Observable symptoms
    pub symptoms: Vec<String>,

    /// Ordered treatment steps
    pub treatment_plan: Vec<TreatmentStep>,

    /// Prevention advice
    pub prevention: Vec<String>,
}

/// Read-only map from class name to disease record
#[derive(Debug, Clone, Default)]
pub struct DiseaseStore {
    records: HashMap<String, DiseaseRecord>,
}

impl DiseaseStore {
    /// Load the knowledge base from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LeafguardError::Config(format!("disease info file {:?}: {}", path, e))
        })?;
        let store = Self::from_json_str(&json)?;
        info!("Disease knowledge base loaded: {} records", store.len());
        Ok(store)
    }

    /// Parse the knowledge base from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: HashMap<String, DiseaseRecord> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    /// Look up the record for a class name, if one exists
    pub fn get(&self, class_name: &str) -> Option<&DiseaseRecord> {
        self.records.get(class_name)
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the diagnosis report for a class name.
    ///
    /// A missing record degrades to a fallback report: the class identifier
    /// with underscores replaced by spaces, empty lists, severity Unknown.
    pub fn report_for(&self, class_name: &str) -> DiagnosisReport {
        match self.records.get(class_name) {
            Some(record) => DiagnosisReport {
                prediction: record.name.clone(),
                scientific_name: record.scientific_name.clone(),
                description: record.description.clone(),
                severity: record.severity,
                symptoms: record.symptoms.clone(),
                treatment_plan: record.treatment_plan.clone(),
                prevention: record.prevention.clone(),
            },
            None => DiagnosisReport {
                prediction: class_name.replace('_', " "),
                scientific_name: FALLBACK_SCIENTIFIC_NAME.to_string(),
                description: FALLBACK_DESCRIPTION.to_string(),
                severity: Severity::Unknown,
                symptoms: Vec::new(),
                treatment_plan: Vec::new(),
                prevention: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> DiseaseStore {
        let json = r#"{
            "Tomato_healthy": {
                "name": "Healthy Tomato Plant",
                "scientific_name": "Solanum lycopersicum",
                "severity": "Healthy",
                "description": "Foliage is intact.",
                "symptoms": [],
                "treatment_plan": [],
                "prevention": ["Stake plants for airflow."]
            },
            "Background_Noise": {
                "name": "No Leaf Detected",
                "scientific_name": "N/A",
                "severity": "Invalid",
                "description": "The image does not appear to contain a plant leaf.",
                "symptoms": [],
                "treatment_plan": [],
                "prevention": []
            }
        }"#;
        DiseaseStore::from_json_str(json).unwrap()
    }

    #[test]
    fn test_known_class_yields_full_report() {
        let store = sample_store();
        let report = store.report_for("Tomato_healthy");

        assert_eq!(report.prediction, "Healthy Tomato Plant");
        assert_eq!(report.severity, Severity::Healthy);
        assert!(report.symptoms.is_empty());
        assert_eq!(report.prevention.len(), 1);
    }

    #[test]
    fn test_missing_class_degrades_to_fallback() {
        let store = sample_store();
        let report = store.report_for("Tomato_Early_blight");

        // Underscores become spaces, lists stay empty, nothing fails.
        assert_eq!(report.prediction, "Tomato Early blight");
        assert_eq!(report.scientific_name, "N/A");
        assert_eq!(report.severity, Severity::Unknown);
        assert!(report.symptoms.is_empty());
        assert!(report.treatment_plan.is_empty());
        assert!(report.prevention.is_empty());
    }

    #[test]
    fn test_background_record_is_invalid_tier() {
        let store = sample_store();
        let record = store.get("Background_Noise").unwrap();
        assert_eq!(record.severity, Severity::Invalid);
    }
}
