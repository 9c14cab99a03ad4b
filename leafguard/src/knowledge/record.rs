//! Disease Record Types
//!
//! Static agricultural knowledge attached to each classifier class: the
//! human-readable disease name, severity tier, symptoms, and a treatment
//! plan with prevention advice. Records are loaded once and read-only
//! thereafter.

use serde::{Deserialize, Serialize};

/// Severity tier of a diagnosed condition.
///
/// `Invalid` is reserved for the background/non-leaf sentinel class;
/// `Unknown` is the degraded default when a class has no record. Any
/// unrecognized tier in the data file also maps to `Unknown` rather than
/// failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    Healthy,
    Warning,
    Critical,
    Invalid,
    Unknown,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unknown
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Healthy" => Severity::Healthy,
            "Warning" => Severity::Warning,
            "Critical" => Severity::Critical,
            "Invalid" => Severity::Invalid,
            _ => Severity::Unknown,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Healthy => write!(f, "Healthy"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Critical => write!(f, "Critical"),
            Severity::Invalid => write!(f, "Invalid"),
            Severity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One step of a treatment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentStep {
    /// What to do, e.g. "Spray Mancozeb @ 2.5g/L"
    pub action: String,

    /// How often to do it
    pub frequency: String,

    /// For how long, or dosage detail
    pub duration: String,

    /// Step category: Chemical, Organic, Care, ...
    #[serde(rename = "type")]
    pub category: String,
}

/// Static knowledge record for one classifier class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Human-readable disease name
    pub name: String,

    /// Scientific name of the pathogen (or plant, for healthy classes)
    pub scientific_name: String,

    /// Severity tier
    pub severity: Severity,

    /// Short description of the condition
    pub description: String,

    /// Observable symptoms, in presentation order
    #[serde(default)]
    pub symptoms: Vec<String>,

    /// Ordered treatment steps
    #[serde(default)]
    pub treatment_plan: Vec<TreatmentStep>,

    /// Prevention advice
    #[serde(default)]
    pub prevention: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_from_knowledge_base_shape() {
        let json = r#"{
            "name": "Potato Early Blight",
            "scientific_name": "Alternaria solani",
            "severity": "Warning",
            "description": "Fungal disease appearing as target-board rings.",
            "symptoms": ["Brown spots with concentric rings"],
            "treatment_plan": [
                {
                    "action": "Spray Mancozeb @ 2.5g/L",
                    "frequency": "Every 10 days",
                    "duration": "Until spots dry",
                    "type": "Chemical"
                }
            ],
            "prevention": ["Use certified disease-free tubers."]
        }"#;

        let record: DiseaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.treatment_plan[0].category, "Chemical");
        assert_eq!(record.symptoms.len(), 1);
    }

    #[test]
    fn test_unrecognized_severity_falls_back_to_unknown() {
        let severity: Severity = serde_json::from_str(r#""Catastrophic""#).unwrap();
        assert_eq!(severity, Severity::Unknown);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = r#"{
            "name": "X",
            "scientific_name": "Y",
            "severity": "Healthy",
            "description": "Z"
        }"#;

        let record: DiseaseRecord = serde_json::from_str(json).unwrap();
        assert!(record.symptoms.is_empty());
        assert!(record.treatment_plan.is_empty());
        assert!(record.prevention.is_empty());
    }
}
