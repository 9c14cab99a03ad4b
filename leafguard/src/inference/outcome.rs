//! Prediction Outcomes
//!
//! The tagged result of one inference call. Low confidence and background
//! detection are normal outcomes the caller branches on, not errors.

use serde::{Deserialize, Serialize};

use crate::knowledge::DiagnosisReport;

/// Outcome of one robust prediction.
///
/// Serializes with a `status` tag so API consumers can branch on
/// `"Success"` / `"Unsure"` / `"Invalid"` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum PredictionOutcome {
    /// Confident prediction of a known (non-background) class
    Success {
        #[serde(flatten)]
        report: DiagnosisReport,
        confidence: f32,
    },

    /// Consensus confidence fell below the configured threshold;
    /// no disease name is surfaced at all
    Unsure { message: String, confidence: f32 },

    /// The background/non-leaf sentinel class won the consensus
    Invalid { message: String, confidence: f32 },
}

impl PredictionOutcome {
    /// Build a Success outcome
    pub fn success(report: DiagnosisReport, confidence: f32) -> Self {
        Self::Success { report, confidence }
    }

    /// Build an Unsure outcome with the user-facing guidance message
    pub fn unsure(confidence: f32) -> Self {
        Self::Unsure {
            message: format!(
                "Low confidence ({:.0}%). Please upload a clearer image.",
                confidence * 100.0
            ),
            confidence,
        }
    }

    /// Build an Invalid outcome with the user-facing guidance message
    pub fn invalid(confidence: f32) -> Self {
        Self::Invalid {
            message: "No leaf detected. Please upload a clear plant image.".to_string(),
            confidence,
        }
    }

    /// The consensus confidence behind this outcome
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Success { confidence, .. }
            | Self::Unsure { confidence, .. }
            | Self::Invalid { confidence, .. } => *confidence,
        }
    }

    /// Confidence formatted as a percentage, e.g. "93.2%"
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence() * 100.0)
    }

    /// The status tag as a string
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Success",
            Self::Unsure { .. } => "Unsure",
            Self::Invalid { .. } => "Invalid",
        }
    }

    /// The diagnosis report, when the outcome is a Success
    pub fn report(&self) -> Option<&DiagnosisReport> {
        match self {
            Self::Success { report, .. } => Some(report),
            _ => None,
        }
    }
}
