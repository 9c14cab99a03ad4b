//! Disease knowledge base: static records keyed by classifier class name.
//!
//! The table is hand-written agricultural data (converted to JSON under
//! `data/disease_info.json`), loaded once at startup and read-only
//! thereafter.

pub mod record;
pub mod store;

pub use record::{DiseaseRecord, Severity, TreatmentStep};
pub use store::{DiagnosisReport, DiseaseStore};
