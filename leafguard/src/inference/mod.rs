//! Inference module: test-time augmentation consensus with guardrails
//!
//! The pipeline for one prediction:
//! 1. build four augmented variants of the input image
//! 2. run them through the classifier in a single batched forward pass
//! 3. average the probability vectors into a consensus
//! 4. apply the confidence threshold and background-class guardrails
//! 5. map the winner to its disease record (with graceful fallback)

pub mod augment;
pub mod classifier;
pub mod outcome;
pub mod predictor;

pub use classifier::{load_predictor, BurnClassifier};
pub use outcome::PredictionOutcome;
pub use predictor::{consensus, Classifier, PredictorSettings, RobustPredictor};
