//! Model module: the Burn CNN classifier and weight loading

pub mod cnn;

pub use cnn::{load_from_file, LeafClassifier, LeafClassifierConfig};
