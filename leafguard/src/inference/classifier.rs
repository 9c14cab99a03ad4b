//! Burn-backed classifier implementation
//!
//! Bridges the `Classifier` seam to the `LeafClassifier` CNN: stacks the
//! CHW buffers of a TTA batch into a single `[N, 3, S, S]` tensor and runs
//! one batched forward pass with softmax.

use burn::tensor::{backend::Backend, Tensor, TensorData};
use tracing::info;

use crate::config::AppConfig;
use crate::knowledge::DiseaseStore;
use crate::labels::ClassLabelMap;
use crate::model::cnn::{self, LeafClassifier, LeafClassifierConfig};
use crate::utils::error::{LeafguardError, Result};

use super::predictor::{Classifier, PredictorSettings, RobustPredictor};

/// `Classifier` implementation over a trained Burn model
pub struct BurnClassifier<B: Backend> {
    model: LeafClassifier<B>,
    device: B::Device,
    input_size: usize,
}

impl<B: Backend> BurnClassifier<B> {
    /// Wrap an already-loaded model
    pub fn new(model: LeafClassifier<B>, device: B::Device, input_size: usize) -> Self {
        Self {
            model,
            device,
            input_size,
        }
    }

    /// Load the model weights from the configured path
    pub fn load(config: &AppConfig, device: &B::Device) -> Result<Self> {
        let model_config = LeafClassifierConfig::new().with_input_size(config.image_size);
        let model = cnn::load_from_file::<B>(&model_config, &config.model_path, device)?;
        info!("Model weights loaded from {:?}", config.model_path);

        Ok(Self::new(model, device.clone(), config.image_size))
    }
}

impl<B: Backend> Classifier for BurnClassifier<B> {
    fn num_classes(&self) -> usize {
        self.model.num_classes()
    }

    fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let n = batch.len();
        let expected = 3 * self.input_size * self.input_size;

        let mut flat = Vec::with_capacity(n * expected);
        for buffer in batch {
            if buffer.len() != expected {
                return Err(LeafguardError::Model(format!(
                    "input buffer has {} values, expected {} for {}x{} RGB",
                    buffer.len(),
                    expected,
                    self.input_size,
                    self.input_size
                )));
            }
            flat.extend_from_slice(buffer);
        }

        let data = TensorData::new(flat, [n, 3, self.input_size, self.input_size]);
        let input = Tensor::<B, 4>::from_data(data, &self.device);

        let probabilities = self.model.forward_softmax(input);
        let num_classes = self.model.num_classes();

        let values: Vec<f32> = probabilities
            .into_data()
            .to_vec()
            .map_err(|e| LeafguardError::Model(format!("failed to read output tensor: {:?}", e)))?;

        Ok(values.chunks(num_classes).map(|row| row.to_vec()).collect())
    }
}

/// Build the full predictor from configuration: model weights, label map,
/// and knowledge base are all loaded here, once, at startup. Any missing
/// file aborts initialization.
pub fn load_predictor<B: Backend>(
    config: &AppConfig,
    device: &B::Device,
) -> Result<RobustPredictor<BurnClassifier<B>>> {
    config.validate()?;
    config.check_startup_files()?;

    let classifier = BurnClassifier::<B>::load(config, device)?;
    let labels = ClassLabelMap::load(&config.class_indices_path)?;
    info!("Class labels loaded: {} classes", labels.num_classes());

    let knowledge = DiseaseStore::load(&config.disease_info_path)?;

    RobustPredictor::new(classifier, labels, knowledge, PredictorSettings::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;
    use crate::inference::augment;
    use image::DynamicImage;

    fn untrained_classifier(input_size: usize) -> BurnClassifier<DefaultBackend> {
        let device = Default::default();
        let config = LeafClassifierConfig::new().with_input_size(input_size);
        let model = LeafClassifier::<DefaultBackend>::new(&config, &device);
        BurnClassifier::new(model, device, input_size)
    }

    #[test]
    fn test_tta_batch_produces_valid_distributions() {
        let classifier = untrained_classifier(64);
        let image = DynamicImage::new_rgb8(90, 70);

        let variants = augment::tta_batch(&image, 64, 1.2);
        let batch: Vec<Vec<f32>> = variants.iter().map(augment::to_chw).collect();

        let predictions = classifier.predict_batch(&batch).unwrap();
        assert_eq!(predictions.len(), augment::TTA_VARIANTS);

        for row in &predictions {
            assert_eq!(row.len(), classifier.num_classes());
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-3, "row sums to {}", sum);
        }
    }

    #[test]
    fn test_wrong_buffer_size_rejected() {
        let classifier = untrained_classifier(64);
        let result = classifier.predict_batch(&[vec![0.0; 10]]);
        assert!(result.is_err());
    }
}
