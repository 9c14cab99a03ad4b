//! CNN Model Architecture for Leaf Disease Classification
//!
//! Implements the classifier network with the Burn framework. The feature
//! extractor is a stack of convolutional blocks; the head mirrors the
//! transfer-learning topology the weights were trained with (global average
//! pooling into a dropout-regularized linear classifier over the class set,
//! including the background sentinel class).

use std::path::Path;

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig,
        PaddingConfig2d, Relu,
    },
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor},
};

use crate::utils::error::LeafguardError;

/// Configuration for the LeafClassifier model
#[derive(Config, Debug)]
pub struct LeafClassifierConfig {
    /// Number of output classes (15 diseases + background sentinel)
    #[config(default = "16")]
    pub num_classes: usize,

    /// Input image size (assumes square images)
    #[config(default = "224")]
    pub input_size: usize,

    /// Dropout rate for the classifier head
    #[config(default = "0.2")]
    pub dropout_rate: f64,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Base number of convolutional filters
    #[config(default = "32")]
    pub base_filters: usize,
}

/// A CNN block with Conv2d, BatchNorm, ReLU, and MaxPool
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
    relu: Relu,
    pool: MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    /// Create a new convolutional block
    pub fn new(in_channels: usize, out_channels: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);

        let bn = BatchNormConfig::new(out_channels).init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        Self {
            conv,
            bn,
            relu: Relu::new(),
            pool,
        }
    }

    /// Forward pass through the block
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = self.bn.forward(x);
        let x = self.relu.forward(x);
        self.pool.forward(x)
    }
}

/// Leaf disease classifier CNN
///
/// Architecture:
/// - 4 convolutional blocks with doubling filter counts
/// - Global average pooling
/// - Dropout-regularized linear head over the class set
#[derive(Module, Debug)]
pub struct LeafClassifier<B: Backend> {
    conv1: ConvBlock<B>,
    conv2: ConvBlock<B>,
    conv3: ConvBlock<B>,
    conv4: ConvBlock<B>,

    global_pool: AdaptiveAvgPool2d,

    fc1: Linear<B>,
    dropout: Dropout,
    fc2: Linear<B>,

    num_classes: usize,
}

impl<B: Backend> LeafClassifier<B> {
    /// Create a new LeafClassifier from configuration
    pub fn new(config: &LeafClassifierConfig, device: &B::Device) -> Self {
        let base = config.base_filters;

        // Feature extraction: 3 -> 32 -> 64 -> 128 -> 256
        let conv1 = ConvBlock::new(config.in_channels, base, device);
        let conv2 = ConvBlock::new(base, base * 2, device);
        let conv3 = ConvBlock::new(base * 2, base * 4, device);
        let conv4 = ConvBlock::new(base * 4, base * 8, device);

        let global_pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();

        let fc1 = LinearConfig::new(base * 8, 256).init(device);
        let dropout = DropoutConfig::new(config.dropout_rate).init();
        let fc2 = LinearConfig::new(256, config.num_classes).init(device);

        Self {
            conv1,
            conv2,
            conv3,
            conv4,
            global_pool,
            fc1,
            dropout,
            fc2,
            num_classes: config.num_classes,
        }
    }

    /// Forward pass producing logits of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.conv2.forward(x);
        let x = self.conv3.forward(x);
        let x = self.conv4.forward(x);

        // [B, C, H, W] -> [B, C, 1, 1] -> [B, C]
        let x = self.global_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        let x = self.dropout.forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = self.forward(x);
        burn::tensor::activation::softmax(logits, 1)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Load trained weights from a file.
///
/// The weights file is opaque trained state in Burn's compact record format;
/// a missing or unreadable file is a fatal startup error.
pub fn load_from_file<B: Backend>(
    config: &LeafClassifierConfig,
    path: &Path,
    device: &B::Device,
) -> crate::utils::error::Result<LeafClassifier<B>> {
    let recorder = CompactRecorder::new();
    LeafClassifier::new(config, device)
        .load_file(path.to_path_buf(), &recorder, device)
        .map_err(|e| {
            LeafguardError::Model(format!("failed to load weights from {:?}: {:?}", path, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;

    #[test]
    fn test_leaf_classifier_output_shape() {
        let device = Default::default();
        let config = LeafClassifierConfig::new();
        let model = LeafClassifier::<DefaultBackend>::new(&config, &device);

        let input = Tensor::<DefaultBackend, 4>::zeros([2, 3, 224, 224], &device);
        let output = model.forward(input);
        let dims = output.dims();

        assert_eq!(dims[0], 2);
        assert_eq!(dims[1], 16);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let device = Default::default();
        let config = LeafClassifierConfig::new();
        let model = LeafClassifier::<DefaultBackend>::new(&config, &device);

        let input = Tensor::<DefaultBackend, 4>::zeros([1, 3, 224, 224], &device);
        let probs = model.forward_softmax(input);

        let row: Vec<f32> = probs.into_data().to_vec().unwrap();
        let sum: f32 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }
}
