//! ResNet-18 Architecture for Plant Disease Classification
//!
//! Implements the standard ResNet-18 layout with the Burn framework:
//! - 7x7/2 stem convolution, BatchNorm, ReLU and 3x3/2 max pooling
//! - four stages of two basic residual blocks (64, 128, 256, 512 filters)
//! - global average pooling
//!
//! The ImageNet classification layer is replaced by a single linear head
//! sized to the disease vocabulary.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

use super::FEATURE_DIM;

/// Configuration for the disease classifier network
#[derive(Config, Debug)]
pub struct PlantDiseaseNetConfig {
    /// Number of output classes
    #[config(default = "15")]
    pub num_classes: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,
}

impl Default for PlantDiseaseNetConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn conv3x3<B: Backend>(
    in_channels: usize,
    out_channels: usize,
    stride: usize,
    device: &B::Device,
) -> Conv2d<B> {
    Conv2dConfig::new([in_channels, out_channels], [3, 3])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .with_bias(false)
        .init(device)
}

/// 1x1 projection applied to the residual path when shape changes
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    pub conv: Conv2d<B>,
    pub bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [1, 1])
            .with_stride([stride, stride])
            .with_bias(false)
            .init(device);

        Self {
            conv,
            bn: BatchNormConfig::new(out_channels).init(device),
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(x))
    }
}

/// Basic residual block: two 3x3 convolutions with an identity shortcut
#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    pub conv1: Conv2d<B>,
    pub bn1: BatchNorm<B, 2>,
    pub conv2: Conv2d<B>,
    pub bn2: BatchNorm<B, 2>,
    pub relu: Relu,
    pub downsample: Option<Downsample<B>>,
}

impl<B: Backend> BasicBlock<B> {
    pub fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let downsample = if stride != 1 || in_channels != out_channels {
            Some(Downsample::new(in_channels, out_channels, stride, device))
        } else {
            None
        };

        Self {
            conv1: conv3x3(in_channels, out_channels, stride, device),
            bn1: BatchNormConfig::new(out_channels).init(device),
            conv2: conv3x3(out_channels, out_channels, 1, device),
            bn2: BatchNormConfig::new(out_channels).init(device),
            relu: Relu::new(),
            downsample,
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match &self.downsample {
            Some(downsample) => downsample.forward(x.clone()),
            None => x.clone(),
        };

        let out = self.conv1.forward(x);
        let out = self.bn1.forward(out);
        let out = self.relu.forward(out);
        let out = self.conv2.forward(out);
        let out = self.bn2.forward(out);

        self.relu.forward(out + identity)
    }
}

/// Two basic blocks; the first one may change width and stride
fn make_stage<B: Backend>(
    in_channels: usize,
    out_channels: usize,
    stride: usize,
    device: &B::Device,
) -> Vec<BasicBlock<B>> {
    vec![
        BasicBlock::new(in_channels, out_channels, stride, device),
        BasicBlock::new(out_channels, out_channels, 1, device),
    ]
}

/// ResNet-18 body without its classification layer
#[derive(Module, Debug)]
pub struct ResNetFeatures<B: Backend> {
    pub conv1: Conv2d<B>,
    pub bn1: BatchNorm<B, 2>,
    pub relu: Relu,
    pub maxpool: MaxPool2d,
    pub layer1: Vec<BasicBlock<B>>,
    pub layer2: Vec<BasicBlock<B>>,
    pub layer3: Vec<BasicBlock<B>>,
    pub layer4: Vec<BasicBlock<B>>,
    pub avgpool: AdaptiveAvgPool2d,
}

impl<B: Backend> ResNetFeatures<B> {
    pub fn new(in_channels: usize, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, 64], [7, 7])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(3, 3))
            .with_bias(false)
            .init(device);

        let maxpool = MaxPool2dConfig::new([3, 3])
            .with_strides([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init();

        Self {
            conv1,
            bn1: BatchNormConfig::new(64).init(device),
            relu: Relu::new(),
            maxpool,
            layer1: make_stage(64, 64, 1, device),
            layer2: make_stage(64, 128, 2, device),
            layer3: make_stage(128, 256, 2, device),
            layer4: make_stage(256, FEATURE_DIM, 2, device),
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
        }
    }

    /// Extract a [batch_size, 512] feature vector
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.bn1.forward(x);
        let x = self.relu.forward(x);
        let mut x = self.maxpool.forward(x);

        for block in self
            .layer1
            .iter()
            .chain(&self.layer2)
            .chain(&self.layer3)
            .chain(&self.layer4)
        {
            x = block.forward(x);
        }

        // [B, C, 1, 1] -> [B, C]
        let x = self.avgpool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        x.reshape([batch_size, channels])
    }
}

/// Plant disease classifier: ResNet-18 features followed by a linear head
#[derive(Module, Debug)]
pub struct PlantDiseaseNet<B: Backend> {
    pub features: ResNetFeatures<B>,
    pub classifier: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> PlantDiseaseNet<B> {
    pub fn new(config: &PlantDiseaseNetConfig, device: &B::Device) -> Self {
        Self {
            features: ResNetFeatures::new(config.in_channels, device),
            classifier: LinearConfig::new(FEATURE_DIM, config.num_classes).init(device),
            num_classes: config.num_classes,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        self.classifier.forward(self.features.forward(x))
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(all(test, feature = "ndarray"))]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let model = PlantDiseaseNet::<TestBackend>::new(&PlantDiseaseNetConfig::default(), &device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 15]);
        assert_eq!(model.num_classes(), 15);
    }

    #[test]
    fn test_features_are_512_wide_for_any_input_size() {
        let device = Default::default();
        let features = ResNetFeatures::<TestBackend>::new(3, &device);

        let output = features.forward(Tensor::zeros([1, 3, 48, 80], &device));
        assert_eq!(output.dims(), [1, FEATURE_DIM]);
    }

    #[test]
    fn test_parameter_count_matches_resnet18_with_new_head() {
        let device = Default::default();
        let model = PlantDiseaseNet::<TestBackend>::new(&PlantDiseaseNetConfig::default(), &device);

        // torchvision resnet18 has 11_689_512 parameters, 513_000 of them in fc.
        // burn also counts BatchNorm running mean and variance: 4_800 channels.
        let bn_running_stats = 2 * 4_800;
        let expected = 11_689_512 - 513_000 + (FEATURE_DIM * 15 + 15) + bn_running_stats;
        assert_eq!(model.num_params(), expected);
    }

    #[test]
    fn test_stage_downsampling() {
        let device = Default::default();
        let block = BasicBlock::<TestBackend>::new(64, 128, 2, &device);
        assert!(block.downsample.is_some());

        let out = block.forward(Tensor::zeros([1, 64, 16, 16], &device));
        assert_eq!(out.dims(), [1, 128, 8, 8]);

        let identity = BasicBlock::<TestBackend>::new(64, 64, 1, &device);
        assert!(identity.downsample.is_none());
    }
}
