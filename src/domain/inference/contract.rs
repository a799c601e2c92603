//! Preprocessing contract shared by training and inference
//!
//! The resize filter, channel layout and value scaling used at inference time
//! must be the ones the classifier was trained with. They are pinned here as a
//! versioned configuration object and asserted against the classifier's
//! declared input at startup.

use serde::{Deserialize, Serialize};

use super::tensor::InputShape;
use crate::domain::DomainError;

/// Resampling method used to bring an upload to the model's input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour, the default of the Keras image loader
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

/// Position of the channel axis in the input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// batch x height x width x channels
    #[default]
    Nhwc,
    /// batch x channels x height x width
    Nchw,
}

impl std::fmt::Display for TensorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nhwc => write!(f, "nhwc"),
            Self::Nchw => write!(f, "nchw"),
        }
    }
}

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Function mapping an 8-bit channel value into the classifier's input range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueScaling {
    /// `v / 127.5 - 1`, range [-1, 1]
    #[default]
    MobilenetV2,
    /// `v / 255`, range [0, 1]
    Unit,
    /// Unscaled, range [0, 255]
    Raw,
    /// `(v / 255 - mean[c]) / std[c]` with ImageNet statistics
    Imagenet,
}

impl ValueScaling {
    /// Scale one channel value; `channel` is 0 = red, 1 = green, 2 = blue
    pub fn apply(&self, channel: usize, value: u8) -> f32 {
        let v = f32::from(value);

        match self {
            Self::MobilenetV2 => v / 127.5 - 1.0,
            Self::Unit => v / 255.0,
            Self::Raw => v,
            Self::Imagenet => (v / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
        }
    }
}

/// Versioned preprocessing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingContract {
    pub version: String,
    pub height: u32,
    pub width: u32,
    pub resize: ResizeFilter,
    pub layout: TensorLayout,
    pub scaling: ValueScaling,
}

impl Default for PreprocessingContract {
    fn default() -> Self {
        Self {
            version: "mobilenet_v2-224-v1".to_string(),
            height: 224,
            width: 224,
            resize: ResizeFilter::default(),
            layout: TensorLayout::default(),
            scaling: ValueScaling::default(),
        }
    }
}

impl PreprocessingContract {
    /// Shape of the tensor this contract produces
    pub fn input_shape(&self) -> InputShape {
        InputShape::new(self.height as usize, self.width as usize, self.layout)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version.trim().is_empty() {
            return Err(DomainError::configuration(
                "Preprocessing contract version cannot be empty",
            ));
        }

        if self.height == 0 || self.width == 0 {
            return Err(DomainError::configuration(format!(
                "Preprocessing contract '{}' has an empty target size {}x{}",
                self.version, self.height, self.width
            )));
        }

        Ok(())
    }
}
