//! Normalized image tensor

use super::contract::TensorLayout;
use super::error::PredictionError;

/// Shape of a single-image input batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputShape {
    pub height: usize,
    pub width: usize,
    pub layout: TensorLayout,
}

impl InputShape {
    pub const BATCH: usize = 1;
    pub const CHANNELS: usize = 3;

    pub fn new(height: usize, width: usize, layout: TensorLayout) -> Self {
        Self {
            height,
            width,
            layout,
        }
    }

    /// Tensor dimensions including the batch axis
    pub fn dims(&self) -> [usize; 4] {
        match self.layout {
            TensorLayout::Nhwc => [Self::BATCH, self.height, self.width, Self::CHANNELS],
            TensorLayout::Nchw => [Self::BATCH, Self::CHANNELS, self.height, self.width],
        }
    }

    pub fn element_count(&self) -> usize {
        self.dims().iter().product()
    }

    /// Flat offset of pixel (y, x), channel c
    pub fn offset(&self, y: usize, x: usize, c: usize) -> usize {
        match self.layout {
            TensorLayout::Nhwc => (y * self.width + x) * Self::CHANNELS + c,
            TensorLayout::Nchw => c * self.height * self.width + y * self.width + x,
        }
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.dims();
        write!(f, "{}x{}x{}x{} ({})", a, b, c, d, self.layout)
    }
}

/// Image converted to the classifier's numeric input
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    shape: InputShape,
    data: Vec<f32>,
}

impl NormalizedImage {
    pub fn new(shape: InputShape, data: Vec<f32>) -> Result<Self, PredictionError> {
        if data.len() != shape.element_count() {
            return Err(PredictionError::ShapeMismatch {
                expected: shape.to_string(),
                actual: format!("{} elements", data.len()),
            });
        }

        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> InputShape {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn channels(&self) -> usize {
        InputShape::CHANNELS
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at pixel (y, x), channel c, independent of layout
    pub fn value(&self, y: usize, x: usize, c: usize) -> Option<f32> {
        if y >= self.shape.height || x >= self.shape.width || c >= InputShape::CHANNELS {
            return None;
        }

        self.data.get(self.shape.offset(y, x, c)).copied()
    }
}
