//! Classifier wrapper that admits one evaluation at a time

use std::sync::{Arc, Mutex};

use crate::domain::inference::{Classifier, InputShape, NormalizedImage, PredictionError};

/// For runtimes whose evaluation is not safe to run concurrently
pub struct SerializedClassifier {
    inner: Arc<dyn Classifier>,
    lock: Mutex<()>,
}

impl SerializedClassifier {
    pub fn new(inner: Arc<dyn Classifier>) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }
}

impl Classifier for SerializedClassifier {
    fn input_shape(&self) -> InputShape {
        self.inner.input_shape()
    }

    fn output_width(&self) -> usize {
        self.inner.output_width()
    }

    fn evaluate(&self, input: &NormalizedImage) -> Result<Vec<f32>, PredictionError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| PredictionError::inference("Classifier lock poisoned"))?;

        self.inner.evaluate(input)
    }
}
