//! Guarded classifier invocation

use std::sync::Arc;

use crate::domain::inference::{Classifier, InputShape, NormalizedImage, PredictionError};

/// Runs the classifier only on tensors that match its declared input
#[derive(Clone)]
pub struct InferenceInvoker {
    classifier: Arc<dyn Classifier>,
}

impl InferenceInvoker {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn input_shape(&self) -> InputShape {
        self.classifier.input_shape()
    }

    pub fn output_width(&self) -> usize {
        self.classifier.output_width()
    }

    pub fn invoke(&self, image: &NormalizedImage) -> Result<Vec<f32>, PredictionError> {
        let expected = self.classifier.input_shape();

        if image.shape() != expected || image.data().len() != expected.element_count() {
            return Err(PredictionError::ShapeMismatch {
                expected: expected.to_string(),
                actual: image.shape().to_string(),
            });
        }

        let scores = self.classifier.evaluate(image)?;
        let width = self.classifier.output_width();

        if scores.len() != width {
            return Err(PredictionError::inference(format!(
                "Classifier returned {} scores, expected {}",
                scores.len(),
                width
            )));
        }

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::{MockClassifier, TensorLayout};
    use crate::infrastructure::inference::fixtures::classifier_returning;

    fn image(shape: InputShape) -> NormalizedImage {
        NormalizedImage::new(shape, vec![0.0; shape.element_count()]).unwrap()
    }

    #[test]
    fn test_matching_input_returns_scores() {
        let shape = InputShape::new(4, 4, TensorLayout::Nhwc);
        let invoker = InferenceInvoker::new(Arc::new(classifier_returning(shape, vec![0.2, 0.8])));

        assert_eq!(invoker.invoke(&image(shape)).unwrap(), vec![0.2, 0.8]);
    }

    #[test]
    fn test_layout_mismatch_never_reaches_the_classifier() {
        let declared = InputShape::new(224, 224, TensorLayout::Nhwc);
        let mut classifier = MockClassifier::new();
        classifier.expect_input_shape().return_const(declared);
        classifier.expect_evaluate().never();

        let invoker = InferenceInvoker::new(Arc::new(classifier));
        let err = invoker
            .invoke(&image(InputShape::new(224, 224, TensorLayout::Nchw)))
            .unwrap_err();

        match err {
            PredictionError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, "1x224x224x3 (nhwc)");
                assert_eq!(actual, "1x3x224x224 (nchw)");
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_mismatch_is_rejected() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_input_shape()
            .return_const(InputShape::new(224, 224, TensorLayout::Nhwc));
        classifier.expect_evaluate().never();

        let invoker = InferenceInvoker::new(Arc::new(classifier));
        let result = invoker.invoke(&image(InputShape::new(128, 128, TensorLayout::Nhwc)));

        assert!(matches!(result, Err(PredictionError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_wrong_score_count_is_an_inference_error() {
        let shape = InputShape::new(2, 2, TensorLayout::Nhwc);
        let mut classifier = MockClassifier::new();
        classifier.expect_input_shape().return_const(shape);
        classifier.expect_output_width().return_const(10_usize);
        classifier.expect_evaluate().returning(|_| Ok(vec![1.0; 3]));

        let invoker = InferenceInvoker::new(Arc::new(classifier));
        let result = invoker.invoke(&image(shape));

        assert!(matches!(result, Err(PredictionError::Inference(_))));
    }
}
