//! ONNX classifier backed by tract

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::internal::DimLike;

use crate::domain::inference::{Classifier, InputShape, NormalizedImage, PredictionError};
use crate::domain::DomainError;

type TractPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// Pretrained ONNX model loaded once and evaluated read-only
pub struct TractClassifier {
    plan: TractPlan,
    input_shape: InputShape,
    output_width: usize,
    model_path: PathBuf,
}

impl std::fmt::Debug for TractClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TractClassifier")
            .field("model_path", &self.model_path)
            .field("input_shape", &self.input_shape)
            .field("output_width", &self.output_width)
            .finish()
    }
}

impl TractClassifier {
    /// Load and optimize the model for a fixed single-image input shape
    pub fn load(model_path: impl AsRef<Path>, input_shape: InputShape) -> Result<Self, DomainError> {
        let model_path = model_path.as_ref().to_path_buf();

        if !model_path.is_file() {
            return Err(DomainError::configuration(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let model = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| load_error(&model_path, "parse", e))?;

        check_declared_input(&model, &input_shape)?;

        let optimized = model
            .with_input_fact(0, f32::fact(input_shape.dims()).into())
            .and_then(|model| model.into_optimized())
            .map_err(|e| {
                DomainError::configuration(format!(
                    "Model {} does not accept input {}: {}",
                    model_path.display(),
                    input_shape,
                    e
                ))
            })?;

        let output_width = declared_output_width(&optimized, &model_path)?;

        let plan = optimized
            .into_runnable()
            .map_err(|e| load_error(&model_path, "prepare", e))?;

        info!(
            model = %model_path.display(),
            input = %input_shape,
            output_width = output_width,
            "Classifier loaded"
        );

        Ok(Self {
            plan,
            input_shape,
            output_width,
            model_path,
        })
    }
}

impl Classifier for TractClassifier {
    fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    fn output_width(&self) -> usize {
        self.output_width
    }

    fn evaluate(&self, input: &NormalizedImage) -> Result<Vec<f32>, PredictionError> {
        let tensor = Tensor::from_shape(&input.shape().dims(), input.data())
            .map_err(|e| PredictionError::inference(format!("Failed to build input tensor: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into_tvalue()))
            .map_err(|e| PredictionError::inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| PredictionError::inference("Model produced no outputs"))?;

        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PredictionError::inference(format!("Unexpected output type: {}", e)))?;

        Ok(scores.iter().copied().collect())
    }
}

fn load_error(path: &Path, stage: &str, error: TractError) -> DomainError {
    DomainError::configuration(format!(
        "Failed to {} model {}: {}",
        stage,
        path.display(),
        error
    ))
}

/// Compare the model's own declared input against the contract.
/// Symbolic axes (usually the batch) are accepted; concrete ones must match.
fn check_declared_input(model: &InferenceModel, expected: &InputShape) -> Result<(), DomainError> {
    let typed = match model.clone().into_typed() {
        Ok(typed) => typed,
        Err(e) => {
            warn!(error = %e, "Model input is not fully declared; relying on shape unification");
            return Ok(());
        }
    };

    let fact = typed
        .input_fact(0)
        .map_err(|e| DomainError::configuration(format!("Model has no input: {}", e)))?;

    let declared: Vec<Option<usize>> = fact.shape.iter().map(|dim| dim.to_usize().ok()).collect();
    let expected_dims = expected.dims();

    let matches = declared.len() == expected_dims.len()
        && declared
            .iter()
            .zip(expected_dims.iter())
            .all(|(declared, expected)| declared.is_none_or(|d| d == *expected));

    if !matches {
        let rendered: Vec<String> = declared
            .iter()
            .map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
            .collect();

        return Err(DomainError::configuration(format!(
            "Model declares input [{}] but the preprocessing contract produces {}",
            rendered.join(", "),
            expected
        )));
    }

    Ok(())
}

/// Width of a `[1, N]`-like output; every other axis must be 1
fn declared_output_width(model: &TypedModel, path: &Path) -> Result<usize, DomainError> {
    let fact = model
        .output_fact(0)
        .map_err(|e| load_error(path, "inspect", e))?;

    let dims: Vec<usize> = fact
        .shape
        .iter()
        .map(|dim| dim.to_usize())
        .collect::<TractResult<_>>()
        .map_err(|e| load_error(path, "inspect", e))?;

    match dims.split_last() {
        Some((&width, rest)) if width > 0 && rest.iter().all(|d| *d == 1) => Ok(width),
        _ => Err(DomainError::configuration(format!(
            "Model {} has output shape {:?}; expected a single score vector",
            path.display(),
            dims
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::TensorLayout;

    #[test]
    fn test_missing_model_is_a_configuration_error() {
        let shape = InputShape::new(224, 224, TensorLayout::Nhwc);
        let err = TractClassifier::load("/nonexistent/fruit.onnx", shape).unwrap_err();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unparseable_model_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.onnx");
        std::fs::write(&path, b"not a protobuf").unwrap();

        let shape = InputShape::new(224, 224, TensorLayout::Nhwc);
        let err = TractClassifier::load(&path, shape).unwrap_err();

        assert!(err.is_fatal());
    }

    fn inference_model_with_input(dims: [usize; 4]) -> InferenceModel {
        let mut model = InferenceModel::default();
        let input = model.add_source("input", f32::fact(dims).into()).unwrap();
        model.set_output_outlets(&[input]).unwrap();
        model
    }

    fn typed_model_with_output(dims: &[usize]) -> TypedModel {
        let mut model = TypedModel::default();
        let output = model.add_source("scores", f32::fact(dims.to_vec())).unwrap();
        model.set_output_outlets(&[output]).unwrap();
        model
    }

    #[test]
    fn test_declared_input_matching_the_contract_is_accepted() {
        let model = inference_model_with_input([1, 3, 224, 224]);
        let shape = InputShape::new(224, 224, TensorLayout::Nchw);

        assert!(check_declared_input(&model, &shape).is_ok());
    }

    #[test]
    fn test_declared_input_of_another_resolution_is_rejected() {
        let model = inference_model_with_input([1, 3, 100, 100]);
        let shape = InputShape::new(224, 224, TensorLayout::Nchw);

        let err = check_declared_input(&model, &shape).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("[1, 3, 100, 100]"));
    }

    #[test]
    fn test_output_width_is_the_score_vector_length() {
        let path = Path::new("fruit.onnx");

        assert_eq!(declared_output_width(&typed_model_with_output(&[1, 10]), path).unwrap(), 10);
        assert!(declared_output_width(&typed_model_with_output(&[2, 10]), path).is_err());
    }
}
