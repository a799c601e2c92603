//! Turning classifier scores into a user-facing prediction

use serde::Serialize;

use super::error::PredictionError;
use super::label_set::LabelSet;

/// Percentage confidence rounded to two decimal places, within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Convert a probability to a percentage; values outside [0, 1] are clamped
    pub fn from_probability(probability: f32) -> Self {
        let percent = f64::from(probability.clamp(0.0, 1.0)) * 100.0;
        Self((percent * 100.0).round() / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Top label with its confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: Confidence,
}

/// Index and value of the first maximum entry
///
/// Ties go to the lowest index. NaN entries never win; `None` when every
/// entry is NaN or the slice is empty.
pub fn first_max(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((index, score)),
        })
}

/// Pick the top label for a score vector
pub fn format_prediction(
    scores: &[f32],
    labels: &LabelSet,
) -> Result<PredictionResult, PredictionError> {
    let (index, score) = first_max(scores)
        .ok_or_else(|| PredictionError::inference("Classifier returned no usable scores"))?;

    if !score.is_finite() {
        return Err(PredictionError::inference(format!(
            "Classifier returned a non-finite top score: {}",
            score
        )));
    }

    let label = labels.get(index).ok_or_else(|| {
        PredictionError::configuration(format!(
            "Top score index {} is outside the label set of {} labels",
            index,
            labels.len()
        ))
    })?;

    Ok(PredictionResult {
        label: label.to_string(),
        confidence: Confidence::from_probability(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::default_fruit_labels;

    fn labels() -> LabelSet {
        LabelSet::new(default_fruit_labels()).unwrap()
    }

    #[test]
    fn test_dominant_entry_yields_label_and_rounded_confidence() {
        let mut scores = vec![0.0033_f32; 10];
        scores[6] = 0.97;

        let result = format_prediction(&scores, &labels()).unwrap();
        assert_eq!(result.label, "orange");
        assert_eq!(result.confidence.value(), 97.0);
        assert_eq!(result.confidence.to_string(), "97.00");
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let mut scores = vec![0.0_f32; 10];
        scores[3] = 0.45;
        scores[7] = 0.45;

        let result = format_prediction(&scores, &labels()).unwrap();
        assert_eq!(result.label, "cherry");

        assert_eq!(first_max(&[0.5, 0.5, 0.5]), Some((0, 0.5)));
    }

    #[test]
    fn test_nan_entries_never_win() {
        assert_eq!(first_max(&[f32::NAN, 0.2, 0.1]), Some((1, 0.2)));
        assert_eq!(first_max(&[f32::NAN, f32::NAN]), None);
        assert_eq!(first_max(&[]), None);
    }

    #[test]
    fn test_confidence_rounding_and_bounds() {
        assert_eq!(Confidence::from_probability(0.12344).value(), 12.34);
        assert_eq!(Confidence::from_probability(0.5).to_string(), "50.00");
        assert_eq!(Confidence::from_probability(1.7).value(), 100.0);
        assert_eq!(Confidence::from_probability(-3.0).value(), 0.0);
        assert_eq!(Confidence::from_probability(1.0).to_string(), "100.00");
    }

    #[test]
    fn test_confidence_always_has_two_decimals() {
        for step in 0..=1000 {
            let confidence = Confidence::from_probability(step as f32 / 1000.0);
            let text = confidence.to_string();
            let (_, decimals) = text.split_once('.').unwrap();

            assert_eq!(decimals.len(), 2);
            assert!((0.0..=100.0).contains(&confidence.value()));
        }
    }

    #[test]
    fn test_infinite_top_score_is_an_inference_error() {
        let mut scores = vec![0.0_f32; 10];
        scores[2] = f32::INFINITY;

        let err = format_prediction(&scores, &labels()).unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn test_index_outside_label_set_is_a_configuration_error() {
        let short = LabelSet::new(vec!["apple".to_string(), "banana".to_string()]).unwrap();

        let err = format_prediction(&[0.1, 0.2, 0.7], &short).unwrap_err();
        assert!(matches!(err, PredictionError::Configuration(_)));
    }
}
