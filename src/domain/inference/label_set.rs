//! Ordered classifier labels

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::DomainError;

/// Category names in classifier output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Arc<[String]>,
}

impl LabelSet {
    /// Build a label set; labels must be non-empty, non-blank and unique
    pub fn new(labels: Vec<String>) -> Result<Self, DomainError> {
        if labels.is_empty() {
            return Err(DomainError::configuration("Label set cannot be empty"));
        }

        let mut seen = HashSet::with_capacity(labels.len());

        for label in &labels {
            if label.trim().is_empty() {
                return Err(DomainError::configuration("Label set contains a blank label"));
            }

            if !seen.insert(label.as_str()) {
                return Err(DomainError::configuration(format!(
                    "Label set contains duplicate label '{}'",
                    label
                )));
            }
        }

        Ok(Self {
            labels: labels.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Enforce that the classifier produces exactly one score per label
    pub fn ensure_matches_width(&self, output_width: usize) -> Result<(), DomainError> {
        if self.len() != output_width {
            return Err(DomainError::configuration(format!(
                "Label set has {} labels but the classifier produces {} outputs",
                self.len(),
                output_width
            )));
        }

        Ok(())
    }
}

/// Labels of the bundled fruit model, in training order
pub fn default_fruit_labels() -> Vec<String> {
    [
        "apple",
        "avocado",
        "banana",
        "cherry",
        "kiwi",
        "mango",
        "orange",
        "pineapple",
        "strawberry",
        "watermelon",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
