//! Result formatter: picks the top pose and packages the probabilities.
//!
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LabelSet, PoseError};

/// Outcome of classifying one image. Probabilities are percentages in `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub pose: String,
    pub confidence: f32,
    pub all_probabilities: BTreeMap<String, f32>,
}

impl Prediction {
    /// Build a prediction from the raw model output (probabilities in `[0, 1]`).
    pub fn from_scores(labels: &LabelSet, scores: &[f32]) -> Result<Self, PoseError> {
        if scores.len() != labels.len() {
            return Err(PoseError::Inference(format!(
                "model returned {} scores for {} labels",
                scores.len(),
                labels.len()
            )));
        }

        let top = argmax(scores)
            .ok_or_else(|| PoseError::Inference("model returned no scores".into()))?;

        let all_probabilities = labels
            .iter()
            .zip(scores)
            .map(|(label, score)| (label.to_owned(), score * 100.0))
            .collect();

        Ok(Self {
            pose: labels[top].to_owned(),
            confidence: scores[top] * 100.0,
            all_probabilities,
        })
    }

    /// Text drawn onto the live camera picture.
    pub fn overlay_text(&self) -> String {
        format!("Pose: {} ({:.1}%)", self.pose, self.confidence)
    }
}

/// Index of the largest value. Ties go to the first index and NaN never wins.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some(best_idx) if *value <= values[best_idx] => (),
            _ => best = Some(idx),
        }
    }

    best.or_else(|| (!values.is_empty()).then_some(0))
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn argmax_prefers_the_first_of_equal_maxima() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[0.3, 0.3]), Some(0));
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), Some(2));
    }

    #[test]
    fn argmax_skips_nan_and_handles_empty_input() {
        assert_eq!(argmax(&[f32::NAN, 0.2, 0.1]), Some(1));
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn probabilities_are_percentages_keyed_by_label() -> Result<(), PoseError> {
        let labels = LabelSet::default();
        let prediction = Prediction::from_scores(&labels, &[0.05, 0.1, 0.6, 0.2, 0.05])?;

        assert_eq!(prediction.pose, "plank");
        assert!((prediction.confidence - 60.0).abs() < 1e-4);
        assert_eq!(prediction.all_probabilities.len(), 5);
        assert!((prediction.all_probabilities["tree"] - 20.0).abs() < 1e-4);

        let total: f32 = prediction.all_probabilities.values().sum();
        assert!((total - 100.0).abs() < 1e-3);

        Ok(())
    }

    #[test]
    fn tie_goes_to_the_label_listed_first() -> Result<(), PoseError> {
        let labels = LabelSet::default();
        let prediction = Prediction::from_scores(&labels, &[0.0, 0.5, 0.0, 0.5, 0.0])?;

        assert_eq!(prediction.pose, "goddess");

        Ok(())
    }

    #[test]
    fn score_count_must_match_the_label_set() {
        let labels = LabelSet::default();
        let err = Prediction::from_scores(&labels, &[0.5, 0.5]).unwrap_err();

        assert!(matches!(err, PoseError::Inference(_)));
    }

    #[test]
    fn overlay_text_has_one_decimal() -> Result<(), PoseError> {
        let labels = LabelSet::new(["tree", "plank"]);
        let prediction = Prediction::from_scores(&labels, &[0.87654, 0.12346])?;

        assert_eq!(prediction.overlay_text(), "Pose: tree (87.7%)");

        Ok(())
    }
}
