//! Precision, recall and F-score over alignment labels.

use crate::note::{AlignmentRecord, Label};

/// Evaluation result of [`fscore_alignments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FScore {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    pub n_predicted: usize,
    pub n_ground_truth: usize,
}

/// Score a predicted alignment against ground truth, restricted to the
/// given labels.
///
/// Both alignments are filtered by `labels`; a predicted record counts as
/// correct when an identical record (same label and ids) exists in the
/// filtered ground truth. When both filtered sets are empty, precision,
/// recall and F-score are all 1.
///
/// # Example
/// ```
/// use segno::{fscore_alignments, AlignmentRecord, Label};
///
/// let truth = vec![AlignmentRecord::matched("s0", "p0")];
/// let result = fscore_alignments(&truth, &truth, &[Label::Match]);
/// assert_eq!(result.f_score, 1.0);
/// ```
pub fn fscore_alignments(
    prediction: &[AlignmentRecord],
    ground_truth: &[AlignmentRecord],
    labels: &[Label],
) -> FScore {
    let predicted: Vec<&AlignmentRecord> = prediction
        .iter()
        .filter(|r| labels.contains(&r.label()))
        .collect();
    let truth: Vec<&AlignmentRecord> = ground_truth
        .iter()
        .filter(|r| labels.contains(&r.label()))
        .collect();

    if predicted.is_empty() && truth.is_empty() {
        return FScore {
            precision: 1.0,
            recall: 1.0,
            f_score: 1.0,
            n_predicted: 0,
            n_ground_truth: 0,
        };
    }

    let correct = predicted
        .iter()
        .filter(|p| truth.iter().any(|t| t == *p))
        .count();

    let precision = if predicted.is_empty() {
        0.0
    } else {
        correct as f64 / predicted.len() as f64
    };
    let recall = if truth.is_empty() {
        0.0
    } else {
        correct as f64 / truth.len() as f64
    };
    let f_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    FScore {
        precision,
        recall,
        f_score,
        n_predicted: predicted.len(),
        n_ground_truth: truth.len(),
    }
}

/// [`fscore_alignments`] restricted to MATCH records.
pub fn fscore_matches(prediction: &[AlignmentRecord], ground_truth: &[AlignmentRecord]) -> FScore {
    fscore_alignments(prediction, ground_truth, &[Label::Match])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_alignments_score_one() {
        let alignment = vec![
            AlignmentRecord::matched("s0", "p0"),
            AlignmentRecord::matched("s1", "p1"),
            AlignmentRecord::deleted("s2"),
        ];
        let result = fscore_matches(&alignment, &alignment);
        assert_relative_eq!(result.f_score, 1.0);
        assert_eq!(result.n_predicted, 2);
        assert_eq!(result.n_ground_truth, 2);
    }

    #[test]
    fn test_wrong_match_lowers_score() {
        let truth = vec![
            AlignmentRecord::matched("s0", "p0"),
            AlignmentRecord::matched("s1", "p1"),
        ];
        let prediction = vec![
            AlignmentRecord::matched("s0", "p0"),
            AlignmentRecord::matched("s1", "p9"),
        ];
        let result = fscore_matches(&prediction, &truth);
        assert_relative_eq!(result.precision, 0.5);
        assert_relative_eq!(result.recall, 0.5);
        assert!(result.f_score < 1.0);
    }

    #[test]
    fn test_label_filtering() {
        let truth = vec![AlignmentRecord::deleted("s0")];
        let prediction = vec![
            AlignmentRecord::deleted("s0"),
            AlignmentRecord::matched("s1", "p1"),
        ];
        let result = fscore_alignments(&prediction, &truth, &[Label::Deletion]);
        assert_relative_eq!(result.f_score, 1.0);
        assert_eq!(result.n_predicted, 1);
    }

    #[test]
    fn test_both_empty_is_perfect() {
        let result = fscore_alignments(&[], &[], &[Label::Match]);
        assert_relative_eq!(result.precision, 1.0);
        assert_relative_eq!(result.recall, 1.0);
        assert_relative_eq!(result.f_score, 1.0);
    }

    #[test]
    fn test_empty_prediction_zero_precision() {
        let truth = vec![AlignmentRecord::matched("s0", "p0")];
        let result = fscore_matches(&[], &truth);
        assert_relative_eq!(result.precision, 0.0);
        assert_relative_eq!(result.recall, 0.0);
        assert_relative_eq!(result.f_score, 0.0);
    }
}
