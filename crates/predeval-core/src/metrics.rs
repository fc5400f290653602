//! Binary classification metrics.
//!
//! All routines take parallel ground-truth / prediction sequences of 0/1
//! labels and reject empty input, mismatched lengths, and labels outside
//! `{0, 1}`. The ROC routines take continuous scores so that probability
//! outputs can be scored the same way hard labels are.

use serde::{Deserialize, Serialize};

use crate::domain::{EvalError, ModelPredictions, Result};

/// 2×2 count table, rows = true label, columns = predicted label, in label
/// order `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_positive: u64,
}

impl ConfusionMatrix {
    /// Count outcomes over validated label sequences.
    pub fn from_labels(truth: &[u8], predicted: &[u8]) -> Result<Self> {
        validate_labels(truth, predicted)?;

        let mut cm = ConfusionMatrix {
            true_negative: 0,
            false_positive: 0,
            false_negative: 0,
            true_positive: 0,
        };
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t, p) {
                (0, 0) => cm.true_negative += 1,
                (0, _) => cm.false_positive += 1,
                (_, 0) => cm.false_negative += 1,
                _ => cm.true_positive += 1,
            }
        }
        Ok(cm)
    }

    /// Cell count at `(true_label, predicted_label)`, or `None` for a label
    /// other than 0 or 1.
    pub fn get(&self, actual: usize, predicted: usize) -> Option<u64> {
        self.as_rows().get(actual)?.get(predicted).copied()
    }

    pub fn as_rows(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn total(&self) -> u64 {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn min_count(&self) -> u64 {
        self.as_rows().iter().flatten().copied().min().unwrap_or(0)
    }

    pub fn max_count(&self) -> u64 {
        self.as_rows().iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// tp / (tp + fp); 0.0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// tp / (tp + fn); 0.0 when there are no positive examples.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Harmonic mean of precision and recall; 0.0 when both are zero.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// False positive rate, fp / (fp + tn).
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positive, self.false_positive + self.true_negative)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn validate_labels(truth: &[u8], predicted: &[u8]) -> Result<()> {
    if truth.len() != predicted.len() {
        return Err(EvalError::LengthMismatch {
            truth: truth.len(),
            predicted: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    check_binary("ground truth", truth)?;
    check_binary("predictions", predicted)
}

fn check_binary(source_name: &str, labels: &[u8]) -> Result<()> {
    match labels.iter().position(|&l| l > 1) {
        Some(index) => Err(EvalError::InvalidLabel {
            source_name: source_name.to_string(),
            index,
            value: i64::from(labels[index]),
        }),
        None => Ok(()),
    }
}

/// Fraction of positions where truth equals prediction.
pub fn accuracy(truth: &[u8], predicted: &[u8]) -> Result<f64> {
    validate_labels(truth, predicted)?;
    let matches = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(matches as f64 / truth.len() as f64)
}

/// F1 score of the positive class.
pub fn f1_score(truth: &[u8], predicted: &[u8]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(truth, predicted)?.f1())
}

/// One operating point on a ROC curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RocPoint {
    /// Scores `>= threshold` are classified positive.
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

/// ROC curve from the origin to `(1, 1)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.threshold).collect()
    }

    /// Trapezoidal area under the curve.
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
            .sum()
    }
}

/// ROC curve for continuous scores (hard 0/1 labels are valid scores).
///
/// One point per distinct score, visited in descending order, preceded by
/// the origin at threshold `+inf`. Both classes must be present in `truth`,
/// and NaN scores are rejected.
pub fn roc_curve(truth: &[u8], scores: &[f64]) -> Result<RocCurve> {
    if truth.len() != scores.len() {
        return Err(EvalError::LengthMismatch {
            truth: truth.len(),
            predicted: scores.len(),
        });
    }
    if truth.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    check_binary("ground truth", truth)?;
    if let Some(index) = scores.iter().position(|s| s.is_nan()) {
        return Err(EvalError::InvalidScore { index });
    }

    let positives = truth.iter().filter(|&&t| t == 1).count();
    let negatives = truth.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(EvalError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let p = positives as f64;
    let n = negatives as f64;
    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    }];

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if truth[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold,
            fpr: fp as f64 / n,
            tpr: tp as f64 / p,
        });
    }

    Ok(RocCurve { points })
}

/// Area under the ROC curve.
pub fn roc_auc(truth: &[u8], scores: &[f64]) -> Result<f64> {
    Ok(roc_curve(truth, scores)?.area())
}

/// Everything reported for one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    pub model: String,
    pub samples: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    pub confusion: ConfusionMatrix,
    pub roc: RocCurve,
}

impl ModelMetrics {
    /// The three console lines printed per model.
    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("F1: {:.4}", self.f1),
            format!("ROC AUC: {:.4}", self.roc_auc),
            format!("Accuracy: {:.4}", self.accuracy),
        ]
    }
}

/// Compute every metric for one model.
pub fn evaluate_model(predictions: &ModelPredictions) -> Result<ModelMetrics> {
    let confusion = ConfusionMatrix::from_labels(&predictions.truth, &predictions.predicted)?;
    let roc = roc_curve(&predictions.truth, &predictions.scores())?;

    Ok(ModelMetrics {
        model: predictions.model.clone(),
        samples: predictions.len(),
        accuracy: accuracy(&predictions.truth, &predictions.predicted)?,
        precision: confusion.precision(),
        recall: confusion.recall(),
        f1: confusion.f1(),
        roc_auc: roc.area(),
        confusion,
        roc,
    })
}
