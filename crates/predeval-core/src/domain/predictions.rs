//! Prediction records and per-model result sets.

use serde::{Deserialize, Serialize};

/// One evaluated example: the known label and the model's hard label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRecord {
    pub ground_truth: u8,
    pub predicted: u8,
}

/// A model's full sequence of prediction records, held as two parallel
/// sequences in file order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelPredictions {
    pub model: String,
    pub truth: Vec<u8>,
    pub predicted: Vec<u8>,
}

impl ModelPredictions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            truth: Vec::new(),
            predicted: Vec::new(),
        }
    }

    /// Append one record, keeping both sequences the same length.
    pub fn push(&mut self, record: PredictionRecord) {
        self.truth.push(record.ground_truth);
        self.predicted.push(record.predicted);
    }

    pub fn len(&self) -> usize {
        self.truth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.truth.is_empty()
    }

    /// Predictions as scores for score-based curve routines.
    pub fn scores(&self) -> Vec<f64> {
        self.predicted.iter().map(|&p| f64::from(p)).collect()
    }
}

impl FromIterator<PredictionRecord> for ModelPredictions {
    fn from_iter<T: IntoIterator<Item = PredictionRecord>>(iter: T) -> Self {
        let mut out = ModelPredictions::new(String::new());
        for record in iter {
            out.push(record);
        }
        out
    }
}
