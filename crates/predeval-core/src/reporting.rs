use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{EvalError, Result};
use crate::metrics::{ConfusionMatrix, ModelMetrics};

pub const SUMMARY_SCHEMA_VERSION: &str = "1.0";

/// One model's entry in metrics_summary.json.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSummaryArtifact {
    pub model: String,
    pub samples: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    pub confusion_matrix: [[u64; 2]; 2],
}

impl From<&ModelMetrics> for ModelSummaryArtifact {
    fn from(m: &ModelMetrics) -> Self {
        Self {
            model: m.model.clone(),
            samples: m.samples,
            accuracy: m.accuracy,
            precision: m.precision,
            recall: m.recall,
            f1: m.f1,
            roc_auc: m.roc_auc,
            confusion_matrix: m.confusion.as_rows(),
        }
    }
}

/// Machine-readable summary of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSummaryArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_label: Option<String>,
    pub models: Vec<ModelSummaryArtifact>,
}

impl MetricsSummaryArtifact {
    pub fn new(run_label: Option<&str>, metrics: &[ModelMetrics]) -> Self {
        Self {
            schema_version: SUMMARY_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            run_label: run_label.map(str::to_string),
            models: metrics.iter().map(ModelSummaryArtifact::from).collect(),
        }
    }
}

/// Write the summary as pretty JSON.
pub fn write_metrics_summary_json(path: &Path, artifact: &MetricsSummaryArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact)?;
    std::fs::write(path, content).map_err(|e| EvalError::io(path, e))?;
    Ok(())
}

/// Console report: three lines per model, in evaluation order.
pub fn render_console_report(metrics: &[ModelMetrics]) -> String {
    let mut out = String::new();
    for m in metrics {
        for line in m.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Compact one-line rendering of a matrix, for debug logs.
pub fn format_confusion(cm: &ConfusionMatrix) -> String {
    let [[tn, fp], [fn_, tp]] = cm.as_rows();
    format!("[[{tn}, {fp}], [{fn_}, {tp}]]")
}
