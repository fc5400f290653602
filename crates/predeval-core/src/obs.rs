//! Structured observability hooks for the evaluation lifecycle.
//!
//! - `RunSpan`: RAII guard for a run-scoped tracing span
//! - `emit_*`: one structured event per lifecycle step

use std::path::Path;

use tracing::info;

/// RAII guard that enters a run-scoped tracing span for the duration of an
/// evaluation.
///
/// ```ignore
/// let _span = RunSpan::enter("NH4");
/// // every event below carries run = "NH4"
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_label: &str) -> Self {
        let span = tracing::info_span!("predeval.run", run = %run_label);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: evaluation started over `models` prediction files.
pub fn emit_evaluation_started(models: usize, output_dir: &Path) {
    info!(
        event = "eval.started",
        models = models,
        output_dir = %output_dir.display(),
    );
}

/// Emit event: one model scored.
pub fn emit_model_evaluated(model: &str, samples: usize, accuracy: f64, f1: f64, roc_auc: f64) {
    info!(
        event = "eval.model_evaluated",
        model = %model,
        samples = samples,
        accuracy = accuracy,
        f1 = f1,
        roc_auc = roc_auc,
    );
}

/// Emit event: an image or report was written.
pub fn emit_artifact_written(kind: &str, path: &Path) {
    info!(event = "artifact.written", kind = %kind, path = %path.display());
}

/// Emit event: evaluation finished.
pub fn emit_evaluation_finished(models: usize, artifacts: usize, duration_ms: u64) {
    info!(
        event = "eval.finished",
        models = models,
        artifacts = artifacts,
        duration_ms = duration_ms,
    );
}

/// Emit event: opening an image in a viewer failed (warning level).
pub fn emit_display_failed(path: &Path, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "display.failed", path = %path.display(), error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let _span = RunSpan::enter("test-run");
    }
}
