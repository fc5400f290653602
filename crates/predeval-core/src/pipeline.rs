//! One evaluation run: load → score → print → render.
//!
//! Every input is loaded and every model is scored before the output
//! directory is touched, so a bad file aborts the run with nothing written.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::show_images;
use crate::domain::{EvalError, ModelRoster, ModelSpec, Result};
use crate::loader::load_predictions;
use crate::metrics::{evaluate_model, ModelMetrics};
use crate::obs::{
    emit_artifact_written, emit_evaluation_finished, emit_evaluation_started, emit_model_evaluated,
    RunSpan,
};
use crate::render::{RenderOptions, Renderer};
use crate::reporting::{format_confusion, render_console_report};

/// A model paired with the file holding its predictions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInput {
    pub spec: ModelSpec,
    pub path: PathBuf,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalRequest {
    pub models: Vec<ModelInput>,
    pub output_dir: PathBuf,

    /// Prefix for plot titles and filenames.
    pub run_label: Option<String>,

    pub render: RenderOptions,
}

impl EvalRequest {
    /// Pair prediction files with roster entries by position.
    pub fn from_paths(
        output_dir: impl Into<PathBuf>,
        files: &[PathBuf],
        roster: &ModelRoster,
        render: RenderOptions,
    ) -> Result<Self> {
        if files.is_empty() {
            return Err(EvalError::Usage(
                "at least one prediction file is required".to_string(),
            ));
        }
        if files.len() > roster.len() {
            return Err(EvalError::Usage(format!(
                "{} prediction files given but only {} models are configured",
                files.len(),
                roster.len()
            )));
        }

        let models = roster
            .iter()
            .zip(files)
            .map(|(spec, path)| ModelInput {
                spec: spec.clone(),
                path: path.clone(),
            })
            .collect();

        Ok(Self {
            models,
            output_dir: output_dir.into(),
            run_label: None,
            render,
        })
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalOutcome {
    pub metrics: Vec<ModelMetrics>,
    pub roc_plot: PathBuf,
    pub confusion_plots: Vec<PathBuf>,
}

impl EvalOutcome {
    /// Every image written, ROC overlay first.
    pub fn artifacts(&self) -> Vec<&Path> {
        std::iter::once(self.roc_plot.as_path())
            .chain(self.confusion_plots.iter().map(PathBuf::as_path))
            .collect()
    }
}

/// Run the evaluation, printing metric lines to stdout.
pub fn run_evaluation(request: &EvalRequest) -> Result<EvalOutcome> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_evaluation_with_output(request, &mut out)
}

/// Run the evaluation, printing metric lines to `out`.
pub fn run_evaluation_with_output<W: Write>(
    request: &EvalRequest,
    out: &mut W,
) -> Result<EvalOutcome> {
    let started = Instant::now();
    let _span = RunSpan::enter(request.run_label.as_deref().unwrap_or("default"));
    emit_evaluation_started(request.models.len(), &request.output_dir);

    if request.models.is_empty() {
        return Err(EvalError::Usage("no models to evaluate".to_string()));
    }

    let loaded = request
        .models
        .iter()
        .map(|input| load_predictions(&input.spec.name, &input.path))
        .collect::<Result<Vec<_>>>()?;

    let mut metrics = Vec::with_capacity(loaded.len());
    for predictions in &loaded {
        let m = evaluate_model(predictions)?;
        emit_model_evaluated(&m.model, m.samples, m.accuracy, m.f1, m.roc_auc);
        debug!(model = %m.model, confusion = %format_confusion(&m.confusion), "confusion matrix");
        metrics.push(m);
    }

    out.write_all(render_console_report(&metrics).as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| EvalError::io("<stdout>", e))?;

    let renderer = Renderer::new(
        &request.output_dir,
        request.run_label.clone(),
        request.render,
    );
    renderer.prepare_output_dir()?;

    let curves: Vec<_> = request
        .models
        .iter()
        .zip(&metrics)
        .map(|(input, m)| (&input.spec, &m.roc))
        .collect();
    let roc_plot = renderer.render_roc_overlay(&curves)?;
    emit_artifact_written("roc_overlay", &roc_plot);

    let mut confusion_plots = Vec::with_capacity(metrics.len());
    for (input, m) in request.models.iter().zip(&metrics) {
        let path = renderer.render_confusion_heatmap(&input.spec, &m.confusion)?;
        emit_artifact_written("confusion_matrix", &path);
        confusion_plots.push(path);
    }

    let outcome = EvalOutcome {
        metrics,
        roc_plot,
        confusion_plots,
    };

    if request.render.show {
        show_images(&outcome.artifacts());
    }

    emit_evaluation_finished(
        outcome.metrics.len(),
        outcome.artifacts().len(),
        started.elapsed().as_millis() as u64,
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paths_pairs_by_position() {
        let files = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
        let req = EvalRequest::from_paths(
            "plots",
            &files,
            &ModelRoster::default(),
            RenderOptions::default(),
        )
        .expect("valid request");

        assert_eq!(req.models.len(), 2);
        assert_eq!(req.models[0].spec.name, "XGBoost");
        assert_eq!(req.models[0].path, PathBuf::from("a.txt"));
        assert_eq!(req.models[1].spec.name, "LightGBM");
        assert!(req.run_label.is_none());
    }

    #[test]
    fn test_from_paths_requires_a_file() {
        let err = EvalRequest::from_paths(
            "plots",
            &[],
            &ModelRoster::default(),
            RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::Usage(_)));
    }

    #[test]
    fn test_from_paths_rejects_more_files_than_models() {
        let files: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("{i}.txt"))).collect();
        let err = EvalRequest::from_paths(
            "plots",
            &files,
            &ModelRoster::default(),
            RenderOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("5 prediction files"));
    }
}
