//! predeval Core Library
//!
//! Loads binary classification prediction files, scores each model, and
//! renders ROC and confusion-matrix plots.

pub mod config;
pub mod display;
pub mod domain;
pub mod loader;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod render;
pub mod reporting;
pub mod telemetry;

pub use config::{ReagentIon, RunConfig};
pub use domain::{
    EvalError, ModelPredictions, ModelRoster, ModelSpec, PredictionRecord, Result, Rgb,
};
pub use loader::{load_predictions, parse_predictions};
pub use metrics::{
    accuracy, evaluate_model, f1_score, roc_auc, roc_curve, ConfusionMatrix, ModelMetrics,
    RocCurve, RocPoint,
};
pub use obs::{
    emit_artifact_written, emit_display_failed, emit_evaluation_finished,
    emit_evaluation_started, emit_model_evaluated, RunSpan,
};
pub use pipeline::{
    run_evaluation, run_evaluation_with_output, EvalOutcome, EvalRequest, ModelInput,
};
pub use render::{RenderOptions, Renderer, DEFAULT_DPI};
pub use reporting::{
    render_console_report, write_metrics_summary_json, MetricsSummaryArtifact,
    ModelSummaryArtifact,
};
pub use telemetry::init_tracing;

/// predeval version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
