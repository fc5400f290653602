//! Domain models for predeval.
//!
//! - `ModelRoster` / `ModelSpec`: which models are evaluated and how they are drawn
//! - `ModelPredictions`: one model's ground-truth and predicted labels
//! - `EvalError`: error taxonomy shared by every stage

pub mod error;
pub mod model;
pub mod predictions;

pub use error::{EvalError, Result};
pub use model::{ModelRoster, ModelSpec, Rgb};
pub use predictions::{ModelPredictions, PredictionRecord};
