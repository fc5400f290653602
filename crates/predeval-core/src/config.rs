//! YAML run configuration and the reagent-ion selector.
//!
//! Paths are composed the same way the rest of the run tooling composes
//! them: the run directory is `run_root + run_id + "/"`, and prediction and
//! plot directories are configured segments appended to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{EvalError, ModelRoster, ModelSpec, Result};
use crate::pipeline::{EvalRequest, ModelInput};
use crate::render::RenderOptions;

/// Categorical run selector that picks the prediction file naming
/// convention and labels every plot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReagentIon {
    #[serde(rename = "NH4")]
    Nh4,
    #[serde(rename = "NO")]
    No,
}

impl ReagentIon {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReagentIon::Nh4 => "NH4",
            ReagentIon::No => "NO",
        }
    }

    /// `<ION>_<model_slug>_preds.txt`
    pub fn prediction_file_name(&self, model: &ModelSpec) -> String {
        format!("{}_{}_preds.txt", self.as_str(), model.slug)
    }
}

impl fmt::Display for ReagentIon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReagentIon {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NH4" => Ok(ReagentIon::Nh4),
            "NO" => Ok(ReagentIon::No),
            other => Err(EvalError::Usage(format!(
                "invalid reagent ion {other:?}, expected NH4 or NO"
            ))),
        }
    }
}

/// Accept any YAML scalar as a string, so `run_id: 42` and
/// `run_id: "42"` resolve identically.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorePaths {
    pub run_root: String,
    pub pred_output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisPaths {
    pub plot_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    pub core: CorePaths,
    pub analysis: AnalysisPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSection {
    #[serde(deserialize_with = "scalar_string")]
    pub run_id: String,
}

/// The subset of the run configuration the evaluator reads. Unknown keys
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub paths: PathsConfig,
    pub run: RunSection,
}

impl RunConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        Self::from_yaml_str(&text)
            .map_err(|e| EvalError::Config(format!("{}: {e}", path.display())))
    }

    pub fn run_dir(&self) -> String {
        format!("{}{}/", self.paths.core.run_root, self.run.run_id)
    }

    pub fn prediction_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.run_dir(), self.paths.core.pred_output_dir))
    }

    pub fn plot_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.run_dir(), self.paths.analysis.plot_dir))
    }

    pub fn prediction_path(&self, ion: ReagentIon, model: &ModelSpec) -> PathBuf {
        self.prediction_dir().join(ion.prediction_file_name(model))
    }

    /// Build the evaluation request for every roster model, labelled with
    /// the reagent ion.
    pub fn to_request(
        &self,
        ion: ReagentIon,
        roster: &ModelRoster,
        render: RenderOptions,
    ) -> EvalRequest {
        let models = roster
            .iter()
            .map(|spec| ModelInput {
                spec: spec.clone(),
                path: self.prediction_path(ion, spec),
            })
            .collect();

        EvalRequest {
            models,
            output_dir: self.plot_dir(),
            run_label: Some(ion.to_string()),
            render,
        }
    }
}
