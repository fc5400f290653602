//! predeval - binary classification prediction evaluator
//!
//! Scores per-model prediction files and writes ROC / confusion-matrix plots.
//!
//! ## Commands
//!
//! - `files`: prediction files and the plot directory given directly
//! - `config`: paths derived from a YAML run configuration and a reagent ion

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use predeval_core::{
    run_evaluation, write_metrics_summary_json, EvalOutcome, EvalRequest, MetricsSummaryArtifact,
    ModelRoster, ReagentIon, RenderOptions, RunConfig, DEFAULT_DPI,
};

#[derive(Parser)]
#[command(name = "predeval")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score binary classification predictions and plot ROC / confusion matrices")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Raster resolution of written images
    #[arg(long, global = true, default_value_t = DEFAULT_DPI, env = "PREDEVAL_DPI")]
    dpi: u32,

    /// Open each written image in the platform viewer
    #[arg(long, global = true)]
    show: bool,

    /// Also write a JSON metrics summary to this path
    #[arg(long, global = true)]
    summary_json: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate prediction files given on the command line
    ///
    /// Files are paired with XGBoost, LightGBM, GBDT, Neural Network in order.
    Files {
        /// Directory the plots are written to (created if missing)
        output_dir: PathBuf,

        /// Prediction files, one `<truth> <predicted>` pair per line
        #[arg(required = true, num_args = 1..)]
        pred_files: Vec<PathBuf>,
    },

    /// Evaluate predictions located through a YAML run configuration
    Config {
        /// Path to the run configuration
        config: PathBuf,

        /// Reagent ion selecting the prediction file naming (NH4 or NO)
        reagent_ion: ReagentIon,
    },
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    };

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    predeval_core::init_tracing(cli.json, level);

    let render = RenderOptions {
        dpi: cli.dpi,
        show: cli.show,
    };
    let roster = ModelRoster::default();

    let request = match cli.command {
        Commands::Files {
            output_dir,
            pred_files,
        } => build_files_request(&output_dir, &pred_files, &roster, render)?,
        Commands::Config {
            config,
            reagent_ion,
        } => build_config_request(&config, reagent_ion, &roster, render)?,
    };

    let outcome = run_evaluation(&request).context("Evaluation failed")?;
    report_artifacts(&outcome);

    if let Some(path) = cli.summary_json.as_deref() {
        write_summary(path, request.run_label.as_deref(), &outcome)?;
    }

    Ok(())
}

/// Variant A: plot directory and prediction files straight from argv.
fn build_files_request(
    output_dir: &Path,
    pred_files: &[PathBuf],
    roster: &ModelRoster,
    render: RenderOptions,
) -> Result<EvalRequest> {
    EvalRequest::from_paths(output_dir, pred_files, roster, render)
        .context("Invalid prediction file arguments")
}

/// Variant B: paths derived from the run configuration.
fn build_config_request(
    config_path: &Path,
    ion: ReagentIon,
    roster: &ModelRoster,
    render: RenderOptions,
) -> Result<EvalRequest> {
    let config = RunConfig::from_path(config_path)
        .with_context(|| format!("Failed to load run configuration: {:?}", config_path))?;
    info!(
        run_id = %config.run.run_id,
        reagent_ion = %ion,
        "resolved run configuration"
    );
    Ok(config.to_request(ion, roster, render))
}

fn report_artifacts(outcome: &EvalOutcome) {
    for path in outcome.artifacts() {
        info!("wrote {}", path.display());
    }
}

fn write_summary(path: &Path, run_label: Option<&str>, outcome: &EvalOutcome) -> Result<()> {
    let artifact = MetricsSummaryArtifact::new(run_label, &outcome.metrics);
    write_metrics_summary_json(path, &artifact)
        .with_context(|| format!("Failed to write metrics summary: {:?}", path))?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_files_command() {
        let cli = Cli::try_parse_from(["predeval", "files", "out/plots", "a.txt", "b.txt"])
            .expect("valid args");
        assert_eq!(cli.dpi, DEFAULT_DPI);
        match cli.command {
            Commands::Files {
                output_dir,
                pred_files,
            } => {
                assert_eq!(output_dir, PathBuf::from("out/plots"));
                assert_eq!(pred_files.len(), 2);
            }
            Commands::Config { .. } => panic!("expected files command"),
        }
    }

    #[test]
    fn test_files_command_requires_a_prediction_file() {
        assert!(Cli::try_parse_from(["predeval", "files", "out/plots"]).is_err());
    }

    #[test]
    fn test_parse_config_command() {
        let cli = Cli::try_parse_from(["predeval", "--dpi", "72", "config", "run.yaml", "NO"])
            .expect("valid args");
        assert_eq!(cli.dpi, 72);
        match cli.command {
            Commands::Config {
                config,
                reagent_ion,
            } => {
                assert_eq!(config, PathBuf::from("run.yaml"));
                assert_eq!(reagent_ion, ReagentIon::No);
            }
            Commands::Files { .. } => panic!("expected config command"),
        }
    }

    #[test]
    fn test_config_command_rejects_unknown_ion() {
        assert!(Cli::try_parse_from(["predeval", "config", "run.yaml", "H3O"]).is_err());
    }

    #[test]
    fn test_config_command_argument_count() {
        assert!(Cli::try_parse_from(["predeval", "config", "run.yaml"]).is_err());
        assert!(Cli::try_parse_from(["predeval", "config", "run.yaml", "NH4", "extra"]).is_err());
    }

    #[test]
    fn test_build_files_request_rejects_too_many_files() {
        let files: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("{i}.txt"))).collect();
        let err = build_files_request(
            Path::new("plots"),
            &files,
            &ModelRoster::default(),
            RenderOptions::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("only 4 models"));
    }
}
