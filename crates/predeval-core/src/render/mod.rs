//! PNG rendering of evaluation results.
//!
//! Two artifact kinds are produced: one ROC overlay with a curve per model,
//! and one confusion-matrix heatmap per model. Figures are 6.4 × 4.8 inches
//! rasterized at the configured DPI, with fonts sized in points.

pub mod colormap;
pub mod heatmap;
pub mod roc;

use std::path::PathBuf;
use std::sync::OnceLock;

use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};
use serde::{Deserialize, Serialize};

use crate::domain::{EvalError, ModelSpec, Result, Rgb};
use crate::metrics::{ConfusionMatrix, RocCurve};

pub use heatmap::draw_confusion_heatmap;
pub use roc::draw_roc_overlay;

/// Default raster resolution.
pub const DEFAULT_DPI: u32 = 600;

const FIGURE_WIDTH_IN: f64 = 6.4;
const FIGURE_HEIGHT_IN: f64 = 4.8;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Register the bundled sans-serif face once per process.
pub(crate) fn ensure_font() -> Result<()> {
    FONT_REGISTERED
        .get_or_init(|| {
            plotters::style::register_font("sans-serif", FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "bundled DejaVuSans.ttf could not be parsed".to_string())
        })
        .clone()
        .map_err(EvalError::Render)
}

pub(crate) fn draw_err<E: std::fmt::Display>(err: E) -> EvalError {
    EvalError::Render(err.to_string())
}

/// Rendering knobs shared by every figure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,

    /// Open each written image in the platform viewer (best effort).
    pub show: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            show: false,
        }
    }
}

/// Pixel geometry of one figure at a given DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    pub dpi: u32,
}

impl Figure {
    pub fn new(dpi: u32) -> Self {
        Self { dpi: dpi.max(1) }
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.inches(FIGURE_WIDTH_IN) as u32,
            self.inches(FIGURE_HEIGHT_IN) as u32,
        )
    }

    /// Length in inches to pixels.
    pub fn inches(&self, inches: f64) -> i32 {
        (inches * f64::from(self.dpi)).round() as i32
    }

    /// Length in points (1/72 inch) to pixels.
    pub fn points(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    /// Line width in points to whole pixels, never thinner than one pixel.
    pub fn stroke(&self, points: f64) -> u32 {
        self.points(points).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.points(points), FontStyle::Normal)
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

/// `<label>_<stem>.png`, or `<stem>.png` without a run label.
pub fn artifact_file_name(run_label: Option<&str>, stem: &str) -> String {
    match run_label {
        Some(label) => format!("{label}_{stem}.png"),
        None => format!("{stem}.png"),
    }
}

/// Prefix a plot title with the run label, if any.
pub fn figure_title(run_label: Option<&str>, title: &str) -> String {
    match run_label {
        Some(label) => format!("{label} {title}"),
        None => title.to_string(),
    }
}

/// Writes every figure for one run into a single output directory.
#[derive(Debug, Clone)]
pub struct Renderer {
    output_dir: PathBuf,
    run_label: Option<String>,
    figure: Figure,
}

impl Renderer {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        run_label: Option<String>,
        options: RenderOptions,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            run_label,
            figure: Figure::new(options.dpi),
        }
    }

    /// Create the output directory and any missing parents.
    pub fn prepare_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| EvalError::io(&self.output_dir, e))
    }

    /// Overlay every model's ROC curve in one figure.
    pub fn render_roc_overlay(&self, curves: &[(&ModelSpec, &RocCurve)]) -> Result<PathBuf> {
        let label = self.run_label.as_deref();
        let path = self.output_dir.join(artifact_file_name(label, "ROC_AUC"));
        draw_roc_overlay(&path, &figure_title(label, "ROC Curve"), curves, self.figure)?;
        Ok(path)
    }

    /// One heatmap named after the model.
    pub fn render_confusion_heatmap(
        &self,
        model: &ModelSpec,
        matrix: &ConfusionMatrix,
    ) -> Result<PathBuf> {
        let label = self.run_label.as_deref();
        let path = self.output_dir.join(artifact_file_name(label, &model.name));
        let title = figure_title(label, &format!("{} Confusion Matrix", model.name));
        draw_confusion_heatmap(&path, &title, matrix, self.figure)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_size_at_600_dpi() {
        assert_eq!(Figure::new(600).size(), (3840, 2880));
        assert_eq!(Figure::new(100).size(), (640, 480));
    }

    #[test]
    fn test_points_scale_with_dpi() {
        assert_eq!(Figure::new(72).points(10.0), 10.0);
        assert_eq!(Figure::new(144).points(10.0), 20.0);
        assert_eq!(Figure::new(10).stroke(0.5), 1);
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(artifact_file_name(None, "ROC_AUC"), "ROC_AUC.png");
        assert_eq!(artifact_file_name(Some("NH4"), "ROC_AUC"), "NH4_ROC_AUC.png");
        assert_eq!(artifact_file_name(None, "Neural Network"), "Neural Network.png");
    }

    #[test]
    fn test_figure_title_prefix() {
        assert_eq!(figure_title(None, "ROC Curve"), "ROC Curve");
        assert_eq!(figure_title(Some("NO"), "ROC Curve"), "NO ROC Curve");
    }

    #[test]
    fn test_bundled_font_registers() {
        ensure_font().expect("bundled font");
        ensure_font().expect("second call is a no-op");
    }
}
