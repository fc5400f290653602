//! Overlaid ROC curves.

use std::path::Path;

use plotters::prelude::*;

use super::{draw_err, ensure_font, Figure};
use crate::domain::{ModelSpec, Result};
use crate::metrics::RocCurve;

/// Axis range with a small pad so curves on the edges stay visible.
const AXIS_RANGE: std::ops::Range<f64> = -0.05..1.05;

const DASH: f64 = 0.03;
const GAP: f64 = 0.015;

/// Legend swatch and the slot reserved for it, in inches. The label text
/// starts after the slot, so the swatch must be the shorter of the two.
const LEGEND_SLOT_IN: f64 = 0.35;
const LEGEND_SWATCH_IN: f64 = 0.25;

/// `(slot, swatch)` legend widths in pixels.
fn legend_geometry(figure: &Figure) -> (i32, i32) {
    let slot = figure.inches(LEGEND_SLOT_IN).max(2);
    let swatch = figure.inches(LEGEND_SWATCH_IN).clamp(1, slot - 1);
    (slot, swatch)
}

/// Draw one dashed curve per model, colored from its spec, with a legend.
pub fn draw_roc_overlay(
    path: &Path,
    title: &str,
    curves: &[(&ModelSpec, &RocCurve)],
    figure: Figure,
) -> Result<()> {
    ensure_font()?;
    let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let tick_font = figure.font(10.0).color(&BLACK);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, figure.font(12.0).color(&BLACK))
        .margin(figure.inches(0.15))
        .x_label_area_size(figure.inches(0.55))
        .y_label_area_size(figure.inches(0.7))
        .build_cartesian_2d(AXIS_RANGE, AXIS_RANGE)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("False Positive Rate")
        .y_desc("True Positive Rate")
        .x_labels(6)
        .y_labels(6)
        .label_style(tick_font.clone())
        .axis_desc_style(tick_font.clone())
        .draw()
        .map_err(draw_err)?;

    let stroke = figure.stroke(1.5);
    let (legend_slot, legend_len) = legend_geometry(&figure);
    for (spec, curve) in curves {
        let color = RGBColor::from(spec.color);
        let style = color.stroke_width(stroke);
        let points: Vec<(f64, f64)> = curve.points.iter().map(|p| (p.fpr, p.tpr)).collect();

        chart
            .draw_series(
                dash_segments(&points, DASH, GAP)
                    .into_iter()
                    .map(move |segment| PathElement::new(segment, style)),
            )
            .map_err(draw_err)?
            .label(spec.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font(tick_font)
        .legend_area_size(legend_slot)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Split a polyline into dash pieces of length `dash` separated by `gap`,
/// measured in data units along the path.
pub fn dash_segments(points: &[(f64, f64)], dash: f64, gap: f64) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let Some(&first) = points.first() else {
        return out;
    };
    if dash <= 0.0 || gap <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut current = vec![first];
    let mut drawing = true;
    let mut left = dash;

    for w in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        let len = (x1 - x0).hypot(y1 - y0);
        let mut travelled = 0.0;

        // interpolate from the segment start so rounding does not accumulate
        while len - travelled > 0.0 {
            let step = left.min(len - travelled);
            travelled += step;
            left -= step;
            let t = travelled / len;
            let at = (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);

            if drawing {
                current.push(at);
            }
            if left <= 0.0 {
                if drawing {
                    out.push(std::mem::take(&mut current));
                    left = gap;
                } else {
                    current.push(at);
                    left = dash;
                }
                drawing = !drawing;
            }
        }
    }

    if drawing && current.len() > 1 {
        out.push(current);
    }
    out
}
