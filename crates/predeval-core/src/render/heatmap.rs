//! Confusion-matrix heatmaps.
//!
//! Laid out directly in pixel space: a 2×2 grid of cells shaded by count,
//! tick labels `0`/`1` on both axes, and a colorbar to the right.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use super::colormap::{blues, normalize};
use super::{draw_err, ensure_font, Figure};
use crate::domain::Result;
use crate::metrics::ConfusionMatrix;

const COLORBAR_BANDS: i32 = 256;
const COLORBAR_TICKS: usize = 5;

/// Annotation color for cell `(row, col)`.
///
/// The top-left cell is always light and every other cell dark. This does
/// not adapt to the actual background shade.
pub fn annotation_color(row: usize, col: usize) -> RGBColor {
    if row == 0 && col == 0 {
        WHITE
    } else {
        BLACK
    }
}

pub fn draw_confusion_heatmap(
    path: &Path,
    title: &str,
    matrix: &ConfusionMatrix,
    figure: Figure,
) -> Result<()> {
    ensure_font()?;
    let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let (width, height) = figure.size();
    let (width, height) = (width as i32, height as i32);
    let centered = Pos::new(HPos::Center, VPos::Center);
    let label_font = figure.font(10.0).color(&BLACK);

    let top = figure.inches(0.5);
    let bottom = figure.inches(0.75);
    let left = figure.inches(0.9);
    let bar_gap = figure.inches(0.25);
    let bar_width = figure.inches(0.2);
    let bar_labels = figure.inches(0.6);
    let tick_len = figure.inches(0.05).max(1);

    let side = (height - top - bottom)
        .min(width - left - bar_gap - bar_width - bar_labels)
        .max(2);
    let cell = side / 2;
    let slack = width - left - side - bar_gap - bar_width - bar_labels;
    let (gx0, gy0) = (left + slack / 2, top);
    let (gx1, gy1) = (gx0 + 2 * cell, gy0 + 2 * cell);

    root.draw(&Text::new(
        title.to_string(),
        ((gx0 + gx1) / 2, top / 2),
        figure.font(12.0).color(&BLACK).pos(centered),
    ))
    .map_err(draw_err)?;

    let (min, max) = (matrix.min_count() as f64, matrix.max_count() as f64);
    let rows = matrix.as_rows();
    for (i, row) in rows.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            let x0 = gx0 + j as i32 * cell;
            let y0 = gy0 + i as i32 * cell;
            let fill = blues(normalize(count as f64, min, max));
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))
                .map_err(draw_err)?;
            root.draw(&Text::new(
                count.to_string(),
                (x0 + cell / 2, y0 + cell / 2),
                figure.font(10.0).color(&annotation_color(i, j)).pos(centered),
            ))
            .map_err(draw_err)?;
        }
    }
    let frame = BLACK.stroke_width(figure.stroke(0.8));
    root.draw(&Rectangle::new([(gx0, gy0), (gx1, gy1)], frame))
        .map_err(draw_err)?;

    for k in 0..2 {
        let c = k * cell + cell / 2;
        root.draw(&PathElement::new(
            vec![(gx0 + c, gy1), (gx0 + c, gy1 + tick_len)],
            frame,
        ))
        .map_err(draw_err)?;
        root.draw(&Text::new(
            k.to_string(),
            (gx0 + c, gy1 + 2 * tick_len),
            label_font.pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(draw_err)?;

        root.draw(&PathElement::new(
            vec![(gx0 - tick_len, gy0 + c), (gx0, gy0 + c)],
            frame,
        ))
        .map_err(draw_err)?;
        root.draw(&Text::new(
            k.to_string(),
            (gx0 - 2 * tick_len, gy0 + c),
            label_font.pos(Pos::new(HPos::Right, VPos::Center)),
        ))
        .map_err(draw_err)?;
    }

    root.draw(&Text::new(
        "Predicted Label".to_string(),
        ((gx0 + gx1) / 2, gy1 + bottom * 2 / 3),
        label_font.pos(centered),
    ))
    .map_err(draw_err)?;
    root.draw(&Text::new(
        "True Label".to_string(),
        (gx0 - left * 2 / 3, (gy0 + gy1) / 2),
        figure
            .font(10.0)
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(centered),
    ))
    .map_err(draw_err)?;

    let bar = (gx1 + bar_gap, gy0, gx1 + bar_gap + bar_width, gy1);
    draw_colorbar(&root, bar, min, max, &figure)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    (x0, y0, x1, y1): (i32, i32, i32, i32),
    min: f64,
    max: f64,
    figure: &Figure,
) -> Result<()> {
    let span = (y1 - y0).max(1);
    for band in 0..COLORBAR_BANDS {
        let top = y0 + span * band / COLORBAR_BANDS;
        let bottom = y0 + span * (band + 1) / COLORBAR_BANDS;
        // top of the bar is the maximum
        let t = 1.0 - (f64::from(band) + 0.5) / f64::from(COLORBAR_BANDS);
        root.draw(&Rectangle::new([(x0, top), (x1, bottom)], blues(t).filled()))
            .map_err(draw_err)?;
    }
    let frame = BLACK.stroke_width(figure.stroke(0.8));
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], frame))
        .map_err(draw_err)?;

    let label_font = figure.font(10.0).color(&BLACK);
    let tick_len = figure.inches(0.05).max(1);
    for (value, y) in colorbar_ticks(min, max, y0, y1) {
        root.draw(&PathElement::new(vec![(x1, y), (x1 + tick_len, y)], frame))
            .map_err(draw_err)?;
        root.draw(&Text::new(
            format_tick(value),
            (x1 + 2 * tick_len, y),
            label_font.pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(draw_err)?;
    }
    Ok(())
}

/// Evenly spaced `(value, pixel_y)` ticks from `min` at the bottom to `max`
/// at the top. A flat range yields a single tick at the bottom.
fn colorbar_ticks(min: f64, max: f64, y0: i32, y1: i32) -> Vec<(f64, i32)> {
    if max <= min {
        return vec![(min, y1)];
    }
    (0..COLORBAR_TICKS)
        .map(|k| {
            let frac = k as f64 / (COLORBAR_TICKS - 1) as f64;
            let value = min + (max - min) * frac;
            let y = y1 - (f64::from(y1 - y0) * frac).round() as i32;
            (value, y)
        })
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_color_rule() {
        assert_eq!(annotation_color(0, 0), WHITE);
        assert_eq!(annotation_color(0, 1), BLACK);
        assert_eq!(annotation_color(1, 0), BLACK);
        assert_eq!(annotation_color(1, 1), BLACK);
    }

    #[test]
    fn test_colorbar_ticks_span_bar() {
        let ticks = colorbar_ticks(0.0, 8.0, 100, 500);
        assert_eq!(ticks.len(), COLORBAR_TICKS);
        assert_eq!(ticks[0], (0.0, 500));
        assert_eq!(ticks[4], (8.0, 100));
        assert_eq!(ticks[2], (4.0, 300));
    }

    #[test]
    fn test_colorbar_flat_range() {
        assert_eq!(colorbar_ticks(3.0, 3.0, 0, 10), vec![(3.0, 10)]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(4.0), "4");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
