//! Sequential blue color scale for heatmaps.

use plotters::style::RGBColor;

/// Light-to-dark blue stops, evenly spaced over `[0, 1]`.
const BLUES: [(u8, u8, u8); 9] = [
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

/// Color for a normalized intensity; values outside `[0, 1]` are clamped.
pub fn blues(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (BLUES.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(BLUES.len() - 1);
    let frac = scaled - lo as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (BLUES[lo], BLUES[hi]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Map `value` into `[0, 1]` over `min..=max`. A flat range maps to 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}
