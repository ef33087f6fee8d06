//! Inferno color scale

use image::Rgba;

// Evenly spaced anchors from black through purple and orange to pale yellow.
const INFERNO: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

/// Map `t` in [0, 1] onto the scale; values outside are clamped.
pub fn inferno(t: f64) -> Rgba<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (INFERNO.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(INFERNO.len() - 1);
    let frac = scaled - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (INFERNO[lo], INFERNO[hi]);
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}
