//! Color parsing for chart styles
//!
//! Accepts a small set of named colors (including the pitch-specific "grass")
//! and hex strings in `#rgb`, `#rrggbb` or `#rrggbbaa` form.

use image::Rgba;

use crate::error::{Result, VizError, ensure_alpha};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([20, 20, 20, 255]);

const NAMED: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [214, 39, 40]),
    ("blue", [31, 119, 180]),
    ("green", [44, 160, 44]),
    ("orange", [255, 127, 14]),
    ("purple", [148, 103, 189]),
    ("yellow", [238, 210, 2]),
    ("grey", [128, 128, 128]),
    ("gray", [128, 128, 128]),
    ("grass", [106, 168, 79]),
    ("navy", [0, 0, 128]),
    ("skyblue", [135, 206, 235]),
    ("crimson", [220, 20, 60]),
    ("gold", [255, 215, 0]),
];

/// Parse a color name or hex string into an opaque RGBA value.
pub fn parse_color(input: &str) -> Result<Rgba<u8>> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| VizError::InvalidColor(input.to_string()));
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
        .ok_or_else(|| VizError::InvalidColor(input.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out[3] = 255;
            Some(Rgba(out))
        }
        6 | 8 => {
            let r = channel(hex.get(0..2)?)?;
            let g = channel(hex.get(2..4)?)?;
            let b = channel(hex.get(4..6)?)?;
            let a = if hex.len() == 8 {
                channel(hex.get(6..8)?)?
            } else {
                255
            };
            Some(Rgba([r, g, b, a]))
        }
        _ => None,
    }
}

/// Replace the alpha channel; `alpha` is an opacity in [0, 1].
pub fn with_alpha(color: Rgba<u8>, alpha: f64) -> Result<Rgba<u8>> {
    ensure_alpha(alpha)?;
    let Rgba([r, g, b, _]) = color;
    Ok(Rgba([r, g, b, (alpha * 255.0).round() as u8]))
}

/// Scale the RGB channels toward black, keeping alpha.
pub fn darken(color: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let k = (1.0 - factor).clamp(0.0, 1.0);
    let Rgba([r, g, b, a]) = color;
    Rgba([
        (r as f32 * k).round() as u8,
        (g as f32 * k).round() as u8,
        (b as f32 * k).round() as u8,
        a,
    ])
}
