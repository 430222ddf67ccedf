//! Parsing for the `--background` color.
//!
//! Hex colors are handled directly; everything else (named colors, `rgb()`,
//! `hsl()` and friends) is handed to lightningcss.

use image::Rgba;
use lightningcss::{traits::Parse, values::color::CssColor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color length {0}, expected 3, 4, 6, or 8 digits")]
    InvalidLength(usize),

    #[error("invalid hex character '{0}'")]
    InvalidHex(char),

    #[error("invalid color {value:?}: {reason}")]
    Css { value: String, reason: String },
}

pub fn parse_color(value: &str) -> Result<Rgba<u8>, ColorError> {
    if value.is_empty() {
        return Err(ColorError::Empty);
    }

    match value.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(value),
    }
}

fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|digit| digit as u8)
                .ok_or(ColorError::InvalidHex(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let byte = |high: u8, low: u8| (high << 4) | low;

    match *digits.as_slice() {
        // Short forms double each digit, so #f00 is #ff0000.
        [r, g, b] => Ok(Rgba([byte(r, r), byte(g, g), byte(b, b), 255])),
        [r, g, b, a] => Ok(Rgba([byte(r, r), byte(g, g), byte(b, b), byte(a, a)])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([byte(r1, r0), byte(g1, g0), byte(b1, b0), 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Rgba([
            byte(r1, r0),
            byte(g1, g0),
            byte(b1, b0),
            byte(a1, a0),
        ])),
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

fn parse_css_color(value: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_error = |reason: String| ColorError::Css {
        value: value.to_owned(),
        reason,
    };

    let color = CssColor::parse_string(value).map_err(|err| css_error(err.to_string()))?;
    let rgb = color
        .to_rgb()
        .map_err(|_| css_error("cannot be converted to RGB".to_owned()))?;

    match rgb {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float) => match float.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
                (rgb.alpha * 255.0).round() as u8,
            ])),
            _ => Err(css_error("unexpected float color".to_owned())),
        },
        _ => Err(css_error("conversion did not produce an RGB color".to_owned())),
    }
}
