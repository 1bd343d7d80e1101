//! Hex color parsing for stroke palettes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must be #rgb or #rrggbb: {0}")]
    BadLength(String),
    #[error("Invalid hex digit in color: {0}")]
    BadDigit(String),
}

/// Parse a `#rgb` or `#rrggbb` hex string into RGBA components in 0..1.
/// Alpha is always 1.0.
pub fn parse_hex(color: &str) -> Result<[f32; 4], ColorError> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(color.to_string()))?;

    // Length and slicing below are byte-based; multibyte input would
    // land on a char boundary panic instead of an error.
    if !hex.is_ascii() {
        return Err(ColorError::BadDigit(color.to_string()));
    }

    let (r, g, b) = match hex.len() {
        3 => {
            let digit = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .map(|v| v * 17)
                    .map_err(|_| ColorError::BadDigit(color.to_string()))
            };
            (digit(0)?, digit(1)?, digit(2)?)
        }
        6 => {
            let pair = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ColorError::BadDigit(color.to_string()))
            };
            (pair(0)?, pair(2)?, pair(4)?)
        }
        _ => return Err(ColorError::BadLength(color.to_string())),
    };

    Ok([
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        1.0,
    ])
}
