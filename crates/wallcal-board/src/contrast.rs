//! Readable text colour for a coloured background.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Foreground {
    Black,
    White,
}

impl Foreground {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::White => "#ffffff",
        }
    }
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Black on light backgrounds, white on dark ones. Anything that is not a
/// six-digit hex colour gets white.
pub fn foreground(background: &str) -> Foreground {
    let Some((r, g, b)) = parse_rgb(background) else {
        tracing::debug!(color = background, kind = "parse", "Unreadable colour, using white text");
        return Foreground::White;
    };

    let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.144 * f64::from(b)) / 255.0;
    if luminance > 0.5 {
        Foreground::Black
    } else {
        Foreground::White
    }
}
