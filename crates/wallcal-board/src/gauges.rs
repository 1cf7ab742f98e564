//! Temperature colour ramp and humidity comfort levels.

use serde::Serialize;

/// Colour for an average temperature decile, coldest first.
pub const TEMPERATURE_RAMP: [&str; 11] = [
    "#E8EAF6", "#7986CB", "#5C6BC0", "#42A5F5", "#26C6DA", "#00E676", "#69F0AE", "#FFD740",
    "#FFA726", "#FF7043", "#FF5252",
];

pub const NEUTRAL_GAUGE_COLOR: &str = "#777";

/// Average temperatures (°F) mapped to the ends of the ramp.
const SCALE_MIN: f64 = 20.0;
const SCALE_MAX: f64 = 90.0;

/// Ramp colour for the day's mean of `high` and `low`, clamped to 20..=90 °F.
pub fn temperature_gauge_color(high: i32, low: i32) -> &'static str {
    let avg = (f64::from(high) + f64::from(low)) / 2.0;
    let score = ((avg - SCALE_MIN) / (SCALE_MAX - SCALE_MIN)).clamp(0.0, 1.0);
    let decile = (score * 10.0).round() as usize;

    TEMPERATURE_RAMP
        .get(decile)
        .copied()
        .unwrap_or(NEUTRAL_GAUGE_COLOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HumidityLevel {
    Calm,
    Moderate,
    High,
    Extreme,
}

impl HumidityLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Calm => "🟢",
            Self::Moderate => "🟡",
            Self::High => "🔴",
            Self::Extreme => "❗",
        }
    }
}

pub fn humidity_level(humidity: u8) -> HumidityLevel {
    match humidity {
        0..=40 => HumidityLevel::Calm,
        41..=70 => HumidityLevel::Moderate,
        71..=90 => HumidityLevel::High,
        _ => HumidityLevel::Extreme,
    }
}
