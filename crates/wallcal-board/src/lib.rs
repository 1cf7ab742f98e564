//! Board layout for WallCal
//!
//! Maps the fixed day grid onto the event and weather snapshots, plus the
//! small pure helpers the cells are decorated with.

pub mod contrast;
pub mod gauges;
pub mod grid;
pub mod lunar;

pub use contrast::{foreground, Foreground};
pub use gauges::{humidity_level, temperature_gauge_color, HumidityLevel, NEUTRAL_GAUGE_COLOR};
pub use grid::{Board, CellView, EventView, GridCell, GridMapper, WeatherView};
pub use lunar::{phase, MoonPhase};
