//! Refresh scheduling and the single owner of the WallCal caches.
//!
//! Refreshes run as background tasks and report back over a channel; only
//! the scheduler loop ever touches the caches or recomputes the board.

pub mod caches;
pub mod clock;
pub mod jobs;
pub mod render;
pub mod scheduler;

pub use caches::Caches;
pub use clock::{Clock, SystemClock};
pub use jobs::{EventsRefresh, WeatherRefresh};
pub use render::{LogRenderer, Renderer};
pub use scheduler::{Intervals, RefreshOutcome, RefreshScheduler};
