//! Calendar feeds for WallCal.
//!
//! Fetches every configured calendar, merges the results and buckets them by
//! day into an immutable [`EventCache`] snapshot.

pub mod aggregator;
pub mod cache;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use aggregator::{aggregate, EventAggregator};
pub use cache::EventCache;
pub use client::CalendarClient;
pub use error::{AggregateError, CalendarError};
pub use source::{EventSource, QueryWindow};
pub use types::{CalendarSource, Event, EventStart, DEFAULT_EVENT_COLOR};
