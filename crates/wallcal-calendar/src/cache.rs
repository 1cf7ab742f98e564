//! Date-indexed event snapshot.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use wallcal_core::DateKey;

use crate::types::Event;

/// Events bucketed by day, each bucket ascending by start.
///
/// Built once per successful refresh and never modified afterwards; the
/// owner swaps whole snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCache {
    days: BTreeMap<DateKey, Vec<Event>>,
}

impl EventCache {
    /// Sort `events` by effective start and bucket them by local day.
    ///
    /// The sort is stable: events starting at the same instant keep the
    /// order they were fetched in.
    pub fn from_events(mut events: Vec<Event>, tz: &Tz) -> Self {
        events.sort_by_key(|e| e.start.effective_instant(tz));

        let mut days: BTreeMap<DateKey, Vec<Event>> = BTreeMap::new();
        for event in events {
            days.entry(event.start.date_key(tz)).or_default().push(event);
        }

        Self { days }
    }

    /// Events on `key`, already sorted. Empty when the day has none.
    pub fn events_on(&self, key: &DateKey) -> &[Event] {
        self.days.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[Event])> {
        self.days.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
