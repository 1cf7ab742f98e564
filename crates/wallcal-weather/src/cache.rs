//! Date-indexed weather snapshot.

use std::collections::BTreeMap;

use wallcal_core::DateKey;

use crate::types::DayWeather;

/// At most one [`DayWeather`] per date. Replaced wholesale on each
/// successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherCache {
    days: BTreeMap<DateKey, DayWeather>,
}

impl WeatherCache {
    /// A repeated date keeps the last entry.
    pub fn from_days(days: impl IntoIterator<Item = (DateKey, DayWeather)>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &DateKey) -> Option<&DayWeather> {
        self.days.get(key)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &DayWeather)> {
        self.days.iter()
    }
}
