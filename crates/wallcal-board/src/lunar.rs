//! New and full moon markers.

use chrono::NaiveDate;
use serde::Serialize;

/// Mean length of a lunar cycle, in days.
pub const SYNODIC_MONTH: f64 = 29.530588;

/// Moon phase as far as the board cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    Full,
    Between,
}

impl MoonPhase {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::New => "○",
            Self::Full => "●",
            Self::Between => "",
        }
    }
}

fn reference_new_moon() -> NaiveDate {
    // 2000-01-06 is always a valid date.
    NaiveDate::from_ymd_opt(2000, 1, 6).unwrap_or_default()
}

/// Days since the most recent new moon, in `[0, SYNODIC_MONTH)`.
pub fn lunar_age(date: NaiveDate) -> f64 {
    let days = (date - reference_new_moon()).num_days() as f64;
    days.rem_euclid(SYNODIC_MONTH)
}

pub fn phase(date: NaiveDate) -> MoonPhase {
    let age = lunar_age(date);
    if age < 0.5 || age > 29.03 {
        MoonPhase::New
    } else if age > 14.26 && age < 15.26 {
        MoonPhase::Full
    } else {
        MoonPhase::Between
    }
}
