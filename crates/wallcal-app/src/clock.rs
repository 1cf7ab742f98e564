use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of "now". Swapped out in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date as seen in `tz`.
    fn today(&self, tz: &Tz) -> NaiveDate {
        self.now().with_timezone(tz).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono_tz::America::New_York;

    struct Fixed(DateTime<Utc>);

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_today_uses_local_date() {
        let clock = Fixed(
            DateTime::parse_from_rfc3339("2026-10-17T02:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        assert_eq!(clock.today(&New_York).to_string(), "2026-10-16");
        assert_eq!(clock.today(&chrono_tz::UTC).to_string(), "2026-10-17");
    }
}
