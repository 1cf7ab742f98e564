//! Fan-out over all calendar sources into one [`EventCache`] snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use wallcal_auth::CredentialProvider;
use wallcal_core::{CalendarConfig, FailureKind};

use crate::cache::EventCache;
use crate::client::CalendarClient;
use crate::error::AggregateError;
use crate::source::{EventSource, QueryWindow};
use crate::types::{CalendarSource, Event};

/// Produces a fresh event snapshot per refresh cycle.
pub struct EventAggregator {
    credentials: Arc<dyn CredentialProvider>,
    api_base_url: String,
    sources: Vec<CalendarSource>,
    window_past_days: u32,
    window_future_days: u32,
    tz: Tz,
}

impl EventAggregator {
    pub fn new(config: &CalendarConfig, tz: Tz, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            api_base_url: config.api_base_url.clone(),
            sources: CalendarSource::from_ids(&config.sources, &config.palette),
            window_past_days: config.window_past_days,
            window_future_days: config.window_future_days,
            tz,
        }
    }

    pub fn sources(&self) -> &[CalendarSource] {
        &self.sources
    }

    /// Run one refresh cycle.
    ///
    /// Fails only when credentials cannot be obtained or every source fails;
    /// the caller then keeps its previous snapshot.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<EventCache, AggregateError> {
        let window = QueryWindow::around(now, self.window_past_days, self.window_future_days);

        let token = self.credentials.access_token().await?;
        let client = CalendarClient::new_with_base_url(&token, &self.api_base_url);

        aggregate(&client, &self.sources, &window, &self.tz).await
    }
}

/// Fetch every source in order, skip the ones that fail, and build a snapshot
/// from the rest.
pub async fn aggregate<S: EventSource + ?Sized>(
    feed: &S,
    sources: &[CalendarSource],
    window: &QueryWindow,
    tz: &Tz,
) -> Result<EventCache, AggregateError> {
    let mut merged: Vec<Event> = Vec::new();
    let mut failed = 0usize;

    for source in sources {
        tracing::debug!(calendar = %source.id, "Checking calendar");

        let items = match feed.fetch(&source.id, window.start, window.end).await {
            Ok(items) => items,
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    calendar = %source.id,
                    kind = %e.kind(),
                    retryable = e.is_retryable(),
                    "Could not read calendar: {}",
                    e
                );
                continue;
            }
        };

        tracing::info!(calendar = %source.id, count = items.len(), "Fetched events");

        for item in items {
            if item.is_cancelled() {
                tracing::debug!(calendar = %source.id, event = %item.id, "Skipping cancelled event");
                continue;
            }
            match Event::from_api(item, source) {
                Ok(event) => merged.push(event),
                Err(e) => tracing::warn!(
                    calendar = %source.id,
                    kind = %FailureKind::Parse,
                    "Skipping event: {}",
                    e
                ),
            }
        }
    }

    if !sources.is_empty() && failed == sources.len() {
        return Err(AggregateError::AllSourcesFailed(failed));
    }

    let cache = EventCache::from_events(merged, tz);
    tracing::info!(
        days = cache.day_count(),
        events = cache.event_count(),
        failed_sources = failed,
        "Event snapshot built"
    );
    Ok(cache)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::error::CalendarError;
    use crate::types::ApiEvent;
    use async_trait::async_trait;
    use chrono_tz::America::New_York;
    use std::collections::HashMap;
    use wallcal_auth::{AuthError, StaticToken};
    use wallcal_core::DateKey;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves canned JSON per calendar id; ids without an entry fail.
    struct FakeFeed {
        feeds: HashMap<String, serde_json::Value>,
    }

    #[async_trait]
    impl EventSource for FakeFeed {
        async fn fetch(
            &self,
            calendar_id: &str,
            _window_start: DateTime<Utc>,
            _window_end: DateTime<Utc>,
        ) -> Result<Vec<ApiEvent>, CalendarError> {
            match self.feeds.get(calendar_id) {
                Some(json) => Ok(serde_json::from_value(json.clone()).unwrap()),
                None => Err(CalendarError::ApiError("500: unreachable".into())),
            }
        }
    }

    struct FailingCredentials;

    #[async_trait]
    impl CredentialProvider for FailingCredentials {
        async fn access_token(&self) -> Result<String, AuthError> {
            Err(AuthError::CredentialFile("/app/service_account.json: missing".into()))
        }
    }

    fn sources(ids: &[&str]) -> Vec<CalendarSource> {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let palette = vec!["#7986CB".to_string(), "#D81B60".to_string(), "#8E24AA".to_string()];
        CalendarSource::from_ids(&ids, &palette)
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T14:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn window() -> QueryWindow {
        QueryWindow::around(now(), 7, 40)
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "one".to_string(),
            serde_json::json!([
                {"id": "one-late", "summary": "Dinner", "start": {"dateTime": "2026-10-16T19:00:00-04:00"}},
                {"id": "one-early", "summary": "Gym", "start": {"dateTime": "2026-10-16T07:00:00-04:00"}}
            ]),
        );
        feeds.insert(
            "three".to_string(),
            serde_json::json!([
                {"id": "three-mid", "summary": "Call", "start": {"dateTime": "2026-10-16T12:00:00-04:00"}},
                {"id": "three-tomorrow", "summary": "Trip", "start": {"date": "2026-10-17"}}
            ]),
        );
        let feed = FakeFeed { feeds };

        let cache = aggregate(&feed, &sources(&["one", "two", "three"]), &window(), &New_York)
            .await
            .unwrap();

        let today: DateKey = "2026-10-16".parse().unwrap();
        let ids: Vec<&str> = cache.events_on(&today).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["one-early", "three-mid", "one-late"]);
        assert_eq!(cache.event_count(), 4);
        assert!(cache
            .iter()
            .flat_map(|(_, events)| events)
            .all(|e| e.calendar_id != "two"));
    }

    #[tokio::test]
    async fn test_events_carry_source_color() {
        let mut feeds = HashMap::new();
        feeds.insert("one".to_string(), serde_json::json!([]));
        feeds.insert(
            "three".to_string(),
            serde_json::json!([{"id": "x", "start": {"date": "2026-10-20"}}]),
        );
        let feed = FakeFeed { feeds };

        let cache = aggregate(&feed, &sources(&["one", "two", "three"]), &window(), &New_York)
            .await
            .unwrap();

        let day: DateKey = "2026-10-20".parse().unwrap();
        // Third source gets the third palette colour even though the second failed.
        assert_eq!(cache.events_on(&day)[0].color, "#8E24AA");
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_fatal() {
        let feed = FakeFeed {
            feeds: HashMap::new(),
        };
        let result = aggregate(&feed, &sources(&["one", "two"]), &window(), &New_York).await;
        assert!(matches!(result, Err(AggregateError::AllSourcesFailed(2))));
    }

    #[tokio::test]
    async fn test_malformed_event_is_dropped_not_fatal() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "one".to_string(),
            serde_json::json!([
                {"id": "bad", "start": {"dateTime": "not a time"}},
                {"id": "good", "start": {"date": "2026-10-18"}}
            ]),
        );
        let feed = FakeFeed { feeds };

        let cache = aggregate(&feed, &sources(&["one"]), &window(), &New_York)
            .await
            .unwrap();
        assert_eq!(cache.event_count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_event_is_not_shown() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "one".to_string(),
            serde_json::json!([
                {"id": "standup_20261019", "summary": "Standup", "status": "cancelled",
                 "start": {"dateTime": "2026-10-19T09:00:00-04:00"}},
                {"id": "standup_20261020", "summary": "Standup", "status": "confirmed",
                 "start": {"dateTime": "2026-10-20T09:00:00-04:00"}}
            ]),
        );
        let feed = FakeFeed { feeds };

        let cache = aggregate(&feed, &sources(&["one"]), &window(), &New_York)
            .await
            .unwrap();

        assert_eq!(cache.event_count(), 1);
        assert!(cache.events_on(&"2026-10-19".parse().unwrap()).is_empty());
        assert_eq!(cache.events_on(&"2026-10-20".parse().unwrap())[0].id, "standup_20261020");
    }

    #[tokio::test]
    async fn test_no_sources_yields_empty_snapshot() {
        let feed = FakeFeed {
            feeds: HashMap::new(),
        };
        let cache = aggregate(&feed, &[], &window(), &New_York).await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_credential_failure_is_fatal() {
        let config = CalendarConfig::default();
        let aggregator = EventAggregator::new(&config, New_York, Arc::new(FailingCredentials));

        let err = aggregator.refresh(now()).await.unwrap_err();
        assert!(matches!(err, AggregateError::Auth(_)));
        assert_eq!(err.kind(), FailureKind::Auth);
    }

    #[tokio::test]
    async fn test_refresh_against_api() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "e1", "summary": "Dentist", "start": {"dateTime": "2026-10-19T15:00:00Z"}}]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/calendars/broken/events"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let config = CalendarConfig {
            api_base_url: mock_server.uri(),
            sources: vec!["primary".to_string(), "broken".to_string()],
            ..CalendarConfig::default()
        };
        let aggregator =
            EventAggregator::new(&config, New_York, Arc::new(StaticToken("secret".into())));

        let cache = aggregator.refresh(now()).await.unwrap();

        let day: DateKey = "2026-10-19".parse().unwrap();
        assert_eq!(cache.events_on(&day).len(), 1);
        assert_eq!(cache.events_on(&day)[0].summary, "Dentist");
        assert_eq!(cache.events_on(&day)[0].color, "#7986CB");
    }
}
