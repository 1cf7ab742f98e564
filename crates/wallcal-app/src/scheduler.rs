//! Periodic refresh driver and cache owner.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use wallcal_board::{Board, GridMapper};
use wallcal_calendar::{AggregateError, EventCache};
use wallcal_core::{FailureKind, InFlight, RefreshConfig, RefreshKind};
use wallcal_weather::{WeatherCache, WeatherError};

use crate::caches::Caches;
use crate::clock::Clock;
use crate::jobs::{EventsRefresh, WeatherRefresh};
use crate::render::Renderer;

/// Outcomes in flight at once never exceed one per kind.
const OUTCOME_CHANNEL_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub events: Duration,
    pub weather: Duration,
}

impl Intervals {
    pub fn from_config(config: &RefreshConfig) -> Self {
        Self {
            events: config.events_interval(),
            weather: config.weather_interval(),
        }
    }
}

/// Result of one background refresh, sent back to the loop.
#[derive(Debug)]
pub enum RefreshOutcome {
    Events(Result<EventCache, AggregateError>),
    Weather(Result<WeatherCache, WeatherError>),
    /// The refresh task died without producing a result.
    Aborted { kind: RefreshKind, reason: String },
}

impl RefreshOutcome {
    pub fn kind(&self) -> RefreshKind {
        match self {
            Self::Events(_) => RefreshKind::Events,
            Self::Weather(_) => RefreshKind::Weather,
            Self::Aborted { kind, .. } => *kind,
        }
    }
}

pub struct RefreshScheduler {
    events_job: Arc<dyn EventsRefresh>,
    weather_job: Arc<dyn WeatherRefresh>,
    intervals: Intervals,
    mapper: GridMapper,
    tz: Tz,
    clock: Arc<dyn Clock>,
    caches: Caches,
    in_flight: InFlight,
}

impl RefreshScheduler {
    pub fn new(
        events_job: Arc<dyn EventsRefresh>,
        weather_job: Arc<dyn WeatherRefresh>,
        intervals: Intervals,
        mapper: GridMapper,
        tz: Tz,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events_job,
            weather_job,
            intervals,
            mapper,
            tz,
            clock,
            caches: Caches::init(),
            in_flight: InFlight::default(),
        }
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Board for the current date and snapshots.
    pub fn board(&self) -> Board {
        let today = self.clock.today(&self.tz);
        self.mapper
            .map(today, self.caches.events(), self.caches.weather())
    }

    /// Drive both refresh kinds until `shutdown` fires, then return the last
    /// snapshots. Refreshes still running at that point are abandoned.
    pub async fn run<R: Renderer>(mut self, mut renderer: R, shutdown: CancellationToken) -> Caches {
        let (tx, mut rx) = mpsc::channel::<RefreshOutcome>(OUTCOME_CHANNEL_CAPACITY);

        let mut events_tick = interval(self.intervals.events);
        events_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut weather_tick = interval(self.intervals.weather);
        weather_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            events_every = ?self.intervals.events,
            weather_every = ?self.intervals.weather,
            "Refresh scheduler started"
        );
        renderer.render(&self.board());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Refresh scheduler stopping");
                    break;
                }
                _ = events_tick.tick() => self.trigger(RefreshKind::Events, &tx),
                _ = weather_tick.tick() => self.trigger(RefreshKind::Weather, &tx),
                Some(outcome) = rx.recv() => {
                    if self.apply(outcome) {
                        renderer.render(&self.board());
                    }
                }
            }
        }

        self.caches
    }

    /// Start a refresh of `kind` unless one is already running.
    fn trigger(&mut self, kind: RefreshKind, tx: &mpsc::Sender<RefreshOutcome>) {
        if !self.in_flight.try_start(kind) {
            tracing::debug!(kind = kind.as_str(), "Previous refresh still running, skipping tick");
            return;
        }

        tracing::info!(kind = kind.as_str(), "Refresh started");

        match kind {
            RefreshKind::Events => {
                let job = Arc::clone(&self.events_job);
                let now = self.clock.now();
                spawn_refresh(kind, tx.clone(), async move {
                    RefreshOutcome::Events(job.refresh_events(now).await)
                });
            }
            RefreshKind::Weather => {
                let job = Arc::clone(&self.weather_job);
                spawn_refresh(kind, tx.clone(), async move {
                    RefreshOutcome::Weather(job.refresh_weather().await)
                });
            }
        }
    }

    /// Swap in a successful snapshot or keep the old one. Returns whether the
    /// board should be recomputed.
    fn apply(&mut self, outcome: RefreshOutcome) -> bool {
        let kind = outcome.kind();
        self.in_flight.finish(kind);

        match outcome {
            RefreshOutcome::Events(Ok(snapshot)) => {
                tracing::info!(
                    days = snapshot.day_count(),
                    events = snapshot.event_count(),
                    "Event cache replaced"
                );
                self.caches.replace_events(snapshot);
                true
            }
            RefreshOutcome::Events(Err(e)) => {
                tracing::error!(kind = %e.kind(), "Event refresh failed, keeping previous cache: {}", e);
                // Still recompute so a date change shows up within one interval.
                true
            }
            RefreshOutcome::Weather(Ok(snapshot)) => {
                tracing::info!(days = snapshot.len(), "Weather cache replaced");
                self.caches.replace_weather(snapshot);
                true
            }
            RefreshOutcome::Weather(Err(e)) => {
                tracing::error!(kind = %e.kind(), "Weather refresh failed, keeping previous cache: {}", e);
                false
            }
            RefreshOutcome::Aborted { kind, reason } => {
                let failure = match kind {
                    RefreshKind::Events => FailureKind::SourceFetch,
                    RefreshKind::Weather => FailureKind::WeatherFetch,
                };
                tracing::error!(
                    kind = %failure,
                    refresh = kind.as_str(),
                    "Refresh task aborted, keeping previous cache: {}",
                    reason
                );
                kind == RefreshKind::Events
            }
        }
    }
}

/// Run `refresh` on its own task and always deliver exactly one outcome for
/// `kind`, even if the task panics, so the in-flight flag is released.
fn spawn_refresh<F>(kind: RefreshKind, tx: mpsc::Sender<RefreshOutcome>, refresh: F)
where
    F: Future<Output = RefreshOutcome> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = match tokio::spawn(refresh).await {
            Ok(outcome) => outcome,
            Err(e) => RefreshOutcome::Aborted {
                kind,
                reason: e.to_string(),
            },
        };
        let _ = tx.send(outcome).await;
    });
}
