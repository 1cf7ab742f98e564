//! Per-kind refresh state.
//!
//! Ensures at most one refresh of each kind runs at a time. Event and weather
//! refreshes do not block each other.

/// The two independently scheduled refresh kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    Events,
    Weather,
}

impl RefreshKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Weather => "weather",
        }
    }
}

/// In-flight flags, one per [`RefreshKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InFlight {
    events: bool,
    weather: bool,
}

impl InFlight {
    /// Mark `kind` busy. Returns false (and changes nothing) if it already was,
    /// in which case the caller must skip the tick.
    pub fn try_start(&mut self, kind: RefreshKind) -> bool {
        let slot = self.slot(kind);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    /// State after the refresh of `kind` delivered its outcome.
    pub fn finish(&mut self, kind: RefreshKind) {
        *self.slot(kind) = false;
    }

    fn slot(&mut self, kind: RefreshKind) -> &mut bool {
        match kind {
            RefreshKind::Events => &mut self.events,
            RefreshKind::Weather => &mut self.weather,
        }
    }
}
