//! Calendar-specific error types.

use thiserror::Error;
use wallcal_auth::AuthError;
use wallcal_core::FailureKind;

/// A failure reading one calendar feed.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl CalendarError {
    /// A malformed event is a parse failure; anything else loses the feed.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidEventData(_) => FailureKind::Parse,
            _ => FailureKind::SourceFetch,
        }
    }

    /// Whether the feed might succeed at the next tick without intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::NetworkError(_))
    }
}

/// A failure of a whole event refresh cycle. The previous cache is kept.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Credential acquisition failed: {0}")]
    Auth(#[from] AuthError),

    #[error("All {0} calendar sources failed")]
    AllSourcesFailed(usize),
}

impl AggregateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Auth(_) => FailureKind::Auth,
            Self::AllSourcesFailed(_) => FailureKind::SourceFetch,
        }
    }
}
