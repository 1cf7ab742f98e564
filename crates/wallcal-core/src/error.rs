//! Shared error types for WallCal.
//!
//! Each integration crate defines its own error enum; they all classify
//! themselves into a [`FailureKind`] so the scheduler can log every failure
//! with a recorded kind and carry on serving the last good snapshot.

use std::fmt;

use thiserror::Error;

/// Failure taxonomy used for logging and for deciding what a failure costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Credential or client setup failed; the whole event cycle is lost.
    Auth,
    /// One calendar feed failed; siblings proceed.
    SourceFetch,
    /// The forecast call failed or returned unusable data.
    WeatherFetch,
    /// Malformed colour or date, resolved locally with a default.
    Parse,
    /// Configuration could not be loaded or is invalid.
    Config,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::SourceFetch => "source_fetch",
            Self::WeatherFetch => "weather_fetch",
            Self::Parse => "parse",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error for process startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential setup failed: {0}")]
    Credentials(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Credentials(_) => FailureKind::Auth,
            Self::Config(_) | Self::Other(_) => FailureKind::Config,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not available")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(FailureKind::Auth.to_string(), "auth");
        assert_eq!(FailureKind::SourceFetch.to_string(), "source_fetch");
        assert_eq!(FailureKind::WeatherFetch.to_string(), "weather_fetch");
        assert_eq!(FailureKind::Parse.to_string(), "parse");
        assert_eq!(FailureKind::Config.to_string(), "config");
    }

    #[test]
    fn startup_errors_are_classified() {
        let err: AppError = ConfigError::Invalid("display.timezone: Mars/Base".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(err.kind(), FailureKind::Config);

        let err: AppError = anyhow::anyhow!("Failed to read config file").into();
        assert_eq!(err.kind(), FailureKind::Config);

        let err = AppError::Credentials("no credentials configured".into());
        assert_eq!(err.kind(), FailureKind::Auth);
    }
}
