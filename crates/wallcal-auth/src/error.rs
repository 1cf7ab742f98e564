//! Authentication error types.

use thiserror::Error;
use wallcal_core::FailureKind;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credential file unreadable: {0}")]
    CredentialFile(String),

    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    #[error("No token in environment variable {0}")]
    TokenNotFound(String),

    #[error("No credentials configured")]
    NotConfigured,

    #[error("Token exchange failed: {status} - {message}")]
    TokenExchange { status: u16, message: String },

    #[error("Signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuthError {
    /// Every credential failure costs the whole event cycle.
    pub fn kind(&self) -> FailureKind {
        FailureKind::Auth
    }
}
