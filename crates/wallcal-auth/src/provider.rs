use std::sync::Arc;

use async_trait::async_trait;
use wallcal_core::CredentialsConfig;

use crate::error::AuthError;
use crate::service_account::ServiceAccountProvider;

/// Supplies a bearer token for the calendar API.
///
/// Called once per event refresh cycle; implementations may cache.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token, mostly useful for tests and short-lived runs.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call, so an
/// external process can rotate it.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(AuthError::TokenNotFound(self.var.clone())),
        }
    }
}

/// Build the provider selected by configuration.
///
/// The service-account key is read here, so a missing or malformed key file
/// surfaces at startup rather than on the first refresh.
pub fn from_config(config: &CredentialsConfig) -> Result<Arc<dyn CredentialProvider>, AuthError> {
    if let Some(path) = &config.service_account_file {
        tracing::info!("Using service account credentials from {}", path.display());
        let provider = ServiceAccountProvider::from_file(path)?;
        return Ok(Arc::new(provider));
    }
    if let Some(var) = &config.token_env {
        tracing::info!("Using bearer token from ${}", var);
        return Ok(Arc::new(EnvToken::new(var.clone())));
    }
    Err(AuthError::NotConfigured)
}
