//! Google service-account credentials via the JWT-bearer grant.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::provider::CredentialProvider;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are renewed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a service-account JSON key that the grant needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct ServiceAccountProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountProvider {
    pub fn new(key: ServiceAccountKey) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        Ok(Self {
            key,
            encoding_key,
            scope: CALENDAR_READONLY_SCOPE.to_string(),
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AuthError::CredentialFile(format!("{}: {}", path.display(), e)))?;
        let key: ServiceAccountKey = serde_json::from_str(&contents)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        Self::new(key)
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        self.cached
            .lock()
            .as_ref()
            .filter(|t| t.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now)
            .map(|t| t.access_token.clone())
    }

    /// Exchange a fresh assertion for an access token.
    #[tracing::instrument(skip(self), level = "info", fields(client = %self.key.client_email))]
    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, AuthError> {
        let assertion = self.signed_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange {
                status: status.as_u16(),
                message: format!("JSON parse error: {}", e),
            })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl CredentialProvider for ServiceAccountProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let fresh = self.exchange(now).await?;
        tracing::debug!("Service account token valid until {}", fresh.expires_at);
        let access_token = fresh.access_token.clone();
        *self.cached.lock() = Some(fresh);
        Ok(access_token)
    }
}
