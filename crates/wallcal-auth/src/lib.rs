//! Credential acquisition for the calendar feeds.
//!
//! The calendar client only ever sees a bearer token. Where that token comes
//! from is decided once at startup from `calendar.credentials`.

pub mod error;
pub mod provider;
pub mod service_account;

pub use error::AuthError;
pub use provider::{from_config, CredentialProvider, EnvToken, StaticToken};
pub use service_account::{ServiceAccountKey, ServiceAccountProvider};
