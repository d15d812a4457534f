use stayreal_common::{config_error, external_service_error, PushError, StayrealError};
use thiserror::Error;

/// Errors raised while setting up or authenticating against APNs
#[derive(Error, Debug)]
pub enum ApnsError {
    /// The signing key could not be read or parsed
    #[error("APNs key error: {0}")]
    KeyError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// The provider token cache was poisoned by a panicking thread
    #[error("Token cache unavailable")]
    CacheError,
}

impl From<ApnsError> for StayrealError {
    fn from(err: ApnsError) -> Self {
        match err {
            ApnsError::ConfigError(message) | ApnsError::KeyError(message) => {
                config_error(message)
            }
            other => external_service_error("apns", other),
        }
    }
}

impl From<ApnsError> for PushError {
    fn from(err: ApnsError) -> Self {
        match err {
            ApnsError::HttpError(e) => PushError::Transport(e.to_string()),
            ApnsError::ConfigError(message) => PushError::Config(message),
            other => PushError::Auth(other.to_string()),
        }
    }
}
