// --- File: crates/stayreal_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for the StayReal notifier.
///
/// Integration crates convert their own errors into this enum at the
/// boundary where they implement a service trait.
#[derive(Error, Debug)]
pub enum StayrealError {
    /// The upstream moments API could not be reached, answered with a
    /// non-success status, or returned a body that does not decode.
    #[error("Upstream request failed: {0}")]
    UpstreamError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error returned by an external service
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for StayrealError {
    fn status_code(&self) -> u16 {
        match self {
            StayrealError::UpstreamError(_) => 502,
            StayrealError::ConfigError(_) => 500,
            StayrealError::ValidationError(_) => 400,
            StayrealError::DatabaseError(_) => 500,
            StayrealError::ExternalServiceError { .. } => 502,
            StayrealError::InternalError(_) => 500,
        }
    }
}

/// Failure of a single token-addressed push.
///
/// Only [`PushError::InvalidToken`] is permanent: the provider will never
/// deliver to that token again and the registration should be dropped.
#[derive(Error, Debug)]
pub enum PushError {
    /// The provider reports the token as permanently unusable
    /// (app uninstalled, token malformed or revoked).
    #[error("Invalid device token: {reason}")]
    InvalidToken { reason: String },

    /// The provider refused the push for any other reason.
    #[error("Push rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// The request never got a provider answer.
    #[error("Push transport error: {0}")]
    Transport(String),

    /// The provider token could not be produced.
    #[error("Push authentication error: {0}")]
    Auth(String),

    #[error("Push configuration error: {0}")]
    Config(String),
}

impl PushError {
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, PushError::InvalidToken { .. })
    }
}

impl From<reqwest::Error> for StayrealError {
    fn from(err: reqwest::Error) -> Self {
        StayrealError::UpstreamError(err.to_string())
    }
}

impl From<serde_json::Error> for StayrealError {
    fn from(err: serde_json::Error) -> Self {
        StayrealError::UpstreamError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> StayrealError {
    StayrealError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> StayrealError {
    StayrealError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> StayrealError {
    StayrealError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("missing token").status_code(), 400);
        assert_eq!(StayrealError::DatabaseError("locked".into()).status_code(), 500);
        assert_eq!(external_service_error("fcm", "quota").status_code(), 502);
    }

    #[test]
    fn test_only_invalid_token_is_permanent() {
        assert!(PushError::InvalidToken {
            reason: "BadDeviceToken".into()
        }
        .is_invalid_token());
        assert!(!PushError::Rejected {
            status: 429,
            reason: "TooManyRequests".into()
        }
        .is_invalid_token());
        assert!(!PushError::Transport("connection reset".into()).is_invalid_token());
    }
}
