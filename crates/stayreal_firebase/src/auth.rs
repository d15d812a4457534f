//! Service account credentials for FCM
//!
//! The authenticator is built once at startup. It caches the access token and
//! refreshes it shortly before expiry, so sends do not touch the key file.

use crate::client::FirebaseError;
use stayreal_config::FirebaseConfig;
use std::path::Path;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

/// OAuth2 scope required by the FCM HTTP v1 API
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Reads the service account key named by `config.key_path` and builds the
/// token source for it.
pub async fn service_account_authenticator(
    config: &FirebaseConfig,
) -> Result<DefaultAuthenticator, FirebaseError> {
    let key_path = config.key_path.as_deref().ok_or_else(|| {
        FirebaseError::ConfigError("Missing key_path in FirebaseConfig".to_string())
    })?;

    let key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| {
            FirebaseError::ConfigError(format!(
                "Cannot read service account key {}: {}",
                key_path, e
            ))
        })?;

    ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| FirebaseError::AuthError(e.to_string()))
}

/// Returns a valid access token with the FCM scope, from cache when possible.
pub async fn access_token(auth: &DefaultAuthenticator) -> Result<String, FirebaseError> {
    let token = auth
        .token(&[FCM_SCOPE])
        .await
        .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| FirebaseError::AuthError("No access token returned".to_string()))
}
