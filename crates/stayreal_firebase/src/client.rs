//! Firebase Cloud Messaging client module
//!
//! This module provides a client for the FCM HTTP v1 API and the topic
//! broadcast built on it. A moment change is announced with one data message
//! to the topic named after the region; FCM fans it out to every subscribed
//! app instance.

use crate::auth::{access_token, service_account_authenticator};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use stayreal_common::{
    external_service_error, BoxFuture, Event, Region, StayrealError, TopicBroadcaster, HTTP_CLIENT,
};
use stayreal_config::FirebaseConfig;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};
use yup_oauth2::authenticator::DefaultAuthenticator;

/// Default FCM API host
pub const FCM_API_BASE_URL: &str = "https://fcm.googleapis.com";

/// Errors that can occur when interacting with the Firebase Cloud Messaging API
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error during authentication with Firebase
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the Firebase API
    #[error("Firebase API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl From<FirebaseError> for StayrealError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::ConfigError(message) => StayrealError::ConfigError(message),
            other => external_service_error("fcm", other),
        }
    }
}

/// A message to be sent via Firebase Cloud Messaging
///
/// Top-level wrapper required by the FCM HTTP v1 API format.
#[derive(Debug, Serialize)]
pub struct FcmMessage {
    pub message: Message,
}

/// A data-only message addressed to a topic
#[derive(Debug, Serialize)]
pub struct Message {
    /// Topic that the target app instances are subscribed to
    pub topic: String,

    /// Custom key-value data handed to the receiving app
    pub data: HashMap<String, String>,
}

/// Response from the Firebase Cloud Messaging API
#[derive(Debug, Deserialize)]
pub struct FcmResponse {
    /// "projects/{project_id}/messages/{message_id}"
    pub name: String,
}

/// Builds the data-only message announcing `event` on the topic of `region`.
///
/// Every value is a string, as FCM data payloads require. Dates are
/// forwarded verbatim.
pub fn moment_topic_message(region: Region, event: &Event) -> FcmMessage {
    let data = HashMap::from([
        ("id".to_string(), event.id.clone()),
        ("region".to_string(), event.region.to_string()),
        ("timezone".to_string(), event.timezone.clone()),
        ("startDate".to_string(), event.start_date.clone()),
        ("endDate".to_string(), event.end_date.clone()),
    ]);

    FcmMessage {
        message: Message {
            topic: region.to_string(),
            data,
        },
    }
}

/// Where the bearer token for FCM requests comes from
enum Credentials {
    /// Cached and refreshed by the authenticator
    ServiceAccount(DefaultAuthenticator),
    /// A fixed token, for emulators and mocks
    Static(String),
}

/// Client for the Firebase Cloud Messaging HTTP v1 API
pub struct FirebaseClient {
    client: Client,
    config: FirebaseConfig,
    credentials: Credentials,
}

impl FirebaseClient {
    /// Creates a client authenticating with the configured service account
    ///
    /// # Errors
    ///
    /// Fails when `project_id` or `key_path` is missing, or the key file
    /// cannot be read or parsed.
    pub async fn new(config: FirebaseConfig) -> Result<Self, FirebaseError> {
        project_id(&config)?;
        let auth = service_account_authenticator(&config).await?;

        Ok(Self {
            client: HTTP_CLIENT.clone(),
            config,
            credentials: Credentials::ServiceAccount(auth),
        })
    }

    /// Creates a client sending a fixed bearer token instead of a service account token
    pub fn with_access_token(config: FirebaseConfig, access_token: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            config,
            credentials: Credentials::Static(access_token.into()),
        }
    }

    async fn access_token(&self) -> Result<String, FirebaseError> {
        match &self.credentials {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::ServiceAccount(auth) => access_token(auth).await,
        }
    }

    /// Sends a message via Firebase Cloud Messaging
    ///
    /// # Returns
    ///
    /// The message name assigned by FCM
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// * The project_id is missing from the FirebaseConfig
    /// * Authentication fails
    /// * The HTTP request fails
    /// * The FCM API returns an error response
    pub async fn send_message(&self, message: &FcmMessage) -> Result<String, FirebaseError> {
        let project_id = project_id(&self.config)?;

        let base_url = self
            .config
            .api_base_url
            .as_deref()
            .unwrap_or(FCM_API_BASE_URL)
            .trim_end_matches('/');
        let url = format!("{}/v1/projects/{}/messages:send", base_url, project_id);

        let token = self.access_token().await?;

        debug!("Sending FCM message to {}", url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(FirebaseError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let fcm_response: FcmResponse = response.json().await?;
        Ok(fcm_response.name)
    }
}

fn project_id(config: &FirebaseConfig) -> Result<&str, FirebaseError> {
    config
        .project_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| FirebaseError::ConfigError("Missing project_id in FirebaseConfig".to_string()))
}

impl TopicBroadcaster for FirebaseClient {
    fn broadcast<'a>(
        &'a self,
        region: Region,
        event: &'a Event,
    ) -> BoxFuture<'a, String, StayrealError> {
        Box::pin(async move {
            let message = moment_topic_message(region, event);
            let name = self.send_message(&message).await?;
            info!(region = %region, message = %name, "Moment broadcast to FCM topic");
            Ok(name)
        })
    }
}
