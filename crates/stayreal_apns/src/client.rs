//! APNs HTTP client
//!
//! One [`ApnsClient`] talks to one APNs host. Both hosts share the same
//! provider token, since a token is valid for production and sandbox alike.

use crate::error::ApnsError;
use crate::token::ProviderTokenSigner;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use stayreal_common::{create_client, DeviceNotification, PushError};
use std::sync::Arc;
use tracing::debug;

pub const APNS_PRODUCTION_URL: &str = "https://api.push.apple.com";
pub const APNS_SANDBOX_URL: &str = "https://api.sandbox.push.apple.com";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Reasons for which APNs will never accept the token again
const INVALID_TOKEN_REASONS: [&str; 2] = ["BadDeviceToken", "Unregistered"];

#[derive(Debug, Serialize)]
pub struct ApnsPayload<'a> {
    pub aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
pub struct Aps<'a> {
    pub alert: Alert<'a>,
}

#[derive(Debug, Serialize)]
pub struct Alert<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a DeviceNotification> for ApnsPayload<'a> {
    fn from(notification: &'a DeviceNotification) -> Self {
        Self {
            aps: Aps {
                alert: Alert {
                    title: &notification.title,
                    body: &notification.body,
                },
            },
        }
    }
}

/// Error body returned by APNs on rejection
#[derive(Debug, Deserialize)]
struct ApnsErrorBody {
    reason: String,
}

/// Maps a rejected push to a [`PushError`].
///
/// `410 Gone` means the token stopped being active for the topic.
pub fn classify_rejection(status: u16, reason: &str) -> PushError {
    if status == StatusCode::GONE.as_u16() || INVALID_TOKEN_REASONS.contains(&reason) {
        PushError::InvalidToken {
            reason: reason.to_string(),
        }
    } else {
        PushError::Rejected {
            status,
            reason: reason.to_string(),
        }
    }
}

/// Client for a single APNs host
#[derive(Clone)]
pub struct ApnsClient {
    client: Client,
    base_url: String,
    topic: String,
    signer: Arc<ProviderTokenSigner>,
}

impl ApnsClient {
    pub fn new(
        base_url: impl Into<String>,
        topic: impl Into<String>,
        signer: Arc<ProviderTokenSigner>,
    ) -> Result<Self, ApnsError> {
        let client = create_client(REQUEST_TIMEOUT_SECS, false)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            topic: topic.into(),
            signer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends an alert notification to one device token
    pub async fn send(
        &self,
        device_token: &str,
        notification: &DeviceNotification,
    ) -> Result<(), PushError> {
        let provider_token = self.signer.token()?;
        let url = format!("{}/3/device/{}", self.base_url, device_token);

        debug!("Sending APNs notification via {}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("bearer {}", provider_token))
            .header("apns-topic", &self.topic)
            .header("apns-push-type", "alert")
            .header("apns-collapse-id", &notification.collapse_id)
            .json(&ApnsPayload::from(notification))
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<ApnsErrorBody>(&body)
            .map(|b| b.reason)
            .unwrap_or(body);

        Err(classify_rejection(status.as_u16(), &reason))
    }
}
