//! [`DevicePusher`] backed by APNs
//!
//! Debug builds of the app receive tokens from the sandbox environment and
//! production builds from the production one. A token only works against the
//! host that issued it, so the stored environment picks the client.

use crate::client::{ApnsClient, APNS_PRODUCTION_URL, APNS_SANDBOX_URL};
use crate::error::ApnsError;
use crate::token::ProviderTokenSigner;
use stayreal_common::{
    BoxFuture, DeviceNotification, DevicePusher, DeviceRegistration, Environment, PushError,
};
use stayreal_config::ApnsConfig;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ApnsPusher {
    production: ApnsClient,
    sandbox: ApnsClient,
}

impl ApnsPusher {
    /// Builds both clients from the configuration, reading the signing key from disk
    pub fn from_config(config: &ApnsConfig) -> Result<Self, ApnsError> {
        let signer = Arc::new(ProviderTokenSigner::from_config(config)?);
        Self::with_signer(config, signer)
    }

    pub fn with_signer(
        config: &ApnsConfig,
        signer: Arc<ProviderTokenSigner>,
    ) -> Result<Self, ApnsError> {
        if config.topic.is_empty() {
            return Err(ApnsError::ConfigError(
                "APNs topic (bundle id) is required".to_string(),
            ));
        }

        let production = ApnsClient::new(
            config
                .production_url
                .as_deref()
                .unwrap_or(APNS_PRODUCTION_URL),
            config.topic.clone(),
            signer.clone(),
        )?;
        let sandbox = ApnsClient::new(
            config.sandbox_url.as_deref().unwrap_or(APNS_SANDBOX_URL),
            config.topic.clone(),
            signer,
        )?;

        info!(
            production = production.base_url(),
            sandbox = sandbox.base_url(),
            "APNs pusher ready"
        );
        Ok(Self {
            production,
            sandbox,
        })
    }

    pub fn client_for(&self, environment: Environment) -> &ApnsClient {
        match environment {
            Environment::Debug => &self.sandbox,
            Environment::Production => &self.production,
        }
    }
}

impl DevicePusher for ApnsPusher {
    fn push<'a>(
        &'a self,
        device: &'a DeviceRegistration,
        notification: &'a DeviceNotification,
    ) -> BoxFuture<'a, (), PushError> {
        Box::pin(async move {
            debug!(device_id = %device.device_id, "Pushing to device");
            self.client_for(device.environment)
                .send(&device.delivery_token, notification)
                .await
        })
    }
}
