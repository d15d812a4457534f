//! Service factory.
//!
//! Builds the concrete collaborators of the notifier from the configuration.
//! Push channels are only constructed when their runtime flag is set and
//! their configuration section is present.
use std::sync::Arc;
use std::time::Duration;

use stayreal_apns::ApnsPusher;
use stayreal_common::{
    is_apns_enabled, is_firebase_enabled, DeviceRegistry, HealthCheck, StayrealError,
    TopicBroadcaster,
};
use stayreal_config::AppConfig;
use stayreal_db::{init_schema, DbClient, RepositoryFactory, SqlRepositoryFactory};
use stayreal_db::{SqlDeviceRegistrationRepository, SqlLastEventRepository};
use stayreal_firebase::FirebaseClient;
use stayreal_notifier::{
    regions_from_config, DeviceDelivery, Dispatcher, HttpEventSource, NotifierService,
    RegistrationState,
};
use tracing::{info, warn};

/// Everything `main` needs to start the two long-running tasks
pub struct Services {
    pub notifier: Arc<NotifierService>,
    pub registration: Arc<RegistrationState>,
}

pub async fn build_services(config: &AppConfig) -> Result<Services, StayrealError> {
    let db_client = DbClient::from_config(&config.database).await?;
    init_schema(&db_client).await?;

    let factory = SqlRepositoryFactory::new();
    let registry: Arc<SqlDeviceRegistrationRepository> =
        Arc::new(factory.create_repository(db_client.clone()));
    let last_events: Arc<SqlLastEventRepository> =
        Arc::new(factory.create_repository(db_client.clone()));
    log_stored_moments(&last_events).await?;

    let dispatcher = Dispatcher::new(
        topic_broadcaster(config).await?,
        device_delivery(config, registry.clone())?,
    );

    let regions = regions_from_config(&config.notifier)?;
    let notifier = NotifierService::new(
        regions,
        Arc::new(HttpEventSource::new(&config.upstream)?),
        last_events,
        dispatcher,
        Duration::from_secs(config.notifier.poll_interval_secs),
    )?;

    let health: Arc<dyn HealthCheck> = Arc::new(db_client);
    let registration = RegistrationState {
        registry,
        health: Some(health),
    };

    Ok(Services {
        notifier: Arc::new(notifier),
        registration: Arc::new(registration),
    })
}

/// Logs the moment id each region resumes from.
async fn log_stored_moments(last_events: &SqlLastEventRepository) -> Result<(), StayrealError> {
    let records = last_events.find_all().await?;
    if records.is_empty() {
        info!("No stored moments: the first poll of every region will notify");
    }
    for record in records {
        info!(
            region = %record.region,
            last_event_id = %record.last_event_id,
            "Resuming from stored moment"
        );
    }
    Ok(())
}

async fn topic_broadcaster(
    config: &AppConfig,
) -> Result<Option<Arc<dyn TopicBroadcaster>>, StayrealError> {
    let Some(firebase_config) = config.firebase.clone().filter(|_| is_firebase_enabled(config))
    else {
        warn!("Firebase disabled: Android devices will not be notified");
        return Ok(None);
    };

    // a missing or unreadable service account key is a startup failure
    let client = FirebaseClient::new(firebase_config).await?;
    info!("Firebase topic broadcast enabled");
    Ok(Some(Arc::new(client)))
}

fn device_delivery(
    config: &AppConfig,
    registry: Arc<dyn DeviceRegistry>,
) -> Result<Option<DeviceDelivery>, StayrealError> {
    let Some(apns_config) = config.apns.as_ref().filter(|_| is_apns_enabled(config)) else {
        warn!("APNs disabled: iOS devices will not be notified");
        return Ok(None);
    };

    // an unreadable signing key is a startup failure
    let pusher = ApnsPusher::from_config(apns_config)?;
    info!("APNs device delivery enabled");
    Ok(Some(DeviceDelivery::new(registry, Arc::new(pusher))))
}
