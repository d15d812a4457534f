// --- File: crates/stayreal_common/src/services.rs ---
//! Service abstractions for the collaborators of the notifier.
//!
//! The notifier only talks to the outside world through these traits: the
//! upstream moments API, the two stores, and the two push providers. Concrete
//! implementations live in the integration crates (`stayreal-db`,
//! `stayreal-firebase`, `stayreal-apns`); tests swap in in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use crate::error::{PushError, StayrealError};
use crate::models::{DeviceNotification, DeviceRegistration, Event, Region};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Source of the current moment of a region.
pub trait EventSource: Send + Sync {
    /// Fetches the latest moment for `region`. Every call is a fresh read.
    fn fetch_latest_event(&self, region: Region) -> BoxFuture<'_, Event, StayrealError>;
}

/// Storage of the last moment id seen per region.
pub trait LastEventStore: Send + Sync {
    /// Returns the stored id, or `None` if the region was never recorded.
    fn last_event_id(&self, region: Region) -> BoxFuture<'_, Option<String>, StayrealError>;

    /// Inserts or replaces the stored id for `region`.
    fn set_last_event_id<'a>(
        &'a self,
        region: Region,
        event_id: &'a str,
    ) -> BoxFuture<'a, (), StayrealError>;
}

/// Storage of APNs device registrations.
pub trait DeviceRegistry: Send + Sync {
    /// Inserts the registration, replacing any previous one with the same device id.
    fn register_device(
        &self,
        registration: DeviceRegistration,
    ) -> BoxFuture<'_, DeviceRegistration, StayrealError>;

    /// Lists every device registered for `region`.
    fn devices_for_region(
        &self,
        region: Region,
    ) -> BoxFuture<'_, Vec<DeviceRegistration>, StayrealError>;

    /// Deletes the registration of `device_id` if it still holds `token`.
    /// Returns `true` if a row was removed; a device that re-registered with
    /// another token in the meantime is kept.
    fn delete_device<'a>(
        &'a self,
        device_id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, bool, StayrealError>;
}

/// Broadcast channel addressing every subscriber of a region topic at once.
pub trait TopicBroadcaster: Send + Sync {
    /// Sends one message for `event` to the topic named after `region`.
    /// Returns the provider's message name.
    fn broadcast<'a>(
        &'a self,
        region: Region,
        event: &'a Event,
    ) -> BoxFuture<'a, String, StayrealError>;
}

/// Token-addressed push channel.
pub trait DevicePusher: Send + Sync {
    /// Sends `notification` to the device, picking the credentials matching its environment.
    fn push<'a>(
        &'a self,
        device: &'a DeviceRegistration,
        notification: &'a DeviceNotification,
    ) -> BoxFuture<'a, (), PushError>;
}

/// Readiness check of a backing store.
pub trait HealthCheck: Send + Sync {
    fn check(&self) -> BoxFuture<'_, (), StayrealError>;
}
