//! In-process fakes for the service seams

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use stayreal_common::{
    BoxFuture, DeviceNotification, DevicePusher, DeviceRegistration, DeviceRegistry, Event,
    EventSource, HealthCheck, LastEventStore, PushError, Region, StayrealError, TopicBroadcaster,
};

pub fn moment(region: Region, id: &str) -> Event {
    Event {
        id: id.to_string(),
        region,
        start_date: "2024-05-02T16:21:08.000Z".to_string(),
        end_date: "2024-05-02T16:23:08.000Z".to_string(),
        timezone: "UTC".to_string(),
        local_time: None,
        local_date: None,
    }
}

fn store_down() -> StayrealError {
    StayrealError::DatabaseError("store unavailable".to_string())
}

#[derive(Default)]
pub struct InMemoryLastEventStore {
    ids: Mutex<HashMap<Region, String>>,
    fail: bool,
}

impl InMemoryLastEventStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn get(&self, region: Region) -> Option<String> {
        self.ids.lock().unwrap().get(&region).cloned()
    }
}

impl LastEventStore for InMemoryLastEventStore {
    fn last_event_id(&self, region: Region) -> BoxFuture<'_, Option<String>, StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(store_down());
            }
            Ok(self.get(region))
        })
    }

    fn set_last_event_id<'a>(
        &'a self,
        region: Region,
        event_id: &'a str,
    ) -> BoxFuture<'a, (), StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(store_down());
            }
            self.ids.lock().unwrap().insert(region, event_id.to_string());
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct InMemoryDeviceRegistry {
    devices: Mutex<HashMap<String, DeviceRegistration>>,
    fail: bool,
}

impl InMemoryDeviceRegistry {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_devices(devices: impl IntoIterator<Item = DeviceRegistration>) -> Self {
        let registry = Self::default();
        {
            let mut map = registry.devices.lock().unwrap();
            for device in devices {
                map.insert(device.device_id.clone(), device);
            }
        }
        registry
    }

    pub fn get(&self, device_id: &str) -> Option<DeviceRegistration> {
        self.devices.lock().unwrap().get(device_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn register_device(
        &self,
        registration: DeviceRegistration,
    ) -> BoxFuture<'_, DeviceRegistration, StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(store_down());
            }
            self.devices
                .lock()
                .unwrap()
                .insert(registration.device_id.clone(), registration.clone());
            Ok(registration)
        })
    }

    fn devices_for_region(
        &self,
        region: Region,
    ) -> BoxFuture<'_, Vec<DeviceRegistration>, StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(store_down());
            }
            let mut devices: Vec<_> = self
                .devices
                .lock()
                .unwrap()
                .values()
                .filter(|d| d.region == region)
                .cloned()
                .collect();
            devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));
            Ok(devices)
        })
    }

    fn delete_device<'a>(
        &'a self,
        device_id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, bool, StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(store_down());
            }
            let mut devices = self.devices.lock().unwrap();
            match devices.get(device_id) {
                Some(device) if device.delivery_token == token => {
                    devices.remove(device_id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }
}

impl HealthCheck for InMemoryDeviceRegistry {
    fn check(&self) -> BoxFuture<'_, (), StayrealError> {
        Box::pin(async move {
            if self.fail {
                Err(store_down())
            } else {
                Ok(())
            }
        })
    }
}

/// Serves whatever moment id was last set for a region, optionally after a
/// per-region delay
#[derive(Default)]
pub struct FakeEventSource {
    current: Mutex<HashMap<Region, String>>,
    delays: Mutex<HashMap<Region, Duration>>,
    calls: Mutex<usize>,
}

impl FakeEventSource {
    pub fn set(&self, region: Region, id: &str) {
        self.current.lock().unwrap().insert(region, id.to_string());
    }

    pub fn set_delay(&self, region: Region, delay: Duration) {
        self.delays.lock().unwrap().insert(region, delay);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl EventSource for FakeEventSource {
    fn fetch_latest_event(&self, region: Region) -> BoxFuture<'_, Event, StayrealError> {
        Box::pin(async move {
            *self.calls.lock().unwrap() += 1;
            let delay = self.delays.lock().unwrap().get(&region).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let current = self.current.lock().unwrap().get(&region).cloned();
            match current {
                Some(id) => Ok(moment(region, &id)),
                None => Err(StayrealError::UpstreamError(format!(
                    "no moment for {}",
                    region
                ))),
            }
        })
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<(Region, String)>>,
    fail: bool,
}

impl RecordingBroadcaster {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Region, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl TopicBroadcaster for RecordingBroadcaster {
    fn broadcast<'a>(
        &'a self,
        region: Region,
        event: &'a Event,
    ) -> BoxFuture<'a, String, StayrealError> {
        Box::pin(async move {
            if self.fail {
                return Err(StayrealError::ExternalServiceError {
                    service_name: "fcm".to_string(),
                    message: "unavailable".to_string(),
                });
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((region, event.id.clone()));
            Ok(format!("projects/test/messages/{}", sent.len()))
        })
    }
}

/// Accepts every token except the ones marked invalid or failing
#[derive(Default)]
pub struct RecordingPusher {
    delivered: Mutex<Vec<String>>,
    invalid: HashSet<String>,
    failing: HashSet<String>,
}

impl RecordingPusher {
    pub fn with_invalid(mut self, token: &str) -> Self {
        self.invalid.insert(token.to_string());
        self
    }

    pub fn with_failing(mut self, token: &str) -> Self {
        self.failing.insert(token.to_string());
        self
    }

    pub fn delivered(&self) -> Vec<String> {
        let mut delivered = self.delivered.lock().unwrap().clone();
        delivered.sort();
        delivered
    }
}

impl DevicePusher for RecordingPusher {
    fn push<'a>(
        &'a self,
        device: &'a DeviceRegistration,
        _notification: &'a DeviceNotification,
    ) -> BoxFuture<'a, (), PushError> {
        Box::pin(async move {
            let token = &device.delivery_token;
            if self.invalid.contains(token) {
                return Err(PushError::InvalidToken {
                    reason: "Unregistered".to_string(),
                });
            }
            if self.failing.contains(token) {
                return Err(PushError::Rejected {
                    status: 500,
                    reason: "InternalServerError".to_string(),
                });
            }
            self.delivered.lock().unwrap().push(token.clone());
            Ok(())
        })
    }
}
