//! Fan-out of a detected moment change to both push channels

use std::sync::Arc;

use stayreal_common::{Event, Region, TopicBroadcaster};
use tracing::{error, info};

use crate::delivery::{DeliverySummary, DeviceDelivery};

/// What each channel achieved for one change. `None` means the channel is
/// disabled or failed; failures are logged by the dispatcher.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub broadcast: Option<String>,
    pub delivery: Option<DeliverySummary>,
}

#[derive(Clone, Default)]
pub struct Dispatcher {
    broadcaster: Option<Arc<dyn TopicBroadcaster>>,
    delivery: Option<DeviceDelivery>,
}

impl Dispatcher {
    pub fn new(
        broadcaster: Option<Arc<dyn TopicBroadcaster>>,
        delivery: Option<DeviceDelivery>,
    ) -> Self {
        Self {
            broadcaster,
            delivery,
        }
    }

    /// Runs topic broadcast and per-device delivery concurrently.
    ///
    /// Neither channel waits on the other's success. Errors are logged and
    /// never retried.
    pub async fn on_change(&self, region: Region, event: &Event) -> DispatchReport {
        let broadcast = async {
            let Some(broadcaster) = &self.broadcaster else {
                info!(region = %region, "Firebase disabled, skipping topic broadcast");
                return None;
            };
            broadcaster
                .broadcast(region, event)
                .await
                .map_err(|e| error!(region = %region, "Topic broadcast failed: {}", e))
                .ok()
        };

        let delivery = async {
            let Some(delivery) = &self.delivery else {
                info!(region = %region, "APNs disabled, skipping device delivery");
                return None;
            };
            delivery
                .deliver_to_devices(region, event)
                .await
                .map_err(|e| error!(region = %region, "Device delivery failed: {}", e))
                .ok()
        };

        let (broadcast, delivery) = tokio::join!(broadcast, delivery);
        DispatchReport {
            broadcast,
            delivery,
        }
    }
}
