//! Per-device delivery to every registered device of a region

use std::sync::Arc;

use futures::future::join_all;
use stayreal_common::{
    DeviceNotification, DevicePusher, DeviceRegistration, DeviceRegistry, Event, PushError,
    Region, StayrealError,
};
use tracing::{error, info, warn};

/// Outcome counts of one delivery round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub delivered: usize,
    /// Devices removed because the provider reported their token invalid
    pub pruned: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct DeviceDelivery {
    registry: Arc<dyn DeviceRegistry>,
    pusher: Arc<dyn DevicePusher>,
}

impl DeviceDelivery {
    pub fn new(registry: Arc<dyn DeviceRegistry>, pusher: Arc<dyn DevicePusher>) -> Self {
        Self { registry, pusher }
    }

    /// Pushes the moment notification to every device registered for `region`.
    ///
    /// Devices are attempted concurrently and independently. A device whose
    /// token is reported invalid is deleted from the registry; any other
    /// failure is logged and the registration kept. Nothing is retried.
    pub async fn deliver_to_devices(
        &self,
        region: Region,
        event: &Event,
    ) -> Result<DeliverySummary, StayrealError> {
        let devices = self.registry.devices_for_region(region).await?;
        if devices.is_empty() {
            info!(region = %region, "No registered devices");
            return Ok(DeliverySummary::default());
        }

        let notification = DeviceNotification::moment();
        let results = join_all(
            devices
                .iter()
                .map(|device| self.pusher.push(device, &notification)),
        )
        .await;

        let mut summary = DeliverySummary::default();
        for (device, result) in devices.iter().zip(results) {
            match result {
                Ok(()) => summary.delivered += 1,
                Err(err) if err.is_invalid_token() => {
                    if self.prune(device, &err).await {
                        summary.pruned += 1;
                    } else {
                        summary.failed += 1;
                    }
                }
                Err(err) => {
                    error!(
                        region = %region,
                        device_id = %device.device_id,
                        "Push failed: {}", err
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            region = %region,
            event_id = %event.id,
            delivered = summary.delivered,
            pruned = summary.pruned,
            failed = summary.failed,
            "Device delivery finished"
        );
        Ok(summary)
    }

    async fn prune(&self, device: &DeviceRegistration, reason: &PushError) -> bool {
        warn!(
            device_id = %device.device_id,
            "Removing device with invalid token: {}", reason
        );
        match self
            .registry
            .delete_device(&device.device_id, &device.delivery_token)
            .await
        {
            Ok(removed) => {
                if !removed {
                    info!(device_id = %device.device_id, "Registration changed since the push, keeping it");
                }
                true
            }
            Err(e) => {
                error!(device_id = %device.device_id, "Failed to remove device: {}", e);
                false
            }
        }
    }
}
