// --- File: crates/stayreal_common/src/models.rs ---

// Data structures shared by every StayReal crate: regions, moments fetched
// from upstream, device registrations and the notification sent to devices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StayrealError;

/// A geographic partition of the moments API.
///
/// Regions select the upstream resource to poll and scope both the FCM topic
/// and the set of APNs devices to notify.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    UsCentral,
    EuropeWest,
    AsiaWest,
    AsiaEast,
}

impl Region {
    /// Every known region, in a stable order.
    pub const ALL: [Region; 4] = [
        Region::UsCentral,
        Region::EuropeWest,
        Region::AsiaWest,
        Region::AsiaEast,
    ];

    /// The wire name, as used in upstream URLs, FCM topics and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsCentral => "us-central",
            Region::EuropeWest => "europe-west",
            Region::AsiaWest => "asia-west",
            Region::AsiaEast => "asia-east",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = StayrealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| StayrealError::ValidationError(format!("unknown region: {}", s)))
    }
}

/// The APNs environment a device was built for.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development builds, delivered through the APNs sandbox.
    Debug,
    Production,
}

impl Environment {
    /// Parses the registration route flag: `"1"` is debug, `"0"` is production.
    pub fn from_flag(flag: &str) -> Result<Self, StayrealError> {
        match flag {
            "1" => Ok(Environment::Debug),
            "0" => Ok(Environment::Production),
            other => Err(StayrealError::ValidationError(format!(
                "environment flag must be \"0\" or \"1\", got {:?}",
                other
            ))),
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Environment::Debug)
    }
}

/// A moment as returned by the upstream "last moment" resource.
///
/// Only `id` is persisted; the rest is forwarded in the FCM data payload.
/// `start_date` and `end_date` are kept exactly as upstream sent them, so an
/// unusual timestamp format never breaks polling.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub region: Region,
    pub start_date: String,
    pub end_date: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_date: Option<String>,
}

/// The last moment id seen for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEventRecord {
    pub region: Region,
    pub last_event_id: String,
}

/// A device that asked to be notified individually through APNs.
///
/// `device_id` is unique across all regions; registering again replaces
/// every other field.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    pub environment: Environment,
    pub delivery_token: String,
    pub region: Region,
}

impl DeviceRegistration {
    pub fn new(
        device_id: impl Into<String>,
        region: Region,
        delivery_token: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            environment,
            delivery_token: delivery_token.into(),
            region,
        }
    }
}

/// A visible notification sent to a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceNotification {
    pub title: String,
    pub body: String,
    /// Notifications sharing this id replace each other on the device
    /// instead of piling up.
    pub collapse_id: String,
}

impl DeviceNotification {
    /// The notification announcing a new moment.
    pub fn moment() -> Self {
        Self {
            title: "It's time for the moment !".to_string(),
            body: "You have 2 minutes to capture a moment".to_string(),
            collapse_id: "moment".to_string(),
        }
    }
}
