//! Moment notifier for StayReal
//!
//! Polls the upstream "last moment" resource of every configured region and,
//! whenever the moment id changes, announces it on both push channels: one
//! FCM topic broadcast for Android and one APNs push per registered iOS device.
//!
//! The crate also serves the registration listener through which iOS devices
//! enroll for APNs delivery.

pub mod delivery;
pub mod detector;
pub mod dispatcher;
pub mod doc;
pub mod handlers;
pub mod poller;
pub mod routes;
pub mod service;

#[cfg(test)]
mod detector_proptest;
#[cfg(test)]
mod test_support;

pub use delivery::{DeliverySummary, DeviceDelivery};
pub use detector::ChangeDetector;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use handlers::RegistrationState;
pub use poller::HttpEventSource;
pub use service::{regions_from_config, NotifierService, RegionOutcome};
