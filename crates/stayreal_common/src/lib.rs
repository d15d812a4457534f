// --- File: crates/stayreal_common/src/lib.rs ---

pub mod error; // Error taxonomy
pub mod features; // Runtime feature flags
pub mod http; // HTTP utilities
pub mod logging; // Logging setup
pub mod models; // Shared data structures
pub mod services; // Service traits (collaborator seams)

pub use error::{
    config_error, external_service_error, validation_error, HttpStatusCode, PushError,
    StayrealError,
};

pub use http::client::{create_client, HTTP_CLIENT};

pub use features::{is_apns_enabled, is_feature_enabled, is_firebase_enabled};

pub use models::{
    DeviceNotification, DeviceRegistration, Environment, Event, LastEventRecord, Region,
};

pub use services::{
    BoxFuture, DevicePusher, DeviceRegistry, EventSource, HealthCheck, LastEventStore,
    TopicBroadcaster,
};
