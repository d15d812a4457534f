//! Firebase Cloud Messaging topic broadcast for the StayReal notifier
//!
//! Every Android client subscribes to the FCM topic named after its region.
//! When a new moment is detected, [`FirebaseClient`] sends one data message to
//! that topic through the FCM HTTP v1 API; FCM owns the fan-out to the
//! individual subscribers.
//!
//! # Example
//!
//! ```rust,no_run
//! use stayreal_config::FirebaseConfig;
//! use stayreal_firebase::{FirebaseClient, FirebaseError};
//!
//! async fn connect() -> Result<FirebaseClient, FirebaseError> {
//!     FirebaseClient::new(FirebaseConfig {
//!         project_id: Some("my-project-id".to_string()),
//!         key_path: Some("/path/to/service-account.json".to_string()),
//!         api_base_url: None,
//!     })
//!     .await
//! }
//! ```

pub mod auth;
pub mod client;
#[cfg(test)]
mod client_test;

pub use client::{moment_topic_message, FirebaseClient, FirebaseError};
