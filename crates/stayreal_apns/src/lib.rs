//! Apple Push Notification service delivery for the StayReal notifier
//!
//! iOS devices are addressed one by one with the token they registered.
//! [`ApnsPusher`] implements [`stayreal_common::DevicePusher`] on top of two
//! [`ApnsClient`]s, one per APNs environment, sharing a cached ES256
//! provider token.

pub mod client;
pub mod error;
pub mod pusher;
pub mod token;


pub use client::{classify_rejection, ApnsClient, APNS_PRODUCTION_URL, APNS_SANDBOX_URL};
pub use error::ApnsError;
pub use pusher::ApnsPusher;
pub use token::ProviderTokenSigner;
