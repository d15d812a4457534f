//! Runtime feature flags.
//!
//! A push channel is active when its `use_*` flag is set in the configuration
//! and its configuration section is present. Channels that are switched off
//! are skipped by the dispatcher instead of failing every cycle.

use stayreal_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Arguments
///
/// * `use_feature` - The configuration flag that enables the feature
/// * `feature_config` - The configuration section for the feature
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the FCM topic broadcast channel is enabled.
pub fn is_firebase_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_firebase, config.firebase.as_ref())
}

/// Check if the APNs per-device channel is enabled.
pub fn is_apns_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_apns, config.apns.as_ref())
}
