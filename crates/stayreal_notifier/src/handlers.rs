// --- File: crates/stayreal_notifier/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use stayreal_common::{
    validation_error, DeviceRegistration, DeviceRegistry, Environment, HealthCheck,
    HttpStatusCode, Region, StayrealError,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state of the registration routes
#[derive(Clone)]
pub struct RegistrationState {
    pub registry: Arc<dyn DeviceRegistry>,
    /// Checked by `/health`; always healthy when absent.
    pub health: Option<Arc<dyn HealthCheck>>,
}

type HandlerError = (StatusCode, String);

fn to_response_error(err: StayrealError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string())
}

/// Parses `{deviceId}/{region}/{token}/{flag}`.
///
/// Exactly four non-empty segments are required. The flag is `1` for a debug
/// build of the app and `0` for a production one.
pub fn parse_registration(path: &str) -> Result<DeviceRegistration, StayrealError> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let [device_id, region, token, flag] = segments.as_slice() else {
        return Err(validation_error(format!(
            "expected /register/{{deviceId}}/{{region}}/{{token}}/{{flag}}, got {} segment(s)",
            segments.len()
        )));
    };

    for (name, value) in [
        ("deviceId", device_id),
        ("region", region),
        ("token", token),
        ("flag", flag),
    ] {
        if value.is_empty() {
            return Err(validation_error(format!("{} is empty", name)));
        }
    }

    let region: Region = region.parse()?;
    let environment = Environment::from_flag(flag)?;

    Ok(DeviceRegistration::new(*device_id, region, *token, environment))
}

/// Registers (or re-registers) an iOS device for APNs delivery.
#[axum::debug_handler]
pub async fn register_device_handler(
    State(state): State<Arc<RegistrationState>>,
    Path(rest): Path<String>,
) -> Result<&'static str, HandlerError> {
    let registration = parse_registration(&rest).map_err(|e| {
        warn!("Rejected registration: {}", e);
        to_response_error(e)
    })?;

    let device_id = registration.device_id.clone();
    let region = registration.region;
    state
        .registry
        .register_device(registration)
        .await
        .map_err(|e| {
            error!(device_id = %device_id, "Failed to store registration: {}", e);
            to_response_error(e)
        })?;

    info!(device_id = %device_id, region = %region, "Device registered");
    Ok("OK")
}

/// `/register` without any segment.
pub async fn register_without_segments_handler() -> HandlerError {
    to_response_error(validation_error(
        "expected /register/{deviceId}/{region}/{token}/{flag}",
    ))
}

pub async fn banner_handler() -> &'static str {
    "StayReal notifier is running"
}

pub async fn health_handler(
    State(state): State<Arc<RegistrationState>>,
) -> Result<&'static str, HandlerError> {
    let Some(health) = &state.health else {
        return Ok("OK");
    };

    health.check().await.map_err(|e| {
        error!("Health check failed: {}", e);
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })?;
    Ok("OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_registration() {
        let registration = parse_registration("dev-1/us-central/tok-1/0").unwrap();
        assert_eq!(
            registration,
            DeviceRegistration::new("dev-1", Region::UsCentral, "tok-1", Environment::Production)
        );

        let debug = parse_registration("dev-2/asia-east/tok-2/1").unwrap();
        assert_eq!(debug.environment, Environment::Debug);
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        for path in [
            "",
            "dev-1",
            "dev-1/us-central",
            "dev-1/us-central/0",
            "dev-1/us-central/tok-1/0/extra",
        ] {
            assert!(
                matches!(parse_registration(path), Err(StayrealError::ValidationError(_))),
                "{:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(parse_registration("dev-1/us-central//0").is_err());
        assert!(parse_registration("/us-central/tok-1/0").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_region_and_flag() {
        assert!(parse_registration("dev-1/mars-north/tok-1/0").is_err());
        assert!(parse_registration("dev-1/us-central/tok-1/2").is_err());
        assert!(parse_registration("dev-1/us-central/tok-1/true").is_err());
    }
}
