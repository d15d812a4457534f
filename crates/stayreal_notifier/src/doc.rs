// File: crates/stayreal_notifier/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/register/{device_id}/{region}/{token}/{flag}",
    params(
        ("device_id" = String, Path, description = "Stable identifier of the device", example = "6E1F0A52-2C41-4B4B-9E0F-1E0E9F5D7C11"),
        ("region" = String, Path, description = "One of us-central, europe-west, asia-west, asia-east", example = "europe-west"),
        ("token" = String, Path, description = "APNs device token"),
        ("flag" = String, Path, description = "1 for a debug build (sandbox APNs), 0 for production", example = "0")
    ),
    responses(
        (status = 200, description = "Device registered", body = String, example = json!("OK")),
        (status = 400, description = "Missing segment, unknown region or invalid flag", body = String),
        (status = 500, description = "Registration could not be stored", body = String)
    ),
    tag = "Registration"
)]
fn doc_register_device_handler() {}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = String),
        (status = 503, description = "Store unreachable", body = String)
    ),
    tag = "Registration"
)]
fn doc_health_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_register_device_handler, doc_health_handler),
    tags((name = "Registration", description = "APNs device registration"))
)]
pub struct NotifierApiDoc;
