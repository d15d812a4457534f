// File: services/stayreal_backend/src/main.rs
use axum::Router;
use stayreal_common::logging;
use stayreal_config::load_config;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod service_factory;

use service_factory::build_services;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    logging::init_with_level(logging::parse_level(&level));

    let services = match build_services(&config).await {
        Ok(services) => services,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = services.notifier.clone().spawn(shutdown_rx);

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app: Router = stayreal_notifier::routes::routes(services.registration.clone());

    #[cfg(feature = "openapi")]
    {
        use stayreal_notifier::doc::NotifierApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /docs");
        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", NotifierApiDoc::openapi()));
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Registration listener on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        error!("Notifier task failed: {}", e);
    }

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
