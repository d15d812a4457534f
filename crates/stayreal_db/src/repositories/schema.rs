//! Schema creation
//!
//! Three tables: the fixed region list, the last moment id per region and the
//! APNs device registrations. Both data tables reference `regions`, which is
//! seeded with every known region so registrations never wait for a poll.

use crate::error::DbError;
use crate::DbClient;
use stayreal_common::Region;
use tracing::{debug, error, info};

const CREATE_REGIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS regions (
        name VARCHAR(12) PRIMARY KEY NOT NULL
    )
"#;

const CREATE_LAST_EVENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS last_events (
        region VARCHAR(12) PRIMARY KEY NOT NULL REFERENCES regions(name),
        last_event_id VARCHAR(100) NOT NULL
    )
"#;

const CREATE_DEVICE_REGISTRATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS device_registrations (
        device_id VARCHAR(36) PRIMARY KEY NOT NULL,
        debug BIGINT NOT NULL,
        token VARCHAR(200) NOT NULL,
        region VARCHAR(12) NOT NULL REFERENCES regions(name)
    )
"#;

const CREATE_DEVICE_REGION_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_device_registrations_region
    ON device_registrations (region)
"#;

/// Creates the tables if they do not exist and seeds the region list.
///
/// Safe to run on every startup.
pub async fn init_schema(db_client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing notifier schema");

    for statement in [
        CREATE_REGIONS,
        CREATE_LAST_EVENTS,
        CREATE_DEVICE_REGISTRATIONS,
        CREATE_DEVICE_REGION_INDEX,
    ] {
        db_client.execute(statement).await?;
    }

    for region in Region::ALL {
        sqlx::query("INSERT INTO regions (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(region.as_str())
            .execute(db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to seed region {}: {}", region, e);
                DbError::QueryError(e.to_string())
            })?;
    }

    info!("Notifier schema initialized successfully");
    Ok(())
}
