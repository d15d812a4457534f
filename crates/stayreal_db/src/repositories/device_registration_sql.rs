//! SQL implementation of the device registry
//!
//! One row per device id. Registering an id again overwrites the environment,
//! token and region of the existing row.

use crate::error::DbError;
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use stayreal_common::{
    BoxFuture, DeviceRegistration, DeviceRegistry, Environment, Region, StayrealError,
};
use tracing::{debug, error, info};

/// SQL implementation of the device registration repository
#[derive(Debug, Clone)]
pub struct SqlDeviceRegistrationRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlDeviceRegistrationRepository {
    /// Create a new SQL device registration repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Register a device
    ///
    /// Inserts the registration, or replaces every field of the existing row
    /// with the same device id.
    pub async fn register_device(
        &self,
        registration: DeviceRegistration,
    ) -> Result<DeviceRegistration, DbError> {
        debug!(
            "Registering device {} for region {}",
            registration.device_id, registration.region
        );

        let query = r#"
            INSERT INTO device_registrations (device_id, debug, token, region)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (device_id) DO UPDATE SET
                debug = excluded.debug,
                token = excluded.token,
                region = excluded.region
        "#;

        sqlx::query(query)
            .bind(&registration.device_id)
            .bind(i64::from(registration.environment.is_debug()))
            .bind(&registration.delivery_token)
            .bind(registration.region.as_str())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to store device registration: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        info!("Device registration stored successfully");
        Ok(registration)
    }

    /// Find a device registration by device ID
    pub async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRegistration>, DbError> {
        debug!("Finding device registration for device: {}", device_id);

        let query = r#"
            SELECT device_id, debug, token, region
            FROM device_registrations
            WHERE device_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(device_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find device registration: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(registration_from_row).transpose()
    }

    /// Find all device registrations for a region
    pub async fn find_by_region(&self, region: Region) -> Result<Vec<DeviceRegistration>, DbError> {
        debug!("Finding all device registrations for region: {}", region);

        let query = r#"
            SELECT device_id, debug, token, region
            FROM device_registrations
            WHERE region = $1
        "#;

        let rows = sqlx::query(query)
            .bind(region.as_str())
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find device registrations: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(registration_from_row).collect()
    }

    /// Delete a device registration, only while it still holds `token`
    ///
    /// # Returns
    ///
    /// `true` if a registration was deleted, `false` if none matched
    pub async fn delete_registration(&self, device_id: &str, token: &str) -> Result<bool, DbError> {
        debug!("Deleting device registration for device: {}", device_id);

        let result =
            sqlx::query("DELETE FROM device_registrations WHERE device_id = $1 AND token = $2")
                .bind(device_id)
                .bind(token)
                .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to delete device registration: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn registration_from_row(row: &AnyRow) -> Result<DeviceRegistration, DbError> {
    let region: String = row.try_get("region")?;
    let region = region
        .parse::<Region>()
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let debug: i64 = row.try_get("debug")?;

    Ok(DeviceRegistration {
        device_id: row.try_get("device_id")?,
        environment: if debug != 0 {
            Environment::Debug
        } else {
            Environment::Production
        },
        delivery_token: row.try_get("token")?,
        region,
    })
}

impl DeviceRegistry for SqlDeviceRegistrationRepository {
    fn register_device(
        &self,
        registration: DeviceRegistration,
    ) -> BoxFuture<'_, DeviceRegistration, StayrealError> {
        Box::pin(async move {
            Ok(SqlDeviceRegistrationRepository::register_device(self, registration).await?)
        })
    }

    fn devices_for_region(
        &self,
        region: Region,
    ) -> BoxFuture<'_, Vec<DeviceRegistration>, StayrealError> {
        Box::pin(async move { Ok(self.find_by_region(region).await?) })
    }

    fn delete_device<'a>(
        &'a self,
        device_id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, bool, StayrealError> {
        Box::pin(async move { Ok(self.delete_registration(device_id, token).await?) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::init_schema;

    async fn repository() -> SqlDeviceRegistrationRepository {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        init_schema(&client).await.unwrap();
        SqlDeviceRegistrationRepository::new(client)
    }

    #[tokio::test]
    async fn test_register_then_list_round_trip() {
        let repo = repository().await;
        let registration =
            DeviceRegistration::new("dev-1", Region::UsCentral, "tok-1", Environment::Production);

        repo.register_device(registration.clone()).await.unwrap();

        assert_eq!(
            repo.find_by_region(Region::UsCentral).await.unwrap(),
            vec![registration]
        );
        assert!(repo.find_by_region(Region::EuropeWest).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_re_registration_replaces_every_field() {
        let repo = repository().await;
        repo.register_device(DeviceRegistration::new(
            "dev-1",
            Region::UsCentral,
            "tok-1",
            Environment::Production,
        ))
        .await
        .unwrap();

        let replacement =
            DeviceRegistration::new("dev-1", Region::AsiaWest, "tok-2", Environment::Debug);
        repo.register_device(replacement.clone()).await.unwrap();

        assert_eq!(
            repo.find_by_device_id("dev-1").await.unwrap(),
            Some(replacement.clone())
        );
        assert!(repo.find_by_region(Region::UsCentral).await.unwrap().is_empty());
        assert_eq!(
            repo.find_by_region(Region::AsiaWest).await.unwrap(),
            vec![replacement]
        );
    }

    #[tokio::test]
    async fn test_delete_only_removes_the_given_device() {
        let repo = repository().await;
        for (id, token) in [("dev-1", "tok-1"), ("dev-2", "tok-2")] {
            repo.register_device(DeviceRegistration::new(
                id,
                Region::EuropeWest,
                token,
                Environment::Production,
            ))
            .await
            .unwrap();
        }

        assert!(repo.delete_device("dev-1", "tok-1").await.unwrap());
        assert!(!repo.delete_device("dev-1", "tok-1").await.unwrap());

        let remaining = repo.devices_for_region(Region::EuropeWest).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].device_id, "dev-2");
    }

    #[tokio::test]
    async fn test_delete_keeps_a_registration_with_a_newer_token() {
        let repo = repository().await;
        repo.register_device(DeviceRegistration::new(
            "dev-1",
            Region::UsCentral,
            "tok-new",
            Environment::Production,
        ))
        .await
        .unwrap();

        assert!(!repo.delete_device("dev-1", "tok-old").await.unwrap());
        assert_eq!(
            repo.find_by_device_id("dev-1")
                .await
                .unwrap()
                .map(|d| d.delivery_token),
            Some("tok-new".to_string())
        );
    }
}
