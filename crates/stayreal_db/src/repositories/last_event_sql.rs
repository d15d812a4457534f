//! SQL repository for the last moment id seen per region

use crate::error::DbError;
use crate::DbClient;
use sqlx::Row;
use stayreal_common::{BoxFuture, LastEventRecord, LastEventStore, Region, StayrealError};
use tracing::{debug, error};

/// SQL implementation of [`LastEventStore`]
#[derive(Debug, Clone)]
pub struct SqlLastEventRepository {
    db_client: DbClient,
}

impl SqlLastEventRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Find the last moment id stored for a region
    pub async fn find_by_region(&self, region: Region) -> Result<Option<String>, DbError> {
        debug!("Finding last event for region: {}", region);

        let row = sqlx::query("SELECT last_event_id FROM last_events WHERE region = $1")
            .bind(region.as_str())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find last event: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.map(|row| row.try_get::<String, _>("last_event_id"))
            .transpose()
            .map_err(DbError::from)
    }

    /// Insert or replace the last moment id of a region
    pub async fn upsert(&self, region: Region, last_event_id: &str) -> Result<(), DbError> {
        debug!("Storing last event for region {}: {}", region, last_event_id);

        let query = r#"
            INSERT INTO last_events (region, last_event_id)
            VALUES ($1, $2)
            ON CONFLICT (region) DO UPDATE SET last_event_id = excluded.last_event_id
        "#;

        sqlx::query(query)
            .bind(region.as_str())
            .bind(last_event_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to store last event: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(())
    }

    /// All stored records
    pub async fn find_all(&self) -> Result<Vec<LastEventRecord>, DbError> {
        let rows = sqlx::query("SELECT region, last_event_id FROM last_events ORDER BY region")
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list last events: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.into_iter()
            .map(|row| -> Result<LastEventRecord, DbError> {
                let region: String = row.try_get("region")?;
                let region = region
                    .parse::<Region>()
                    .map_err(|e| DbError::CorruptRow(e.to_string()))?;
                Ok(LastEventRecord {
                    region,
                    last_event_id: row.try_get("last_event_id")?,
                })
            })
            .collect()
    }
}

impl LastEventStore for SqlLastEventRepository {
    fn last_event_id(&self, region: Region) -> BoxFuture<'_, Option<String>, StayrealError> {
        Box::pin(async move { Ok(self.find_by_region(region).await?) })
    }

    fn set_last_event_id<'a>(
        &'a self,
        region: Region,
        event_id: &'a str,
    ) -> BoxFuture<'a, (), StayrealError> {
        Box::pin(async move { Ok(self.upsert(region, event_id).await?) })
    }
}
