//! Change detection against the last moment id stored per region

use std::sync::Arc;

use stayreal_common::{Event, LastEventStore, Region, StayrealError};
use tracing::debug;

/// `true` when `incoming` differs from the stored id, or nothing is stored yet.
pub fn is_new_event(stored: Option<&str>, incoming: &str) -> bool {
    stored != Some(incoming)
}

#[derive(Clone)]
pub struct ChangeDetector {
    store: Arc<dyn LastEventStore>,
}

impl ChangeDetector {
    pub fn new(store: Arc<dyn LastEventStore>) -> Self {
        Self { store }
    }

    /// Compares `event` with the stored record of `region`. Does not write.
    pub async fn has_changed(&self, region: Region, event: &Event) -> Result<bool, StayrealError> {
        let stored = self.store.last_event_id(region).await?;
        debug!(region = %region, stored = ?stored, incoming = %event.id, "Comparing moment ids");
        Ok(is_new_event(stored.as_deref(), &event.id))
    }

    /// Stores `event` as the last moment seen for `region`.
    pub async fn record(&self, region: Region, event: &Event) -> Result<(), StayrealError> {
        self.store.set_last_event_id(region, &event.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{moment, InMemoryLastEventStore};

    #[test]
    fn test_first_observation_is_a_change() {
        assert!(is_new_event(None, "abc"));
    }

    #[test]
    fn test_same_id_is_not_a_change() {
        assert!(!is_new_event(Some("abc"), "abc"));
        assert!(is_new_event(Some("abc"), "xyz"));
    }

    #[tokio::test]
    async fn test_detection_does_not_persist() {
        let store = Arc::new(InMemoryLastEventStore::default());
        let detector = ChangeDetector::new(store.clone());
        let event = moment(Region::UsCentral, "abc");

        assert!(detector.has_changed(Region::UsCentral, &event).await.unwrap());
        assert!(detector.has_changed(Region::UsCentral, &event).await.unwrap());
        assert_eq!(store.get(Region::UsCentral), None);

        detector.record(Region::UsCentral, &event).await.unwrap();
        assert!(!detector.has_changed(Region::UsCentral, &event).await.unwrap());
        assert_eq!(store.get(Region::UsCentral).as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_regions_are_tracked_independently() {
        let store = Arc::new(InMemoryLastEventStore::default());
        let detector = ChangeDetector::new(store);

        detector
            .record(Region::EuropeWest, &moment(Region::EuropeWest, "abc"))
            .await
            .unwrap();

        assert!(detector
            .has_changed(Region::AsiaEast, &moment(Region::AsiaEast, "abc"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let store = Arc::new(InMemoryLastEventStore::failing());
        let detector = ChangeDetector::new(store);

        let err = detector
            .has_changed(Region::UsCentral, &moment(Region::UsCentral, "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, StayrealError::DatabaseError(_)));
    }
}
