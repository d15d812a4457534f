//! The polling loop: fetch, detect, persist, dispatch

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use stayreal_common::{validation_error, EventSource, LastEventStore, Region, StayrealError};
use stayreal_config::NotifierConfig;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::detector::ChangeDetector;
use crate::dispatcher::{DispatchReport, Dispatcher};

/// Resolves the configured region names. An empty list means every region.
pub fn regions_from_config(config: &NotifierConfig) -> Result<Vec<Region>, StayrealError> {
    if config.regions.is_empty() {
        return Ok(Region::ALL.to_vec());
    }

    let mut regions = Vec::with_capacity(config.regions.len());
    for name in &config.regions {
        let region: Region = name.trim().parse()?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    Ok(regions)
}

/// What a region's unit of work ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    Unchanged,
    Changed {
        event_id: String,
        report: DispatchReport,
    },
}

pub struct NotifierService {
    regions: Vec<Region>,
    source: Arc<dyn EventSource>,
    detector: ChangeDetector,
    dispatcher: Dispatcher,
    interval: Duration,
}

impl NotifierService {
    pub fn new(
        regions: Vec<Region>,
        source: Arc<dyn EventSource>,
        store: Arc<dyn LastEventStore>,
        dispatcher: Dispatcher,
        interval: Duration,
    ) -> Result<Self, StayrealError> {
        if interval.is_zero() {
            return Err(validation_error("poll interval must be greater than zero"));
        }

        Ok(Self {
            regions,
            source,
            detector: ChangeDetector::new(store),
            dispatcher,
            interval,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// One unit of work for one region.
    ///
    /// The new id is persisted before dispatch starts: a crash during
    /// delivery loses that round rather than repeating it.
    pub async fn process_region(&self, region: Region) -> Result<RegionOutcome, StayrealError> {
        let event = self.source.fetch_latest_event(region).await?;

        if !self.detector.has_changed(region, &event).await? {
            debug!(region = %region, event_id = %event.id, "Moment unchanged");
            return Ok(RegionOutcome::Unchanged);
        }

        info!(region = %region, event_id = %event.id, "New moment detected");
        self.detector.record(region, &event).await?;

        let report = self.dispatcher.on_change(region, &event).await;
        Ok(RegionOutcome::Changed {
            event_id: event.id,
            report,
        })
    }

    /// Processes every configured region concurrently. A failing region is
    /// logged and does not affect the others.
    pub async fn run_cycle(&self) -> Vec<(Region, Result<RegionOutcome, StayrealError>)> {
        join_all(self.regions.iter().map(|&region| async move {
            let outcome = self.process_region(region).await;
            if let Err(e) = &outcome {
                error!(region = %region, "Poll cycle failed: {}", e);
            }
            (region, outcome)
        }))
        .await
    }

    /// Starts the timer loop. Each tick spawns its own cycle, so a slow cycle
    /// may overlap the next one. Once `shutdown` turns `true` no new cycle
    /// starts and the returned handle completes after the in-flight ones.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                regions = ?self.regions,
                interval_secs = self.interval.as_secs(),
                "Notifier started"
            );

            let mut cycles = JoinSet::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let service = Arc::clone(&self);
                        cycles.spawn(async move {
                            service.run_cycle().await;
                        });
                    }
                    Some(finished) = cycles.join_next(), if !cycles.is_empty() => {
                        if let Err(e) = finished {
                            error!("Poll cycle task failed: {}", e);
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            if !cycles.is_empty() {
                info!(in_flight = cycles.len(), "Waiting for running poll cycles");
            }
            while let Some(finished) = cycles.join_next().await {
                if let Err(e) = finished {
                    error!("Poll cycle task failed: {}", e);
                }
            }
            info!("Notifier stopped");
        })
    }
}
