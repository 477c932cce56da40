//! CountingPipeline: detector → crossing log → rate monitor, one frame at a time.

use std::sync::Arc;

use linewatch_core::config::LinewatchConfig;
use linewatch_core::errors::{ErrorCode, PipelineError, StorageError};
use linewatch_core::events::{
    CrossingRecordedEvent, EventDispatcher, ObservationsFilteredEvent, StorageErrorEvent,
    TrafficAlert, TrafficEventHandler,
};
use linewatch_core::traits::CrossingLog;
use linewatch_core::types::{CrossingEvent, Frame, Timestamp};

use crate::crossing::{CrossingDetector, FilterStats};
use crate::rate::{AlertDecision, RateMonitor};

/// What one successfully processed frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub recorded: Vec<CrossingEvent>,
    pub filtered: FilterStats,
    pub decision: AlertDecision,
    pub alert: Option<TrafficAlert>,
}

/// Single-producer counting pipeline.
///
/// A frame whose append fails is dropped: the failed candidate and every
/// candidate after it are reverted, so those tracks stay countable on later
/// frames. Candidates appended before the failure remain recorded.
pub struct CountingPipeline<L: CrossingLog + ?Sized> {
    detector: CrossingDetector,
    log: Arc<L>,
    monitor: RateMonitor<L>,
    events: EventDispatcher,
}

impl<L: CrossingLog + ?Sized> CountingPipeline<L> {
    pub fn new(config: &LinewatchConfig, log: Arc<L>) -> Result<Self, PipelineError> {
        let detector = CrossingDetector::from_config(&config.counting)?;
        let monitor = RateMonitor::from_config(Arc::clone(&log), &config.alert)?;
        Ok(Self::from_parts(detector, log, monitor))
    }

    pub fn from_parts(detector: CrossingDetector, log: Arc<L>, monitor: RateMonitor<L>) -> Self {
        Self {
            detector,
            log,
            monitor,
            events: EventDispatcher::new(),
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn TrafficEventHandler>) {
        self.events.register(handler);
    }

    pub fn detector(&self) -> &CrossingDetector {
        &self.detector
    }

    pub fn monitor(&self) -> &RateMonitor<L> {
        &self.monitor
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameReport, PipelineError> {
        let now = frame.timestamp;
        let outcome = self.detector.process_frame(frame);

        if !outcome.filtered.is_empty() {
            self.events
                .emit_observations_filtered(&ObservationsFilteredEvent {
                    timestamp: now,
                    class_not_accepted: outcome.filtered.class_not_accepted,
                    low_confidence: outcome.filtered.low_confidence,
                    invalid: outcome.filtered.invalid,
                });
        }

        let mut recorded = Vec::with_capacity(outcome.candidates.len());
        for (index, candidate) in outcome.candidates.iter().enumerate() {
            match self.log.append(candidate) {
                Ok(event_id) => {
                    self.detector.confirm(candidate.track_id);
                    let event = candidate.with_id(event_id);
                    self.events
                        .emit_crossing_recorded(&CrossingRecordedEvent { event });
                    recorded.push(event);
                }
                Err(e) => {
                    let pending = &outcome.candidates[index..];
                    for dropped in pending {
                        self.detector.revert(dropped.track_id);
                    }
                    tracing::warn!(
                        error = %e,
                        dropped = pending.len(),
                        recorded = recorded.len(),
                        "append failed, dropping frame"
                    );
                    self.report_storage_error(now, &e, pending.len());
                    return Err(e.into());
                }
            }
        }

        let decision = match self.monitor.evaluate(now) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "rate evaluation failed");
                self.report_storage_error(now, &e, 0);
                return Err(e.into());
            }
        };
        let alert = decision.to_alert(now, self.monitor.settings().threshold);
        if let Some(alert) = &alert {
            self.events.emit_traffic_alert(alert);
        }

        Ok(FrameReport {
            recorded,
            filtered: outcome.filtered,
            decision,
            alert,
        })
    }

    fn report_storage_error(&self, now: Timestamp, error: &StorageError, dropped: usize) {
        self.events.emit_storage_error(&StorageErrorEvent {
            timestamp: now,
            error_code: error.error_code().to_string(),
            message: error.to_string(),
            dropped_candidates: dropped,
        });
    }
}
