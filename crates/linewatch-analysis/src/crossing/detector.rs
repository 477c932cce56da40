//! CrossingDetector: per-frame observations in, at-most-once crossing
//! candidates out.
//!
//! The detector never persists anything. Candidates come back as `Pending`;
//! the caller confirms each one after a successful append, or reverts it so
//! the track can be counted again on a later frame.

use linewatch_core::config::{CountingConfig, CrossingDirection, CrossingRule};
use linewatch_core::errors::ConfigError;
use linewatch_core::types::{Frame, NewCrossing, Observation, Timestamp, TrackId, VehicleClass};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::band::{CountingLine, LineSide};
use super::track_state::TrackState;

/// Detector configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSettings {
    pub line_position: f64,
    pub line_offset: u32,
    pub accepted_classes: FxHashSet<u32>,
    pub min_confidence: f32,
    pub rule: CrossingRule,
    pub direction: CrossingDirection,
    /// `None` keeps every track for the lifetime of the detector.
    pub track_ttl_seconds: Option<f64>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self::from_counting_config(&CountingConfig::default())
    }
}

impl DetectorSettings {
    /// Validate `config` and resolve its effective values.
    pub fn from_config(config: &CountingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_counting_config(config))
    }

    fn from_counting_config(config: &CountingConfig) -> Self {
        Self {
            line_position: config.effective_line_position(),
            line_offset: config.effective_line_offset(),
            accepted_classes: config.effective_accepted_classes().into_iter().collect(),
            min_confidence: config.effective_min_confidence(),
            rule: config.effective_crossing_rule(),
            direction: config.effective_direction(),
            track_ttl_seconds: config.track_ttl_seconds,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.line_position) {
            return Err(ConfigError::InvalidValue {
                field: "counting.line_position".to_string(),
                message: format!("{} is outside [0.0, 1.0]", self.line_position),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "counting.min_confidence".to_string(),
                message: format!("{} is outside [0.0, 1.0]", self.min_confidence),
            });
        }
        if let Some(unknown) = self
            .accepted_classes
            .iter()
            .find(|id| VehicleClass::from_class_id(**id).is_none())
        {
            return Err(ConfigError::InvalidValue {
                field: "counting.accepted_classes".to_string(),
                message: format!("class id {unknown} is not a known vehicle class"),
            });
        }
        if let Some(ttl) = self.track_ttl_seconds {
            if !ttl.is_finite() || ttl <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "counting.track_ttl_seconds".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Observations dropped by one `process` call, per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub class_not_accepted: usize,
    pub low_confidence: usize,
    /// Confidence outside [0, 1], non-finite coordinates or unknown class.
    pub invalid: usize,
}

impl FilterStats {
    pub fn total(&self) -> usize {
        self.class_not_accepted + self.low_confidence + self.invalid
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Result of processing one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// In observation order. Every candidate's track is now pending.
    pub candidates: Vec<NewCrossing>,
    pub filtered: FilterStats,
}

/// Stateful line crossing detector. One instance per video stream.
pub struct CrossingDetector {
    settings: DetectorSettings,
    tracks: FxHashMap<TrackId, TrackState>,
    last_sweep: Option<Timestamp>,
}

impl CrossingDetector {
    pub fn new(settings: DetectorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            tracks: FxHashMap::default(),
            last_sweep: None,
        })
    }

    pub fn from_config(config: &CountingConfig) -> Result<Self, ConfigError> {
        Self::new(DetectorSettings::from_config(config)?)
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Process one frame's observations captured at `now`.
    pub fn process(
        &mut self,
        frame_height: u32,
        observations: &[Observation],
        now: Timestamp,
    ) -> FrameOutcome {
        self.sweep_expired(now);

        let line = CountingLine::for_frame(
            self.settings.line_position,
            self.settings.line_offset,
            frame_height,
        );
        let mut outcome = FrameOutcome::default();

        for obs in observations {
            if !self.settings.accepted_classes.contains(&obs.class_id) {
                outcome.filtered.class_not_accepted += 1;
                continue;
            }
            let vehicle_class = match obs.validate() {
                Ok(class) => class,
                Err(e) => {
                    tracing::trace!(error = %e, "filtered observation");
                    outcome.filtered.invalid += 1;
                    continue;
                }
            };
            if obs.confidence < self.settings.min_confidence {
                outcome.filtered.low_confidence += 1;
                continue;
            }

            let state = self
                .tracks
                .entry(obs.track_id)
                .or_insert_with(|| TrackState::new(now));

            if state.is_counted() {
                state.last_seen = now;
                continue;
            }

            let center_y = f64::from(obs.center_y);
            let side = line.side(center_y);
            let crosses = if side == LineSide::InBand {
                rule_satisfied(self.settings.rule, self.settings.direction, &line, state, center_y)
            } else {
                left_band_past_line(self.settings.rule, &line, state, center_y)
            };

            let previous_side = state.last_seen_side;
            let previous_center_y = state.last_center_y;
            let previous_band_entry_y = state.band_entry_y;
            state.observe(side, center_y, crosses, now);

            if crosses {
                state.mark_pending(previous_side, previous_center_y, previous_band_entry_y);
                tracing::debug!(
                    track_id = %obs.track_id,
                    class = vehicle_class.as_str(),
                    center_y,
                    line_y = line.line_y(),
                    "crossing candidate"
                );
                outcome.candidates.push(NewCrossing {
                    timestamp: now,
                    vehicle_class,
                    track_id: obs.track_id,
                    confidence: obs.confidence,
                });
            }
        }

        outcome
    }

    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutcome {
        self.process(frame.frame_height, &frame.observations, frame.timestamp)
    }

    /// Make a pending candidate final after its event was persisted.
    pub fn confirm(&mut self, track_id: TrackId) -> bool {
        self.tracks
            .get_mut(&track_id)
            .is_some_and(TrackState::confirm)
    }

    /// Undo a pending candidate whose event could not be persisted.
    pub fn revert(&mut self, track_id: TrackId) -> bool {
        self.tracks
            .get_mut(&track_id)
            .is_some_and(TrackState::revert)
    }

    /// Pending or counted.
    pub fn is_counted(&self, track_id: TrackId) -> bool {
        self.tracks
            .get(&track_id)
            .is_some_and(TrackState::is_counted)
    }

    pub fn track(&self, track_id: TrackId) -> Option<&TrackState> {
        self.tracks.get(&track_id)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Forget every track. Previously counted ids may be counted again.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.last_sweep = None;
    }

    /// Drop tracks unseen for longer than the TTL. Runs at most once per
    /// half-TTL; pending tracks are kept.
    fn sweep_expired(&mut self, now: Timestamp) {
        let Some(ttl) = self.settings.track_ttl_seconds else {
            return;
        };
        match self.last_sweep {
            Some(last) if now.secs_since(last) < ttl / 2.0 => return,
            Some(_) => {}
            None => {
                self.last_sweep = Some(now);
                return;
            }
        }
        self.last_sweep = Some(now);

        let before = self.tracks.len();
        self.tracks
            .retain(|_, state| state.is_pending() || now.secs_since(state.last_seen) <= ttl);
        let evicted = before - self.tracks.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.tracks.len(), "evicted stale tracks");
        }
    }
}

/// A `line_in_band` track seen in the band short of the line, and now
/// outside the band beyond it, crossed between the two sightings.
fn left_band_past_line(
    rule: CrossingRule,
    line: &CountingLine,
    state: &TrackState,
    center_y: f64,
) -> bool {
    rule == CrossingRule::LineInBand
        && state
            .band_entry_y
            .is_some_and(|entry| line.reached_between(entry, center_y))
}

fn rule_satisfied(
    rule: CrossingRule,
    direction: CrossingDirection,
    line: &CountingLine,
    state: &TrackState,
    center_y: f64,
) -> bool {
    match rule {
        CrossingRule::Band => true,
        CrossingRule::LineInBand => match state.last_center_y {
            None => true,
            Some(previous) => line.reached_between(previous, center_y),
        },
        CrossingRule::Directional => match direction {
            CrossingDirection::Downward => state.seen_above && center_y >= line.line_y(),
            CrossingDirection::Upward => state.seen_below && center_y <= line.line_y(),
        },
    }
}
