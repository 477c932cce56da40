//! Per-track state owned by the crossing detector.

use linewatch_core::types::Timestamp;

use super::band::LineSide;

/// Counting progress of one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountState {
    Uncounted,
    /// Candidate handed out, persistence not yet confirmed. Holds the
    /// position before the counting sighting so a revert can restore it.
    Pending {
        previous_side: LineSide,
        previous_center_y: Option<f64>,
        previous_band_entry_y: Option<f64>,
    },
    Counted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    pub last_seen_side: LineSide,
    pub last_center_y: Option<f64>,
    /// Latest in-band centre from which the line was not yet reached. Cleared
    /// once the track leaves the band.
    pub band_entry_y: Option<f64>,
    pub seen_above: bool,
    pub seen_below: bool,
    pub count_state: CountState,
    pub last_seen: Timestamp,
}

impl TrackState {
    pub fn new(now: Timestamp) -> Self {
        Self {
            last_seen_side: LineSide::Unknown,
            last_center_y: None,
            band_entry_y: None,
            seen_above: false,
            seen_below: false,
            count_state: CountState::Uncounted,
            last_seen: now,
        }
    }

    /// Pending and counted tracks never produce another candidate.
    pub fn is_counted(&self) -> bool {
        !matches!(self.count_state, CountState::Uncounted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.count_state, CountState::Pending { .. })
    }

    /// Record a sighting at `center_y`. `counts` is whether this sighting
    /// produced a candidate.
    pub(crate) fn observe(&mut self, side: LineSide, center_y: f64, counts: bool, now: Timestamp) {
        match side {
            LineSide::Above => self.seen_above = true,
            LineSide::Below => self.seen_below = true,
            LineSide::InBand | LineSide::Unknown => {}
        }
        self.band_entry_y = (side == LineSide::InBand && !counts).then_some(center_y);
        self.last_seen_side = side;
        self.last_center_y = Some(center_y);
        self.last_seen = now;
    }

    /// Mark pending, remembering the position before the current sighting.
    pub(crate) fn mark_pending(
        &mut self,
        previous_side: LineSide,
        previous_center_y: Option<f64>,
        previous_band_entry_y: Option<f64>,
    ) {
        self.count_state = CountState::Pending {
            previous_side,
            previous_center_y,
            previous_band_entry_y,
        };
    }

    /// Pending → Counted. Returns false if the track was not pending.
    pub(crate) fn confirm(&mut self) -> bool {
        if self.is_pending() {
            self.count_state = CountState::Counted;
            true
        } else {
            false
        }
    }

    /// Pending → Uncounted, restoring the pre-candidate position.
    pub(crate) fn revert(&mut self) -> bool {
        match self.count_state {
            CountState::Pending {
                previous_side,
                previous_center_y,
                previous_band_entry_y,
            } => {
                self.last_seen_side = previous_side;
                self.last_center_y = previous_center_y;
                self.band_entry_y = previous_band_entry_y;
                self.count_state = CountState::Uncounted;
                true
            }
            _ => false,
        }
    }
}
