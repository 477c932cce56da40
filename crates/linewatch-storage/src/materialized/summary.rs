//! Traffic summary: the read model behind `linewatch stats`.

use linewatch_core::constants::FLOW_HISTORY_MINUTES;
use linewatch_core::errors::StorageError;
use linewatch_core::types::{CrossingEvent, Timestamp};
use rusqlite::Connection;
use serde::Serialize;

use crate::queries::crossings::{self, ClassCount, FlowBucket};

/// Snapshot of the crossing log as seen at `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub generated_at: Timestamp,
    pub total_crossings: u64,
    pub window_minutes: u32,
    /// Crossings with `timestamp > generated_at - window_minutes * 60`.
    pub window_count: u64,
    /// `window_count` divided by the window length in minutes.
    pub flow_rate_per_minute: f64,
    /// `None` when the log is empty.
    pub most_common_class: Option<String>,
    pub class_distribution: Vec<ClassCount>,
    /// Per-minute counts over the last hour, oldest first.
    pub flow_history: Vec<FlowBucket>,
    /// Newest first.
    pub recent: Vec<CrossingEvent>,
}

/// Build a summary. Runs inside one read transaction so every figure comes
/// from the same snapshot.
pub fn build_summary(
    conn: &Connection,
    now: Timestamp,
    window_minutes: u32,
    recent_limit: usize,
) -> Result<TrafficSummary, StorageError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| crate::unavailable("begin summary read", e))?;
    let conn: &Connection = &tx;

    let total_crossings = crossings::count_total(conn)?;
    let window_count =
        crossings::count_since(conn, now.minus_secs(f64::from(window_minutes) * 60.0))?;
    let class_distribution = crossings::class_distribution(conn, None)?;
    let flow_history = crossings::flow_per_minute(
        conn,
        now.minus_secs(f64::from(FLOW_HISTORY_MINUTES) * 60.0),
    )?;
    let recent = crossings::query_recent(conn, recent_limit)?;

    let flow_rate_per_minute = if window_minutes == 0 {
        0.0
    } else {
        window_count as f64 / f64::from(window_minutes)
    };

    Ok(TrafficSummary {
        generated_at: now,
        total_crossings,
        window_minutes,
        window_count,
        flow_rate_per_minute,
        most_common_class: class_distribution.first().map(|c| c.vehicle_class.clone()),
        class_distribution,
        flow_history,
        recent,
    })
}
