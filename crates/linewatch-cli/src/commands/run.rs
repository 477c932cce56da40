//! `linewatch run`: feed tracker frames through the counting pipeline.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use linewatch_analysis::CountingPipeline;
use linewatch_core::config::CliOverrides;
use linewatch_core::errors::ErrorCode;
use linewatch_core::traits::CrossingLog;
use linewatch_core::types::{Frame, FrameRecord};

use crate::sink::JsonLineSink;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON-lines frame file, or `-` for stdin
    #[arg(long, value_name = "FILE", default_value = "-")]
    input: String,

    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Counting line as a fraction of frame height
    #[arg(long, value_name = "F")]
    line_position: Option<f64>,

    /// Crossings inside the window that trigger an alert
    #[arg(long, value_name = "N")]
    threshold: Option<u64>,

    /// Minimum seconds between two alerts
    #[arg(long, value_name = "F")]
    cooldown_seconds: Option<f64>,

    /// Trailing window length in minutes
    #[arg(long, value_name = "N")]
    window_minutes: Option<u32>,
}

/// Totals for one run, logged at the end.
#[derive(Debug, Default)]
struct RunTotals {
    frames: u64,
    malformed: u64,
    failed: u64,
}

pub fn run(root: &Path, args: RunArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        db_path: args.db.map(|p| p.display().to_string()),
        line_position: args.line_position,
        alert_threshold: args.threshold,
        window_minutes: args.window_minutes,
        cooldown_seconds: args.cooldown_seconds,
    };
    let config = super::load_config(root, &overrides)?;
    let store = Arc::new(super::open_store(&config)?);
    store.initialize()?;

    let mut pipeline = CountingPipeline::new(&config, Arc::clone(&store))?;
    let sink = Arc::new(JsonLineSink::new(io::stdout()));
    pipeline.register_handler(sink.clone());

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    tracing::info!(
        db = %config.storage.effective_db_path().display(),
        input = %args.input,
        "counting started"
    );

    let mut totals = RunTotals::default();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("reading input line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: Frame = match serde_json::from_str::<FrameRecord>(&line) {
            Ok(record) => record.into(),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed frame");
                totals.malformed += 1;
                continue;
            }
        };
        totals.frames += 1;

        if let Err(e) = pipeline.process_frame(&frame) {
            tracing::warn!(
                line = line_no,
                error = %e.coded_string(),
                "frame failed"
            );
            totals.failed += 1;
        }
    }

    if let Err(e) = store.checkpoint() {
        tracing::warn!(error = %e, "final checkpoint failed");
    }

    tracing::info!(
        frames = totals.frames,
        malformed = totals.malformed,
        failed = totals.failed,
        crossings = sink.crossings_recorded(),
        alerts = sink.alerts_written(),
        tracks = pipeline.detector().track_count(),
        "counting finished"
    );
    Ok(())
}
