//! `linewatch stats`: traffic summary of the crossing log.

use std::path::{Path, PathBuf};

use clap::Args;
use linewatch_core::config::CliOverrides;
use linewatch_core::constants::DEFAULT_RECENT_LIMIT;
use linewatch_core::types::Timestamp;
use linewatch_storage::TrafficSummary;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Number of recent crossings to list
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    recent: usize,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the resolved configuration as TOML instead of the summary
    #[arg(long)]
    show_config: bool,
}

pub fn run(root: &Path, args: StatsArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        db_path: args.db.map(|p| p.display().to_string()),
        ..CliOverrides::default()
    };
    let config = super::load_config(root, &overrides)?;
    if args.show_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    let store = super::open_store(&config)?;

    let summary = store.summary(
        Timestamp::now(),
        config.alert.effective_window_minutes(),
        args.recent,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}

fn render(summary: &TrafficSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total crossings:    {}\n", summary.total_crossings));
    out.push_str(&format!(
        "Last {} min:         {} ({:.1}/min)\n",
        summary.window_minutes, summary.window_count, summary.flow_rate_per_minute
    ));
    out.push_str(&format!(
        "Most common class:  {}\n",
        summary.most_common_class.as_deref().unwrap_or("-")
    ));

    if !summary.class_distribution.is_empty() {
        out.push_str("\nBy class:\n");
        for entry in &summary.class_distribution {
            out.push_str(&format!("  {:<12} {}\n", entry.vehicle_class, entry.count));
        }
    }

    if !summary.flow_history.is_empty() {
        out.push_str("\nLast hour, per minute:\n");
        for bucket in &summary.flow_history {
            out.push_str(&format!("  {}  {}\n", bucket.minute_start, bucket.count));
        }
    }

    if !summary.recent.is_empty() {
        out.push_str("\nRecent crossings:\n");
        for event in &summary.recent {
            out.push_str(&format!(
                "  #{:<6} {}  {:<10} track {:<6} conf {:.2}\n",
                event.event_id,
                event.timestamp,
                event.vehicle_class,
                event.track_id,
                event.confidence
            ));
        }
    }
    out
}
