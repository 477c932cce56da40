//! `linewatch init`: create or upgrade the crossing log.

use std::path::{Path, PathBuf};

use clap::Args;
use linewatch_core::config::CliOverrides;
use linewatch_core::traits::CrossingLog;
use linewatch_storage::migrations;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

pub fn run(root: &Path, args: InitArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        db_path: args.db.map(|p| p.display().to_string()),
        ..CliOverrides::default()
    };
    let config = super::load_config(root, &overrides)?;
    let store = super::open_store(&config)?;
    store.initialize()?;

    let version = store
        .database()
        .with_reader(migrations::current_version)?;
    println!(
        "Crossing log ready: {} (schema v{version}, {} events)",
        config.storage.effective_db_path().display(),
        store.count_total()?
    );
    Ok(())
}
