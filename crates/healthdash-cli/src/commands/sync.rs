use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use healthdash_core::{AppState, Config, SimulatedWearable, WearableSource};
use serde_json::json;
use tracing::info;

use super::{block_on, load_activities, print_json, CliResult};

#[derive(Args)]
pub struct SyncArgs {
    /// JSON activity log to sync into
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Seed for reproducible batches
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the simulated device delay
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub fn run(args: SyncArgs) -> CliResult {
    let config = Config::load_or_default();
    let activities = load_activities(args.file.as_deref())?;
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.sync.delay_ms));
    let wearable = match args.seed {
        Some(seed) => SimulatedWearable::seeded(delay, seed),
        None => SimulatedWearable::new(delay),
    };

    let batch = block_on(wearable.sync())??;
    let mut app = AppState::new(&config).with_activities(activities);
    let steps_before = app.stats.steps;
    let event = app.add_synced(batch.clone(), Utc::now());
    info!(event = %serde_json::to_string(&event)?, "wearable synced");

    if let Some(path) = &args.file {
        std::fs::write(path, app.activities().to_json()?)?;
    }
    print_json(&json!({
        "synced": batch,
        "steps_added": app.stats.steps - steps_before,
        "streak": app.streak_summary(&chrono::Local::now()).streak,
    }))
}
