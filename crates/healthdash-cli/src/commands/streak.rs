use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::Args;
use healthdash_core::{ActivityPreset, AppState, Config, NewActivity};
use serde_json::json;
use tracing::info;

use super::{load_activities, print_json, CliResult};

#[derive(Args)]
pub struct StreakArgs {
    /// JSON file with logged activities (newest first)
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Log an activity now, as KIND:MINUTES (repeatable)
    #[arg(long = "log", value_name = "KIND:MINUTES")]
    pub log: Vec<String>,
    /// Write the resulting activity log back to --file
    #[arg(long, requires = "file")]
    pub save: bool,
}

fn parse_log(arg: &str) -> Result<NewActivity, String> {
    let (kind, minutes) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:MINUTES, got '{arg}'"))?;
    let duration_min: u32 = minutes
        .trim()
        .parse()
        .map_err(|e| format!("bad minutes in '{arg}': {e}"))?;
    let kind = kind.trim();
    let preset = ActivityPreset::find(kind);
    Ok(NewActivity {
        kind: preset.map_or_else(|| kind.to_string(), |p| p.kind.to_string()),
        duration_min,
        calories: preset.map_or(duration_min.saturating_mul(7), |p| p.estimate_calories(duration_min)),
    })
}

pub fn run(args: StreakArgs) -> CliResult {
    let activities = load_activities(args.file.as_deref())?;
    let mut app = AppState::new(&Config::load_or_default()).with_activities(activities);
    for arg in &args.log {
        let event = app.add_activity(parse_log(arg)?, Utc::now());
        info!(event = %serde_json::to_string(&event)?, "activity logged");
    }

    if args.save {
        if let Some(path) = &args.file {
            std::fs::write(path, app.activities().to_json()?)?;
        }
    }

    let now = Local::now();
    let summary = app.streak_summary(&now);
    let report = app.progress_report(&now);
    print_json(&json!({
        "streak": summary.streak,
        "calendar": summary.calendar,
        "steps": app.stats.steps,
        "report": report,
    }))
}
