pub mod ai;
pub mod breathe;
pub mod config;
pub mod focus;
pub mod media;
pub mod profile;
pub mod streak;
pub mod sync;

use std::future::Future;
use std::path::Path;

use healthdash_core::ActivityLog;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Run `future` to completion on a fresh single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Activities from a JSON file (array of entries, newest first), or an empty log.
pub fn load_activities(path: Option<&Path>) -> Result<ActivityLog, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ActivityLog::new());
    };
    let text = std::fs::read_to_string(path)?;
    Ok(ActivityLog::from_json(&text)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
