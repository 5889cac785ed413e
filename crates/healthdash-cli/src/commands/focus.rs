use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Args;
use healthdash_core::breathing::FocusTimer;
use healthdash_core::{AppState, Config, Event, Ticker};
use tokio::sync::mpsc;
use tracing::info;

use super::{block_on, CliResult};

#[derive(Args)]
pub struct FocusArgs {
    /// Countdown length in minutes; defaults to config
    #[arg(long)]
    pub minutes: Option<u32>,
    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", hide = true)]
    pub period_ms: u64,
}

pub fn run(args: FocusArgs) -> CliResult {
    let mut app = AppState::new(&Config::load_or_default());
    if let Some(minutes) = args.minutes {
        app.set_focus_minutes(minutes);
    }
    let timer = app.focus();
    if timer.lock().map_err(|e| e.to_string())?.total_secs() == 0 {
        return Err("focus length must be at least one minute".into());
    }
    block_on(countdown(timer, Duration::from_millis(args.period_ms.max(1))))?
}

async fn countdown(timer: Arc<Mutex<FocusTimer>>, period: Duration) -> CliResult {
    {
        let mut timer = timer.lock().map_err(|e| e.to_string())?;
        if let Some(event) = timer.start() {
            println!("{}", serde_json::to_string(&event)?);
        }
        info!(clock = %timer.clock(), "focus started");
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = Ticker::spawn(Arc::clone(&timer), period, tx);
    while let Some(event) = rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
        if matches!(event, Event::FocusCompleted { .. }) {
            break;
        }
    }
    ticker.stop().await;
    Ok(())
}
