use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use healthdash_core::breathing::{BreathingPattern, BreathingSession, Phase};
use healthdash_core::{Config, Event, Ticker};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{block_on, print_json, CliResult};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// List the available breathing patterns
    Patterns,
    /// Run a guided session, printing each phase change
    Run {
        /// Pattern name or key ("box", "478", "calm"); defaults to config
        #[arg(long)]
        pattern: Option<String>,
        /// Number of full cycles before stopping
        #[arg(long, default_value = "1")]
        cycles: u32,
        /// Tick period in milliseconds
        #[arg(long, default_value = "1000", hide = true)]
        period_ms: u64,
    },
}

#[derive(Serialize)]
struct PatternRow {
    name: String,
    timing: String,
    cycle_secs: u32,
}

pub fn run(action: BreatheAction) -> CliResult {
    match action {
        BreatheAction::Patterns => {
            let rows: Vec<PatternRow> = BreathingPattern::catalog()
                .into_iter()
                .map(|p| PatternRow {
                    timing: p.timing_label(),
                    cycle_secs: p.cycle_secs(),
                    name: p.name,
                })
                .collect();
            print_json(&rows)
        }
        BreatheAction::Run {
            pattern,
            cycles,
            period_ms,
        } => {
            let pattern = match pattern {
                Some(key) => BreathingPattern::find(&key)
                    .ok_or_else(|| format!("unknown pattern: {key}"))?,
                None => Config::load_or_default().breathing_pattern(),
            };
            if pattern.cycle_secs() == 0 {
                return Err(format!("pattern '{}' has no duration", pattern.name).into());
            }
            block_on(session(pattern, cycles, Duration::from_millis(period_ms.max(1))))?
        }
    }
}

async fn session(pattern: BreathingPattern, cycles: u32, period: Duration) -> CliResult {
    let session = Arc::new(Mutex::new(BreathingSession::new(pattern)));
    let started = session.lock().map_err(|e| e.to_string())?.start();
    if let Some(event) = started {
        println!("{}", serde_json::to_string(&event)?);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = Ticker::spawn(Arc::clone(&session), period, tx);
    let mut completed = 0;
    while completed < cycles {
        let Some(event) = rx.recv().await else { break };
        if let Event::PhaseChanged { to, .. } = &event {
            println!("{}  {}", serde_json::to_string(&event)?, to.guidance());
            if *to == Phase::Inhale {
                completed += 1;
            }
        }
    }
    ticker.stop().await;
    Ok(())
}
