use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::Phase;

/// Every state change in the dashboard produces an Event.
/// The CLI prints them; tickers forward them over a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BreathingStarted {
        pattern: String,
        phase: Phase,
        secs_remaining: u32,
        at: DateTime<Utc>,
    },
    BreathingPaused {
        phase: Phase,
        secs_remaining: u32,
        at: DateTime<Utc>,
    },
    BreathingReset {
        pattern: String,
        at: DateTime<Utc>,
    },
    /// The breathing session moved into a new phase.
    PhaseChanged {
        from: Phase,
        to: Phase,
        secs_remaining: u32,
        at: DateTime<Utc>,
    },
    FocusStarted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    FocusPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    FocusCompleted {
        total_secs: u32,
        at: DateTime<Utc>,
    },
    FocusReset {
        total_secs: u32,
        at: DateTime<Utc>,
    },
    ActivityLogged {
        id: String,
        kind: String,
        at: DateTime<Utc>,
    },
    WearableSynced {
        count: usize,
        at: DateTime<Utc>,
    },
    /// A view was left; its timers were stopped.
    ViewLeft {
        tab: String,
        at: DateTime<Utc>,
    },
}
