//! Logged activities.
//!
//! Entries are immutable once created and kept newest-first. The core never
//! persists the log itself; callers may export it as a JSON array and load
//! it back with [`ActivityLog::from_json`].

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single logged or synced workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    /// Free-form label ("Running", "Cycling (Synced)").
    pub kind: String,
    pub duration_min: u32,
    pub calories: u32,
    /// Milliseconds since the Unix epoch.
    pub occurred_at_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<u32>,
}

impl ActivityEntry {
    /// Instant the activity occurred; out-of-range timestamps clamp to the epoch.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.occurred_at_ms)
            .single()
            .unwrap_or_default()
    }
}

/// The manual-log form: the log fills in `id` and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub kind: String,
    pub duration_min: u32,
    pub calories: u32,
}

impl Default for NewActivity {
    fn default() -> Self {
        Self {
            kind: "Running".into(),
            duration_min: 30,
            calories: 300,
        }
    }
}

/// Quick-pick entries offered by the activity logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityPreset {
    pub kind: &'static str,
    pub kcal_per_min: u32,
}

pub const ACTIVITY_PRESETS: [ActivityPreset; 5] = [
    ActivityPreset { kind: "Running", kcal_per_min: 10 },
    ActivityPreset { kind: "Walking", kcal_per_min: 4 },
    ActivityPreset { kind: "Cycling", kcal_per_min: 8 },
    ActivityPreset { kind: "Swimming", kcal_per_min: 11 },
    ActivityPreset { kind: "Yoga", kcal_per_min: 3 },
];

impl ActivityPreset {
    /// Case-insensitive lookup by kind.
    pub fn find(kind: &str) -> Option<&'static ActivityPreset> {
        ACTIVITY_PRESETS
            .iter()
            .find(|p| p.kind.eq_ignore_ascii_case(kind))
    }

    pub fn estimate_calories(&self, duration_min: u32) -> u32 {
        self.kcal_per_min.saturating_mul(duration_min)
    }
}

/// Insertion-ordered activity sequence, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from entries already in newest-first order.
    pub fn from_entries(entries: Vec<ActivityEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of entries, newest first.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<ActivityEntry> = serde_json::from_str(text)?;
        Ok(Self::from_entries(entries))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a manual entry at `now` and return a copy of it.
    pub fn log(&mut self, activity: NewActivity, now: DateTime<Utc>) -> ActivityEntry {
        let entry = ActivityEntry {
            id: uuid::Uuid::new_v4().to_string(),
            kind: activity.kind,
            duration_min: activity.duration_min,
            calories: activity.calories,
            occurred_at_ms: now.timestamp_millis(),
            avg_heart_rate: None,
        };
        self.entries.insert(0, entry.clone());
        entry
    }

    /// Prepend a batch (e.g. from a wearable), keeping the batch's own order.
    pub fn extend_front(&mut self, batch: Vec<ActivityEntry>) {
        self.entries.splice(0..0, batch);
    }

    /// Human summary used in diet prompts: "Running for 30 mins, Yoga for 20 mins".
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|a| format!("{} for {} mins", a.kind, a.duration_min))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
