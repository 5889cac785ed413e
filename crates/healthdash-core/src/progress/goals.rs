//! Goal progress and the small derived figures shown next to the streak.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityEntry;
use crate::profile::{UserProfile, UserStats};

/// Steps credited for a manual walking entry.
pub const WALKING_STEP_BONUS: u32 = 2_000;
/// Steps credited for any other manual entry.
pub const DEFAULT_STEP_BONUS: u32 = 500;
/// Steps per synced minute.
pub const SYNCED_STEPS_PER_MIN: u32 = 50;

/// Steps vs. goal, 0..=100, rounded.
pub fn step_progress_pct(steps: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 0;
    }
    let pct = (f64::from(steps) / f64::from(goal) * 100.0).round();
    pct.min(100.0) as u32
}

/// Icon size for the streak flame: grows 4px per day, capped at 64.
pub fn flame_size(streak: u32) -> u32 {
    streak.saturating_mul(4).saturating_add(24).min(64)
}

pub fn streak_headline(streak: u32) -> &'static str {
    match streak {
        0 => "Start your journey!",
        1 | 2 => "Off to a great start!",
        _ => "You're on fire!",
    }
}

pub fn streak_message(streak: u32) -> String {
    if streak == 0 {
        "Complete a workout today to start your first streak.".to_string()
    } else {
        format!("Keep it up! You've been active for {streak} days in a row.")
    }
}

/// Steps to credit for a manually logged activity of `kind`.
pub fn manual_step_bonus(kind: &str) -> u32 {
    if kind.contains("Walking") {
        WALKING_STEP_BONUS
    } else {
        DEFAULT_STEP_BONUS
    }
}

/// Steps to credit for a synced batch.
pub fn synced_step_bonus(batch: &[ActivityEntry]) -> u32 {
    batch
        .iter()
        .map(|a| a.duration_min.saturating_mul(SYNCED_STEPS_PER_MIN))
        .fold(0u32, u32::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBests {
    pub longest_workout_min: u32,
    pub calorie_peak: u32,
    pub max_streak: u32,
}

impl PersonalBests {
    pub fn derive(activities: &[ActivityEntry], streak: u32) -> Self {
        Self {
            longest_workout_min: activities.iter().map(|a| a.duration_min).max().unwrap_or(0),
            calorie_peak: activities.iter().map(|a| a.calories).max().unwrap_or(0),
            max_streak: streak,
        }
    }
}

/// Everything the dashboard header needs, computed from current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub step_progress_pct: u32,
    pub bmi: Option<f64>,
    pub bmi_category: Option<String>,
    pub flame_size: u32,
    pub headline: String,
    pub message: String,
    pub bests: PersonalBests,
}

impl ProgressReport {
    pub fn build(
        profile: &UserProfile,
        stats: &UserStats,
        activities: &[ActivityEntry],
        streak: u32,
    ) -> Self {
        Self {
            step_progress_pct: step_progress_pct(stats.steps, profile.daily_step_goal),
            bmi: profile.bmi(),
            bmi_category: profile.bmi_category().map(|c| c.label().to_string()),
            flame_size: flame_size(streak),
            headline: streak_headline(streak).to_string(),
            message: streak_message(streak),
            bests: PersonalBests::derive(activities, streak),
        }
    }
}
