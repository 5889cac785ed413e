//! Active-day streak and the trailing 7-day calendar.
//!
//! Dates are *local* calendar days: two workouts at 23:30 and 00:30 count as
//! two days even though they are an hour apart. The timezone is a parameter
//! so callers (and tests) decide what "local" means.
//!
//! The streak is the number of distinct active days ever logged. It is not
//! reset by a gap, so three workouts a week apart still give a streak of 3.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityEntry;

/// Number of days shown in the activity calendar.
pub const CALENDAR_DAYS: usize = 7;

/// One cell of the 7-day activity calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMark {
    pub date: NaiveDate,
    /// Short weekday name ("Mon").
    pub label: String,
    pub active: bool,
    pub is_today: bool,
}

/// Streak plus calendar, recomputed whenever the activity log changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub streak: u32,
    pub calendar: Vec<DayMark>,
}

/// Distinct local dates carrying at least one activity.
pub fn active_dates<Tz: TimeZone>(activities: &[ActivityEntry], tz: &Tz) -> BTreeSet<NaiveDate> {
    activities
        .iter()
        .map(|a| a.occurred_at().with_timezone(tz).date_naive())
        .collect()
}

/// Count of distinct local days with any activity. Empty input gives 0.
pub fn streak_days<Tz: TimeZone>(activities: &[ActivityEntry], tz: &Tz) -> u32 {
    active_dates(activities, tz).len() as u32
}

/// Trailing calendar ending at `today`, oldest first.
pub fn week_calendar<Tz: TimeZone>(
    activities: &[ActivityEntry],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayMark> {
    let active = active_dates(activities, tz);
    (0..CALENDAR_DAYS as i64)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DayMark {
                date,
                label: date.format("%a").to_string(),
                active: active.contains(&date),
                is_today: back == 0,
            }
        })
        .collect()
}

/// Streak and calendar as seen at `now` in `now`'s timezone.
pub fn summarize<Tz: TimeZone>(activities: &[ActivityEntry], now: &DateTime<Tz>) -> StreakSummary {
    let tz = now.timezone();
    StreakSummary {
        streak: streak_days(activities, &tz),
        calendar: week_calendar(activities, now.date_naive(), &tz),
    }
}

/// [`summarize`] against the machine's local clock.
pub fn summarize_local(activities: &[ActivityEntry]) -> StreakSummary {
    summarize(activities, &chrono::Local::now())
}
