//! Streak and goal-progress derivations.
//!
//! Everything here is a pure function of the activity log, profile and
//! stats. There is no I/O and nothing is cached; callers recompute after
//! every change.

mod goals;
mod streak;

pub use goals::{
    flame_size, manual_step_bonus, step_progress_pct, streak_headline, streak_message,
    synced_step_bonus, PersonalBests, ProgressReport,
};
pub use streak::{
    active_dates, streak_days, summarize, summarize_local, week_calendar, DayMark, StreakSummary,
    CALENDAR_DAYS,
};
