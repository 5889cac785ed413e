//! Single-shot focus countdown used alongside the mental exercises.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::ticker::Tick;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    total_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl FocusTimer {
    pub fn new(minutes: u32) -> Self {
        let total_secs = minutes.saturating_mul(60);
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: false,
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Remaining time as `m:ss`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// No-op once the countdown has reached zero; reset first.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        Some(Event::FocusStarted {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::FocusPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.remaining_secs = self.total_secs;
        self.running = false;
        Some(Event::FocusReset {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Change the countdown length; resets the timer.
    pub fn set_minutes(&mut self, minutes: u32) -> Option<Event> {
        self.total_secs = minutes.saturating_mul(60);
        self.reset()
    }

    /// Count down one second; stops itself and reports completion at zero.
    pub fn advance(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return Some(Event::FocusCompleted {
                total_secs: self.total_secs,
                at: Utc::now(),
            });
        }
        None
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES)
    }
}

impl Tick for FocusTimer {
    fn tick(&mut self) -> Option<Event> {
        self.advance()
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// `seconds` as `m:ss` ("25:00", "0:07").
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
