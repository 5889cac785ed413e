//! Breathing session state machine.
//!
//! Like the focus timer, the session has no internal thread: the owner
//! calls `tick()` once per elapsed second (see [`crate::ticker`]).
//!
//! ## Phase cycle
//!
//! ```text
//! Inhale -> [Hold] -> Exhale -> [Pause] -> Inhale ...
//! ```
//!
//! `Hold` is skipped when `hold1_secs == 0`, `Pause` when `hold2_secs == 0`.
//! There is no terminal state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::pattern::BreathingPattern;
use crate::events::Event;
use crate::ticker::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Pause,
}

impl Phase {
    /// Instruction shown while the phase is active.
    pub fn guidance(&self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in",
            Phase::Hold => "Hold",
            Phase::Exhale => "Breathe out",
            Phase::Pause => "Rest",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingSession {
    pattern: BreathingPattern,
    phase: Phase,
    secs_remaining: u32,
    running: bool,
}

impl BreathingSession {
    /// New session at `(Inhale, inhale_secs)`, not running.
    pub fn new(pattern: BreathingPattern) -> Self {
        let secs_remaining = pattern.inhale_secs;
        Self {
            pattern,
            phase: Phase::Inhale,
            secs_remaining,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn secs_remaining(&self) -> u32 {
        self.secs_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Configured length of `phase` under the current pattern.
    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.pattern.inhale_secs,
            Phase::Hold => self.pattern.hold1_secs,
            Phase::Exhale => self.pattern.exhale_secs,
            Phase::Pause => self.pattern.hold2_secs,
        }
    }

    /// 0.0 .. 1.0 through the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_secs(self.phase);
        if total == 0 {
            return 1.0;
        }
        1.0 - (f64::from(self.secs_remaining.min(total)) / f64::from(total))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::BreathingStarted {
            pattern: self.pattern.name.clone(),
            phase: self.phase,
            secs_remaining: self.secs_remaining,
            at: Utc::now(),
        })
    }

    /// Stop ticking; phase and remaining time are kept.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::BreathingPaused {
            phase: self.phase,
            secs_remaining: self.secs_remaining,
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
        self.phase = Phase::Inhale;
        self.secs_remaining = self.pattern.inhale_secs;
        self.running = false;
        Some(Event::BreathingReset {
            pattern: self.pattern.name.clone(),
            at: Utc::now(),
        })
    }

    /// Switch pattern; always resets so no stale remaining time survives.
    pub fn set_pattern(&mut self, pattern: BreathingPattern) -> Option<Event> {
        self.pattern = pattern;
        self.reset()
    }

    /// Advance one second. Returns `PhaseChanged` when the phase flips.
    pub fn advance(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.secs_remaining > 1 {
            self.secs_remaining -= 1;
            return None;
        }
        let from = self.phase;
        self.phase = self.next_phase();
        self.secs_remaining = self.phase_secs(self.phase);
        Some(Event::PhaseChanged {
            from,
            to: self.phase,
            secs_remaining: self.secs_remaining,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn next_phase(&self) -> Phase {
        match self.phase {
            Phase::Inhale if self.pattern.hold1_secs > 0 => Phase::Hold,
            Phase::Inhale | Phase::Hold => Phase::Exhale,
            Phase::Exhale if self.pattern.hold2_secs > 0 => Phase::Pause,
            Phase::Exhale | Phase::Pause => Phase::Inhale,
        }
    }
}

impl Default for BreathingSession {
    fn default() -> Self {
        Self::new(BreathingPattern::default())
    }
}

impl Tick for BreathingSession {
    fn tick(&mut self) -> Option<Event> {
        self.advance()
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(s: &BreathingSession) -> (Phase, u32) {
        (s.phase(), s.secs_remaining())
    }

    fn ticks(s: &mut BreathingSession, n: usize) {
        for _ in 0..n {
            s.advance();
        }
    }

    #[test]
    fn starts_idle_at_inhale() {
        let s = BreathingSession::new(BreathingPattern::relax_478());
        assert_eq!(state(&s), (Phase::Inhale, 4));
        assert!(!s.is_running());
    }

    #[test]
    fn tick_while_paused_is_noop() {
        let mut s = BreathingSession::default();
        assert!(s.advance().is_none());
        assert_eq!(state(&s), (Phase::Inhale, 4));
    }

    #[test]
    fn box_cycle_returns_to_start_after_sixteen_ticks() {
        let mut s = BreathingSession::default();
        s.start();
        ticks(&mut s, 4);
        assert_eq!(state(&s), (Phase::Hold, 4));
        ticks(&mut s, 4);
        assert_eq!(state(&s), (Phase::Exhale, 4));
        ticks(&mut s, 4);
        assert_eq!(state(&s), (Phase::Pause, 4));
        ticks(&mut s, 4);
        assert_eq!(state(&s), (Phase::Inhale, 4));
    }

    #[test]
    fn decrements_within_phase() {
        let mut s = BreathingSession::default();
        s.start();
        assert!(s.advance().is_none());
        assert_eq!(state(&s), (Phase::Inhale, 3));
    }

    #[test]
    fn relax_pattern_skips_pause() {
        let mut s = BreathingSession::new(BreathingPattern::relax_478());
        s.start();
        ticks(&mut s, 4);
        assert_eq!(state(&s), (Phase::Hold, 7));
        ticks(&mut s, 7);
        assert_eq!(state(&s), (Phase::Exhale, 8));
        ticks(&mut s, 8);
        assert_eq!(state(&s), (Phase::Inhale, 4));
    }

    #[test]
    fn phase_change_event_reports_transition() {
        let mut s = BreathingSession::new(BreathingPattern::deep_calm());
        s.start();
        ticks(&mut s, 4);
        match s.advance() {
            Some(Event::PhaseChanged { from, to, secs_remaining, .. }) => {
                assert_eq!(from, Phase::Inhale);
                assert_eq!(to, Phase::Exhale);
                assert_eq!(secs_remaining, 5);
            }
            other => panic!("expected PhaseChanged, got {other:?}"),
        }
    }

    #[test]
    fn pause_and_resume_keep_position() {
        let mut s = BreathingSession::default();
        s.start();
        ticks(&mut s, 6);
        assert!(s.pause().is_some());
        ticks(&mut s, 10);
        assert_eq!(state(&s), (Phase::Hold, 2));
        assert!(s.toggle().is_some());
        assert!(s.is_running());
        ticks(&mut s, 2);
        assert_eq!(state(&s), (Phase::Exhale, 4));
    }

    #[test]
    fn reset_from_any_phase() {
        let mut s = BreathingSession::default();
        s.start();
        ticks(&mut s, 13);
        assert_eq!(s.phase(), Phase::Pause);
        s.reset();
        assert_eq!(state(&s), (Phase::Inhale, 4));
        assert!(!s.is_running());
    }

    #[test]
    fn pattern_change_resets_to_new_pattern() {
        let mut s = BreathingSession::default();
        s.start();
        ticks(&mut s, 5);
        s.set_pattern(BreathingPattern::deep_calm());
        assert_eq!(state(&s), (Phase::Inhale, 5));
        assert!(!s.is_running());
        assert_eq!(s.pattern().name, "Deep Calm");
    }

    #[test]
    fn all_zero_pattern_still_moves_each_tick() {
        let mut s = BreathingSession::new(BreathingPattern::new("Null", 0, 0, 0, 0));
        s.start();
        s.advance();
        assert_eq!(state(&s), (Phase::Exhale, 0));
        s.advance();
        assert_eq!(state(&s), (Phase::Inhale, 0));
    }

    #[test]
    fn progress_through_phase() {
        let mut s = BreathingSession::default();
        assert_eq!(s.phase_progress(), 0.0);
        s.start();
        ticks(&mut s, 2);
        assert!((s.phase_progress() - 0.5).abs() < f64::EPSILON);
    }
}
