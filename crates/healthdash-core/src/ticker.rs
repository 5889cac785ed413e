//! One-second scheduler for tick-driven state machines.
//!
//! State machines implement [`Tick`] and never look at the clock, so tests
//! drive them by calling `tick()` directly. In a running app a [`Ticker`]
//! owns the interval: it locks the target once per period, forwards any
//! event over a channel, and can be stopped at any point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::events::Event;

/// Period used by the breathing and focus views.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A state machine advanced by discrete one-second ticks.
pub trait Tick: Send + 'static {
    /// Apply one elapsed period. Must be a no-op while not running.
    fn tick(&mut self) -> Option<Event>;

    fn is_running(&self) -> bool;
}

/// Background interval driving a shared [`Tick`] target.
///
/// Dropping the ticker aborts the task.
pub struct Ticker {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn on the current tokio runtime. The first tick fires one
    /// `period` after spawning.
    pub fn spawn<T: Tick>(
        target: Arc<Mutex<T>>,
        period: Duration,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        debug!("ticker stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let event = {
                            let mut guard = match target.lock() {
                                Ok(guard) => guard,
                                Err(poisoned) => poisoned.into_inner(),
                            };
                            guard.tick()
                        };
                        trace!(?event, "tick");
                        if let Some(event) = event {
                            if events.send(event).is_err() {
                                debug!("event receiver dropped, ticker exiting");
                                break;
                            }
                        }
                    }
                }
            }
        });
        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the interval and wait for the task to exit.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breathing::{BreathingPattern, BreathingSession, FocusTimer, Phase};

    #[tokio::test(start_paused = true)]
    async fn drives_breathing_session_through_a_phase() {
        let session = Arc::new(Mutex::new(BreathingSession::new(BreathingPattern::deep_calm())));
        session.lock().unwrap().start();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(session.clone(), TICK_PERIOD, tx);

        let event = rx.recv().await.expect("phase change");
        assert!(matches!(event, Event::PhaseChanged { to: Phase::Exhale, .. }));
        assert_eq!(session.lock().unwrap().secs_remaining(), 5);

        ticker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_state() {
        let timer = Arc::new(Mutex::new(FocusTimer::new(1)));
        timer.lock().unwrap().start();
        let (tx, _rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(timer.clone(), TICK_PERIOD, tx);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        ticker.stop().await;
        let after_stop = timer.lock().unwrap().remaining_secs();
        assert_eq!(after_stop, 57);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.lock().unwrap().remaining_secs(), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_event_is_forwarded() {
        let timer = Arc::new(Mutex::new(FocusTimer::new(1)));
        timer.lock().unwrap().start();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _ticker = Ticker::spawn(timer.clone(), TICK_PERIOD, tx);

        let event = rx.recv().await.expect("completion");
        assert!(matches!(event, Event::FocusCompleted { total_secs: 60, .. }));
        assert!(!timer.lock().unwrap().is_running());
    }
}
