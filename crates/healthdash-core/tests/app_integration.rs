//! End-to-end tests over AppState: logging, syncing, tab switches and
//! AI-backed views resolving out of order.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use healthdash_core::ai::{mental_exercises, AiCollaborator, AiReply, AiRequest, MentalGoal};
use healthdash_core::location::DEFAULT_FALLBACK_LOCATION;
use healthdash_core::progress::synced_step_bonus;
use healthdash_core::storage::AiConfig;
use healthdash_core::{
    resolve_location, AiError, AppState, Event, LocationError, NewActivity, SimulatedWearable,
    Tab, WearableSource,
};
use tokio::sync::oneshot;

/// Collaborator that waits for the test to release each answer.
struct Gate {
    answers: std::sync::Mutex<Vec<oneshot::Receiver<Result<AiReply, AiError>>>>,
}

#[async_trait]
impl AiCollaborator for Gate {
    async fn request(&self, _request: &AiRequest) -> Result<AiReply, AiError> {
        let rx = self.answers.lock().unwrap().remove(0);
        rx.await.unwrap()
    }
}

fn exercises_json(title: &str) -> AiReply {
    AiReply::text(format!(
        r#"[{{"title":"{title}","description":"d","steps":["s"],"benefit":"b","category":"Focus"}}]"#
    ))
}

#[tokio::test]
async fn test_sync_prepends_and_credits_steps() {
    let mut app = AppState::default();
    app.add_activity(NewActivity::default(), Utc::now());
    let steps_before = app.stats.steps;

    let wearable = SimulatedWearable::seeded(Duration::ZERO, 99);
    let batch = wearable.sync().await.unwrap();
    let expected_bonus = synced_step_bonus(&batch);
    let count = batch.len();
    let event = app.add_synced(batch, Utc::now());

    assert!(matches!(event, Event::WearableSynced { count: c, .. } if c == count));
    assert_eq!(app.activities().len(), count + 1);
    assert!(app.activities().entries()[0].kind.ends_with(" (Synced)"));
    assert_eq!(app.activities().entries()[count].kind, "Running");
    assert_eq!(app.stats.steps, steps_before + expected_bonus);
    assert_eq!(app.streak_summary(&Utc::now()).streak, 1);
}

#[tokio::test]
async fn test_out_of_order_responses_keep_latest() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let ai = Gate {
        answers: std::sync::Mutex::new(vec![first_rx, second_rx]),
    };
    let config = AiConfig::default();
    let mut app = AppState::default();

    let first_ticket = app.views.mental.begin();
    let second_ticket = app.views.mental.begin();
    let first = mental_exercises(&ai, &config, MentalGoal::Focus);
    let second = mental_exercises(&ai, &config, MentalGoal::Stress);

    second_tx.send(Ok(exercises_json("Newer"))).unwrap();
    first_tx.send(Ok(exercises_json("Older"))).unwrap();
    let first = first.await;
    let second = second.await;

    assert!(app.views.mental.resolve(second_ticket, second));
    assert!(!app.views.mental.resolve(first_ticket, first));
    assert_eq!(app.views.mental.data().unwrap()[0].title, "Newer");
    assert!(!app.views.mental.is_loading());
}

#[test]
fn test_wellness_timers_stop_on_tab_change() {
    let mut app = AppState::default();
    app.login();
    app.switch_tab(Tab::Wellness);
    app.breathing().lock().unwrap().start();

    let events = app.switch_tab(Tab::ImageLab);
    assert_eq!(events.len(), 2);
    assert!(!app.breathing().lock().unwrap().is_running());
    assert_eq!(app.tab(), Tab::ImageLab);
}

#[test]
fn test_location_fallback_feeds_prompt() {
    let resolved = resolve_location(Err(LocationError::Unavailable), DEFAULT_FALLBACK_LOCATION);
    assert_eq!(resolved.query, "San Francisco");
}
