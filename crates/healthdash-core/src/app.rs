//! Application state for one dashboard session.
//!
//! All mutable state lives in [`AppState`], owned by whoever drives the
//! dashboard and passed down by reference. The breathing session and focus
//! timer sit behind `Arc<Mutex<_>>` so a [`crate::ticker::Ticker`] can
//! advance them while the rest of the state stays single-owner.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activity::{ActivityEntry, ActivityLog, NewActivity};
use crate::ai::{
    AqiStatus, FacilityResult, MealRecommendation, MentalExercise, NewsItem, VideoClip,
    WeatherActivitySuggestion,
};
use crate::breathing::{BreathingPattern, BreathingSession, FocusTimer};
use crate::events::Event;
use crate::media::DataUrl;
use crate::profile::{UserProfile, UserStats};
use crate::progress::{self, ProgressReport, StreakSummary};
use crate::storage::Config;
use crate::view::RemoteView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    Dashboard,
    Activity,
    Diet,
    Health,
    Aqi,
    Wellness,
    Profile,
    News,
    ImageLab,
    VideoStudio,
    Facilities,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Activity => "activity",
            Tab::Diet => "diet",
            Tab::Health => "health",
            Tab::Aqi => "aqi",
            Tab::Wellness => "wellness",
            Tab::Profile => "profile",
            Tab::News => "news",
            Tab::ImageLab => "image-lab",
            Tab::VideoStudio => "video-studio",
            Tab::Facilities => "facilities",
        }
    }
}

/// One [`RemoteView`] per AI-backed screen.
#[derive(Debug, Clone)]
pub struct AiViews {
    pub diet: RemoteView<Vec<MealRecommendation>>,
    pub news: RemoteView<Vec<NewsItem>>,
    pub aqi: RemoteView<AqiStatus>,
    pub weather: RemoteView<WeatherActivitySuggestion>,
    pub mental: RemoteView<Vec<MentalExercise>>,
    pub facilities: RemoteView<FacilityResult>,
    pub image: RemoteView<Option<DataUrl>>,
    pub video: RemoteView<VideoClip>,
    pub symptom: RemoteView<String>,
}

impl Default for AiViews {
    fn default() -> Self {
        Self {
            diet: RemoteView::new("Could not generate a meal plan. Please try again."),
            news: RemoteView::new("Could not load health news."),
            aqi: RemoteView::new("Could not fetch air quality advice."),
            weather: RemoteView::new("Could not fetch weather suggestions."),
            mental: RemoteView::new("Could not load exercises."),
            facilities: RemoteView::new("Could not search nearby facilities."),
            image: RemoteView::new("Failed to generate image."),
            video: RemoteView::new("Veo requires a paid API key and credit. Please check your billing."),
            symptom: RemoteView::new("Analysis failed. Please try again."),
        }
    }
}

pub struct AppState {
    tab: Tab,
    dark_mode: bool,
    logged_in: bool,
    pub profile: UserProfile,
    pub stats: UserStats,
    activities: ActivityLog,
    breathing: Arc<Mutex<BreathingSession>>,
    focus: Arc<Mutex<FocusTimer>>,
    pub views: AiViews,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            tab: Tab::Dashboard,
            dark_mode: config.ui.dark_mode,
            logged_in: false,
            profile: UserProfile::default(),
            stats: UserStats::default(),
            activities: ActivityLog::new(),
            breathing: Arc::new(Mutex::new(BreathingSession::new(config.breathing_pattern()))),
            focus: Arc::new(Mutex::new(FocusTimer::new(config.wellness.focus_minutes))),
            views: AiViews::default(),
        }
    }

    /// Start from a previously exported activity log.
    pub fn with_activities(mut self, activities: ActivityLog) -> Self {
        self.activities = activities;
        self
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn activities(&self) -> &ActivityLog {
        &self.activities
    }

    /// Shared handle for a ticker.
    pub fn breathing(&self) -> Arc<Mutex<BreathingSession>> {
        Arc::clone(&self.breathing)
    }

    /// Shared handle for a ticker.
    pub fn focus(&self) -> Arc<Mutex<FocusTimer>> {
        Arc::clone(&self.focus)
    }

    /// Login is simulated: any credentials are accepted.
    pub fn login(&mut self) {
        self.logged_in = true;
        info!(user = %self.profile.email, "logged in");
    }

    pub fn logout(&mut self) -> Vec<Event> {
        let events = self.switch_tab(Tab::Dashboard);
        self.logged_in = false;
        events
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Change the active tab. Leaving the wellness tab pauses both timers.
    pub fn switch_tab(&mut self, tab: Tab) -> Vec<Event> {
        let previous = self.tab;
        self.tab = tab;
        if previous != Tab::Wellness || tab == Tab::Wellness {
            return Vec::new();
        }

        let mut events: Vec<Event> = [lock(&self.breathing).pause(), lock(&self.focus).pause()]
            .into_iter()
            .flatten()
            .collect();
        debug!(to = tab.as_str(), "left wellness, timers paused");
        events.push(Event::ViewLeft {
            tab: previous.as_str().to_string(),
            at: Utc::now(),
        });
        events
    }

    /// Switch breathing pattern; the session restarts from its first phase.
    pub fn set_breathing_pattern(&mut self, pattern: BreathingPattern) -> Option<Event> {
        lock(&self.breathing).set_pattern(pattern)
    }

    /// Change the focus length; the timer stops and shows the new full time.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Option<Event> {
        lock(&self.focus).set_minutes(minutes)
    }

    /// Log a manual activity and credit the step bonus for its kind.
    pub fn add_activity(&mut self, activity: NewActivity, now: DateTime<Utc>) -> Event {
        let bonus = progress::manual_step_bonus(&activity.kind);
        let entry = self.activities.log(activity, now);
        self.stats.steps = self.stats.steps.saturating_add(bonus);
        debug!(id = %entry.id, kind = %entry.kind, bonus, "activity logged");
        Event::ActivityLogged {
            id: entry.id,
            kind: entry.kind,
            at: now,
        }
    }

    /// Prepend a synced batch and credit steps for its total duration.
    pub fn add_synced(&mut self, batch: Vec<ActivityEntry>, now: DateTime<Utc>) -> Event {
        let bonus = progress::synced_step_bonus(&batch);
        let count = batch.len();
        self.activities.extend_front(batch);
        self.stats.steps = self.stats.steps.saturating_add(bonus);
        info!(count, bonus, "synced activities added");
        Event::WearableSynced { count, at: now }
    }

    pub fn update_profile(&mut self, profile: UserProfile) {
        self.stats.weight_kg = profile.weight_kg;
        self.profile = profile;
    }

    pub fn streak_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> StreakSummary {
        progress::summarize(self.activities.entries(), now)
    }

    pub fn progress_report<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ProgressReport {
        let streak = self.streak_summary(now).streak;
        ProgressReport::build(&self.profile, &self.stats, self.activities.entries(), streak)
    }
}
