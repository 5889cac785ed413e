//! # Healthdash Core Library
//!
//! Core logic for the Healthdash wellness dashboard. The CLI and any other
//! front end are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Progress engine**: pure derivations of streak, 7-day calendar, BMI and
//!   goal progress from the activity log
//! - **Wellness timers**: breathing and focus state machines advanced by a
//!   caller-driven `tick()`, with a tokio [`Ticker`] for real time
//! - **AI collaborator**: every "smart" feature is a prompt sent through the
//!   [`AiCollaborator`] trait; [`GeminiClient`] is the HTTP implementation
//! - **Storage**: TOML configuration only; activity data lives in memory
//!
//! ## Key Components
//!
//! - [`AppState`]: explicit state for one dashboard session
//! - [`BreathingSession`]: breathing phase state machine
//! - [`RemoteView`]: loading/error/data for one AI-backed view
//! - [`Config`]: application configuration management

pub mod activity;
pub mod ai;
pub mod app;
pub mod breathing;
pub mod error;
pub mod events;
pub mod location;
pub mod media;
pub mod profile;
pub mod progress;
pub mod storage;
pub mod sync;
pub mod ticker;
pub mod view;

pub use activity::{ActivityEntry, ActivityLog, ActivityPreset, NewActivity, ACTIVITY_PRESETS};
pub use ai::{AiCollaborator, AiReply, AiRequest, GeminiClient};
pub use app::{AiViews, AppState, Tab};
pub use breathing::{BreathingPattern, BreathingSession, FocusTimer, Phase};
pub use error::{AiError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use location::{resolve_location, Coordinates, LocationError, ResolvedLocation};
pub use media::DataUrl;
pub use profile::{BmiCategory, Goal, UserProfile, UserStats};
pub use progress::{DayMark, ProgressReport, StreakSummary};
pub use storage::Config;
pub use sync::{SimulatedWearable, WearableSource};
pub use ticker::{Tick, Ticker, TICK_PERIOD};
pub use view::{RemoteView, Ticket};
