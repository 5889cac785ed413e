//! Commands backed by the AI collaborator.
//!
//! Each command runs one request through the matching [`RemoteView`], so a
//! failure prints the same message the dashboard would show and exits 1.

use std::path::PathBuf;

use clap::Args;
use healthdash_core::ai::{self, MentalGoal};
use healthdash_core::location::{resolve_location, Coordinates, LocationError, ResolvedLocation};
use healthdash_core::{AiError, AppState, Config, GeminiClient, RemoteView};
use serde::Serialize;
use tracing::info;

use super::{block_on, load_activities, print_json, CliResult};

#[derive(Args)]
pub struct DietArgs {
    /// JSON file with today's activities
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct LocationArgs {
    /// Current position as "lat,lng"; the configured fallback is used without it
    #[arg(long)]
    pub at: Option<Coordinates>,
    /// Place name to use instead of the position
    #[arg(long, conflicts_with = "at")]
    pub place: Option<String>,
}

#[derive(Args)]
pub struct MentalArgs {
    /// focus, stress or concentration
    pub goal: MentalGoal,
}

#[derive(Args)]
pub struct SymptomArgs {
    /// Symptom description
    pub symptom: String,
    /// Recent activity level
    #[arg(long, default_value = "moderate")]
    pub activity: String,
}

#[derive(Args)]
pub struct FacilitiesArgs {
    /// What to look for
    #[arg(default_value = "Gyms")]
    pub query: String,
    /// Current position as "lat,lng"
    #[arg(long)]
    pub at: Coordinates,
}

/// Config plus a client built from it.
pub(crate) fn client() -> Result<(Config, GeminiClient), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = GeminiClient::from_config(&config.ai)?;
    Ok((config, client))
}

/// Resolve `outcome` through `view` and print the data or fail with its error.
pub(crate) fn show<T: Serialize>(view: &mut RemoteView<T>, outcome: Result<T, AiError>) -> CliResult {
    let ticket = view.begin();
    view.resolve(ticket, outcome);
    if let Some(message) = view.error() {
        return Err(message.to_string().into());
    }
    match view.data() {
        Some(data) => print_json(data),
        None => Ok(()),
    }
}

fn location(args: LocationArgs, default_place: &str) -> ResolvedLocation {
    if let Some(place) = args.place {
        return ResolvedLocation {
            label: place.clone(),
            query: place,
            coordinates: None,
        };
    }
    resolve_location(args.at.ok_or(LocationError::Unavailable), default_place)
}

pub fn diet(args: DietArgs) -> CliResult {
    let (config, client) = client()?;
    let activities = load_activities(args.file.as_deref())?;
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::diet_plan(&client, &config.ai, &activities))?;
    show(&mut app.views.diet, outcome)
}

pub fn news() -> CliResult {
    let (config, client) = client()?;
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::health_news(&client, &config.ai))?;
    show(&mut app.views.news, outcome)
}

pub fn aqi(args: LocationArgs) -> CliResult {
    let (config, client) = client()?;
    let place = location(args, &config.wellness.fallback_location);
    info!(location = %place.label, "air quality lookup");
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::aqi_advice(&client, &config.ai, &place.query))?;
    show(&mut app.views.aqi, outcome)
}

pub fn weather(args: LocationArgs) -> CliResult {
    let (config, client) = client()?;
    let place = location(args, &config.wellness.weather_location);
    info!(location = %place.label, "weather lookup");
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::weather_activities(&client, &config.ai, &place.query))?;
    show(&mut app.views.weather, outcome)
}

pub fn mental(args: MentalArgs) -> CliResult {
    let (config, client) = client()?;
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::mental_exercises(&client, &config.ai, args.goal))?;
    show(&mut app.views.mental, outcome)
}

pub fn symptom(args: SymptomArgs) -> CliResult {
    let (config, client) = client()?;
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::analyze_symptom(&client, &config.ai, &args.symptom, &args.activity))?;
    show(&mut app.views.symptom, outcome)
}

pub fn facilities(args: FacilitiesArgs) -> CliResult {
    let (config, client) = client()?;
    let mut app = AppState::new(&config);
    let outcome = block_on(ai::nearby_facilities(&client, &config.ai, &args.query, args.at))?;
    show(&mut app.views.facilities, outcome)
}
