use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "healthdash-cli", version, about = "Healthdash CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided breathing sessions
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Focus countdown timer
    Focus(commands::focus::FocusArgs),
    /// Activity streak and goal progress
    Streak(commands::streak::StreakArgs),
    /// Profile and body metrics
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Sync workouts from the (simulated) wearable
    Sync(commands::sync::SyncArgs),
    /// AI meal plan for the logged activities
    Diet(commands::ai::DietArgs),
    /// Latest health headlines
    News,
    /// Air quality advice for a location
    Aqi(commands::ai::LocationArgs),
    /// Weather-appropriate activity suggestions
    Weather(commands::ai::LocationArgs),
    /// Mental exercises for a goal
    Mental(commands::ai::MentalArgs),
    /// Symptom analysis
    Symptom(commands::ai::SymptomArgs),
    /// Find gyms, clinics, parks... nearby
    Facilities(commands::ai::FacilitiesArgs),
    /// Image generation and editing
    Image {
        #[command(subcommand)]
        action: commands::media::ImageAction,
    },
    /// Short video generation
    Video(commands::media::VideoArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HEALTHDASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Streak(args) => commands::streak::run(args),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Diet(args) => commands::ai::diet(args),
        Commands::News => commands::ai::news(),
        Commands::Aqi(args) => commands::ai::aqi(args),
        Commands::Weather(args) => commands::ai::weather(args),
        Commands::Mental(args) => commands::ai::mental(args),
        Commands::Symptom(args) => commands::ai::symptom(args),
        Commands::Facilities(args) => commands::ai::facilities(args),
        Commands::Image { action } => commands::media::image(action),
        Commands::Video(args) => commands::media::video(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "healthdash-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
