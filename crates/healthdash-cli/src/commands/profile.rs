use clap::Subcommand;
use healthdash_core::UserProfile;
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the default profile
    Show,
    /// Body-mass index and category
    Bmi {
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
    },
}

pub fn run(action: ProfileAction) -> CliResult {
    match action {
        ProfileAction::Show => print_json(&UserProfile::default()),
        ProfileAction::Bmi { height, weight } => {
            let mut profile = UserProfile::default();
            if let Some(height) = height {
                profile.height_cm = height;
            }
            if let Some(weight) = weight {
                profile.weight_kg = weight;
            }
            let bmi = profile
                .bmi()
                .ok_or_else(|| format!("height must be positive, got {}", profile.height_cm))?;
            let category = profile.bmi_category().map(|c| c.label());
            print_json(&json!({ "bmi": bmi, "category": category }))
        }
    }
}
