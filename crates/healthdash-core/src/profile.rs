//! User profile, daily stats and the body metrics derived from them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Loss,
    Gain,
    Maintain,
    Athletic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    /// Avatar as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
    pub daily_step_goal: u32,
    pub daily_calorie_goal: u32,
    #[serde(default)]
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    pub weekly_workout_goal: Option<u32>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Alex Johnson".into(),
            email: "alex.j@example.com".into(),
            avatar: None,
            age: 28,
            height_cm: 175.0,
            weight_kg: 72.0,
            goal: Goal::Maintain,
            daily_step_goal: 10_000,
            daily_calorie_goal: 2_400,
            target_weight_kg: Some(70.0),
            weekly_workout_goal: Some(5),
        }
    }
}

impl UserProfile {
    /// Body-mass index rounded to one decimal, or `None` for a non-positive height.
    pub fn bmi(&self) -> Option<f64> {
        if self.height_cm <= 0.0 {
            return None;
        }
        let meters = self.height_cm / 100.0;
        Some((self.weight_kg / (meters * meters) * 10.0).round() / 10.0)
    }

    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.bmi().map(BmiCategory::from_bmi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Healthy
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Today's headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub steps: u32,
    pub water_liters: f64,
    pub sleep_hours: f64,
    pub weight_kg: f64,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            steps: 8_420,
            water_liters: 1.8,
            sleep_hours: 7.5,
            weight_kg: 72.0,
        }
    }
}
