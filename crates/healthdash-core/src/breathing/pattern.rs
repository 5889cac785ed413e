use serde::{Deserialize, Serialize};

/// Phase durations of a guided breathing exercise, in seconds.
///
/// A zero hold means that hold is skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub name: String,
    pub inhale_secs: u32,
    /// Hold after inhaling.
    pub hold1_secs: u32,
    pub exhale_secs: u32,
    /// Rest after exhaling.
    pub hold2_secs: u32,
}

impl BreathingPattern {
    pub fn new(name: impl Into<String>, inhale: u32, hold1: u32, exhale: u32, hold2: u32) -> Self {
        Self {
            name: name.into(),
            inhale_secs: inhale,
            hold1_secs: hold1,
            exhale_secs: exhale,
            hold2_secs: hold2,
        }
    }

    pub fn box_breathing() -> Self {
        Self::new("Box Breathing", 4, 4, 4, 4)
    }

    pub fn relax_478() -> Self {
        Self::new("4-7-8 Relax", 4, 7, 8, 0)
    }

    pub fn deep_calm() -> Self {
        Self::new("Deep Calm", 5, 0, 5, 0)
    }

    /// The fixed catalog offered in the wellness view.
    pub fn catalog() -> Vec<Self> {
        vec![Self::box_breathing(), Self::relax_478(), Self::deep_calm()]
    }

    /// Case-insensitive lookup by name or short key ("box", "478", "calm").
    pub fn find(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        match key.as_str() {
            "box" => return Some(Self::box_breathing()),
            "478" | "4-7-8" => return Some(Self::relax_478()),
            "calm" | "deep" => return Some(Self::deep_calm()),
            _ => {}
        }
        Self::catalog()
            .into_iter()
            .find(|p| p.name.to_ascii_lowercase() == key)
    }

    /// Seconds in one full cycle, skipped holds included as zero.
    pub fn cycle_secs(&self) -> u32 {
        self.inhale_secs + self.hold1_secs + self.exhale_secs + self.hold2_secs
    }

    /// "4-7-8-0"
    pub fn timing_label(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.inhale_secs, self.hold1_secs, self.exhale_secs, self.hold2_secs
        )
    }
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self::box_breathing()
    }
}
