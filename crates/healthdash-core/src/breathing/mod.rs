mod focus;
mod pattern;
mod session;

pub use focus::{format_clock, FocusTimer, DEFAULT_FOCUS_MINUTES};
pub use pattern::BreathingPattern;
pub use session::{BreathingSession, Phase};
