//! Location lookup for the AQI, weather and facility views.
//!
//! Geolocation may be denied or unavailable; the views then fall back to a
//! fixed place name instead of failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const CURRENT_LOCATION_LABEL: &str = "Current Location";
pub const DEFAULT_FALLBACK_LOCATION: &str = "San Francisco";
pub const DEFAULT_WEATHER_LOCATION: &str = "New York";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// "37.77, -122.42", the form used in prompts.
    pub fn to_query(&self) -> String {
        format!("{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// Parses "lat,lng".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'lat,lng', got '{s}'"))?;
        let latitude: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
        let longitude: f64 = lng.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("coordinates out of range: {latitude}, {longitude}"));
        }
        Ok(Self::new(latitude, longitude))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
}

/// Where a location-aware prompt should point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Text placed in the prompt.
    pub query: String,
    /// Text shown to the user.
    pub label: String,
    pub coordinates: Option<Coordinates>,
}

/// Use the device position when available, otherwise `fallback`.
pub fn resolve_location(
    lookup: Result<Coordinates, LocationError>,
    fallback: &str,
) -> ResolvedLocation {
    match lookup {
        Ok(coords) => ResolvedLocation {
            query: coords.to_query(),
            label: CURRENT_LOCATION_LABEL.to_string(),
            coordinates: Some(coords),
        },
        Err(err) => {
            info!(error = %err, fallback, "geolocation failed, using fallback location");
            ResolvedLocation {
                query: fallback.to_string(),
                label: fallback.to_string(),
                coordinates: None,
            }
        }
    }
}
