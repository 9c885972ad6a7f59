use serde_json::Value;

use crate::WikidataError;

/// A globe coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reads a `globecoordinate` datavalue payload.
    pub fn from_json(value: &Value) -> Result<Self, WikidataError> {
        let latitude = value["latitude"]
            .as_f64()
            .ok_or_else(|| WikidataError::missing_field("latitude", value))?;
        let longitude = value["longitude"]
            .as_f64()
            .ok_or_else(|| WikidataError::missing_field("longitude", value))?;
        Ok(Self::new(latitude, longitude))
    }

    /// Renders `D°M'S"H, D°M'S"H`, latitude first.
    pub fn to_dms(&self) -> String {
        format!(
            "{}, {}",
            degrees_to_dms(self.latitude, 'N', 'S'),
            degrees_to_dms(self.longitude, 'E', 'W')
        )
    }
}

fn degrees_to_dms(value: f64, positive: char, negative: char) -> String {
    let hemisphere = if value < 0.0 { negative } else { positive };
    let value = value.abs();
    let mut degrees = value.trunc();
    let minutes_full = (value - degrees) * 60.0;
    let mut minutes = minutes_full.trunc();
    let mut seconds = ((minutes_full - minutes) * 60.0 * 10.0).round() / 10.0;
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    let seconds = format!("{seconds:.1}");
    let seconds = seconds.trim_end_matches('0').trim_end_matches('.');
    format!("{degrees}°{minutes}'{seconds}\"{hemisphere}")
}
