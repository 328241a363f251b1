// ── Weather snapshot ──

use baseline_api::CurrentWeather;
use chrono::{DateTime, Local};

pub const SAMPLE_TEMP_C: f64 = 22.0;
pub const SAMPLE_CONDITION: &str = "Partly Cloudy (Sample)";
pub const SAMPLE_HUMIDITY: u32 = 65;
pub const SAMPLE_WIND_KPH: f64 = 8.0;
pub const SAMPLE_NOTE: &str = "API Key not set";

/// The last weather result the panel shows.
///
/// `error` is set both for failed fetches and for sample data; the
/// difference is whether the reading fields carry values.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temp_c: f64,
    pub condition: String,
    pub humidity: u32,
    pub wind_kph: f64,
    pub error: Option<String>,
    /// `None` until the first refresh finishes.
    pub last_updated: Option<DateTime<Local>>,
}

impl WeatherSnapshot {
    /// Placeholder shown before the first fetch completes.
    pub fn pending(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            temp_c: 0.0,
            condition: String::new(),
            humidity: 0,
            wind_kph: 0.0,
            error: None,
            last_updated: None,
        }
    }

    /// Fixed reading used when no API key is configured.
    pub fn sample(location: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            location: location.into(),
            temp_c: SAMPLE_TEMP_C,
            condition: SAMPLE_CONDITION.into(),
            humidity: SAMPLE_HUMIDITY,
            wind_kph: SAMPLE_WIND_KPH,
            error: Some(SAMPLE_NOTE.into()),
            last_updated: Some(now),
        }
    }

    pub fn failed(
        location: impl Into<String>,
        error: impl Into<String>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            last_updated: Some(now),
            ..Self::pending(location)
        }
    }

    pub fn from_report(report: CurrentWeather, now: DateTime<Local>) -> Self {
        Self {
            location: report.location,
            temp_c: report.temp_c,
            condition: report.condition,
            humidity: report.humidity,
            wind_kph: report.wind_kph,
            error: None,
            last_updated: Some(now),
        }
    }

    /// True when the reading fields carry data (live or sample).
    pub fn has_reading(&self) -> bool {
        !self.condition.is_empty()
    }
}
