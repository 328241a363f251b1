// Wire types for the weatherapi.com `current.json` response.

use serde::{Deserialize, Serialize};

/// Current conditions for one location, flattened from the API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Location name as resolved by the API (may differ from the query).
    pub location: String,
    pub temp_c: f64,
    pub condition: String,
    pub humidity: u32,
    pub wind_kph: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub location: LocationBlock,
    pub current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationBlock {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentBlock {
    pub temp_c: f64,
    pub condition: ConditionBlock,
    pub humidity: u32,
    pub wind_kph: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    pub text: String,
}

/// Error body returned with non-200 statuses: `{"error":{"code":..,"message":..}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorInner,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorInner {
    #[serde(default)]
    pub message: String,
}

impl From<CurrentResponse> for CurrentWeather {
    fn from(resp: CurrentResponse) -> Self {
        Self {
            location: resp.location.name,
            temp_c: resp.current.temp_c,
            condition: resp.current.condition.text,
            humidity: resp.current.humidity,
            wind_kph: resp.current.wind_kph,
        }
    }
}
