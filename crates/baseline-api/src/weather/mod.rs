// weatherapi.com client
//
// Only the `current.json` endpoint is used. The client returns a flat
// `CurrentWeather`; building the dashboard snapshot (sample mode, error
// snapshots, timestamps) is the caller's business.

mod client;
mod models;

pub use client::{DEFAULT_BASE_URL, WeatherClient};
pub use models::CurrentWeather;
