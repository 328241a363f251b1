// ── Runtime configuration for the dashboard engine ──
//
// Already-resolved values. Reading files and the environment is the
// config crate's job; the engine only consumes this struct.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::model::Theme;

pub const DEFAULT_LOCATION: &str = "Lahore";

/// Refresh cadence for each background producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub system: Duration,
    pub weather: Duration,
    pub clock: Duration,
    /// Delay before the first weather fetch so startup is not blocked on
    /// the network.
    pub weather_startup_delay: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            system: Duration::from_secs(2),
            weather: Duration::from_secs(15 * 60),
            clock: Duration::from_secs(1),
            weather_startup_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Directory holding `todos.json` and `system_history.json`.
    pub data_dir: PathBuf,
    /// Shown in the header next to the host name.
    pub user_name: String,
    pub theme: Theme,
    pub weather_location: String,
    /// `None` selects sample weather data.
    pub weather_api_key: Option<Arc<SecretString>>,
    pub intervals: Intervals,
    /// Messages from configuration loading, shown as notifications at
    /// startup.
    pub startup_notes: Vec<String>,
}

impl DashboardConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            user_name: "user".into(),
            theme: Theme::default(),
            weather_location: DEFAULT_LOCATION.into(),
            weather_api_key: None,
            intervals: Intervals::default(),
            startup_notes: Vec::new(),
        }
    }
}
