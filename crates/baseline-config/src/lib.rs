//! Configuration for the baseline dashboard.
//!
//! Layered settings (built-in defaults, then `config.toml`, then the
//! environment) and translation to `baseline_core::DashboardConfig`.
//! Command-line flags are applied on top by the binary through
//! [`Overrides`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use baseline_core::config::DEFAULT_LOCATION;
use baseline_core::{DashboardConfig, Intervals, Theme};

/// Placeholder key shipped in example env files; treated as unset.
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Plain environment variables read without a prefix.
const RAW_ENV_KEYS: [&str; 3] = ["theme", "weather_api_key", "weather_location"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything the config file and environment can set.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub weather_api_key: Option<String>,
    pub weather_location: String,
    pub data_dir: Option<PathBuf>,
    pub system_interval_secs: u64,
    pub weather_interval_secs: u64,
    pub weather_timeout_secs: u64,
    pub weather_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default().to_string(),
            weather_api_key: None,
            weather_location: DEFAULT_LOCATION.into(),
            data_dir: None,
            system_interval_secs: 2,
            weather_interval_secs: 15 * 60,
            weather_timeout_secs: baseline_api::DEFAULT_TIMEOUT.as_secs(),
            weather_base_url: baseline_api::DEFAULT_BASE_URL.into(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("theme", &self.theme)
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("weather_location", &self.weather_location)
            .field("data_dir", &self.data_dir)
            .field("system_interval_secs", &self.system_interval_secs)
            .field("weather_interval_secs", &self.weather_interval_secs)
            .field("weather_timeout_secs", &self.weather_timeout_secs)
            .field("weather_base_url", &self.weather_base_url)
            .finish()
    }
}

/// Command-line values that win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub theme: Option<String>,
    pub location: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved configuration for the binary.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub dashboard: DashboardConfig,
    pub weather_base_url: Url,
    pub weather_timeout: Duration,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "baseline", "baseline").map_or_else(
        || PathBuf::from(".baseline").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// `~/.baseline`, or `.baseline` when there is no home directory.
pub fn default_data_dir() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from(".baseline"),
        |dirs| dirs.home_dir().join(".baseline"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Provider chain: defaults, then the TOML file, then `BASELINE_*`
/// variables, then the plain `THEME` / `WEATHER_API_KEY` /
/// `WEATHER_LOCATION` variables.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BASELINE_"))
        .merge(Env::raw().only(&RAW_ENV_KEYS))
}

/// Load settings from the canonical config path and the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_from(&figment(&config_path()))
}

pub fn load_from(figment: &Figment) -> Result<Settings, ConfigError> {
    Ok(figment.extract()?)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Apply overrides, validate, and build the engine configuration.
pub fn resolve(settings: Settings, overrides: Overrides) -> Result<Resolved, ConfigError> {
    let mut notes = Vec::new();

    let theme_name = overrides.theme.unwrap_or(settings.theme);
    let theme = parse_theme(&theme_name, &mut notes);

    let weather_location = overrides
        .location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(settings.weather_location);
    if weather_location.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "weather_location".into(),
            reason: "must not be empty".into(),
        });
    }

    let weather_api_key = settings
        .weather_api_key
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
        .map(|k| Arc::new(SecretString::from(k)));

    let data_dir = overrides
        .data_dir
        .or(settings.data_dir)
        .unwrap_or_else(default_data_dir);

    let weather_base_url: Url =
        settings
            .weather_base_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "weather_base_url".into(),
                reason: format!("invalid URL: {}", settings.weather_base_url),
            })?;

    let intervals = Intervals {
        system: positive_secs("system_interval_secs", settings.system_interval_secs)?,
        weather: positive_secs("weather_interval_secs", settings.weather_interval_secs)?,
        ..Intervals::default()
    };
    let weather_timeout = positive_secs("weather_timeout_secs", settings.weather_timeout_secs)?;

    Ok(Resolved {
        dashboard: DashboardConfig {
            data_dir,
            user_name: user_name(),
            theme,
            weather_location,
            weather_api_key,
            intervals,
            startup_notes: notes,
        },
        weather_base_url,
        weather_timeout,
    })
}

/// Unknown themes are not fatal: fall back to the default and say so.
fn parse_theme(name: &str, notes: &mut Vec<String>) -> Theme {
    let name = name.trim();
    if name.is_empty() {
        return Theme::default();
    }
    name.parse().unwrap_or_else(|_| {
        notes.push(format!(
            "Unknown theme '{name}' in config, using {}. Available: {}",
            Theme::default(),
            Theme::available()
        ));
        Theme::default()
    })
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "user".into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::result_large_err)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn load_in(jail: &Jail) -> Settings {
        load_from(&figment(&jail.directory().join("config.toml"))).unwrap()
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let settings = load_in(jail);
            assert_eq!(settings.theme, "amber");
            assert_eq!(settings.weather_location, "Lahore");
            assert_eq!(settings.system_interval_secs, 2);
            assert!(settings.weather_api_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_beats_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                r#"
                    theme = "green"
                    weather_location = "Oslo"
                    system_interval_secs = 5
                "#,
            )?;
            jail.set_env("THEME", "blue");
            jail.set_env("WEATHER_API_KEY", "abc123");

            let settings = load_in(jail);
            assert_eq!(settings.theme, "blue");
            assert_eq!(settings.weather_location, "Oslo");
            assert_eq!(settings.system_interval_secs, 5);
            assert_eq!(settings.weather_api_key.as_deref(), Some("abc123"));
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_sets_data_dir() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("BASELINE_DATA_DIR", "/var/lib/baseline");
            let settings = load_in(jail);
            assert_eq!(settings.data_dir, Some(PathBuf::from("/var/lib/baseline")));
            Ok(())
        });
    }

    #[test]
    fn placeholder_and_blank_keys_mean_sample_mode() {
        for key in ["", "   ", "YOUR_API_KEY"] {
            let settings = Settings {
                weather_api_key: Some(key.into()),
                ..Settings::default()
            };
            let resolved = resolve(settings, Overrides::default()).unwrap();
            assert!(resolved.dashboard.weather_api_key.is_none(), "{key:?}");
        }

        let settings = Settings {
            weather_api_key: Some(" real-key ".into()),
            ..Settings::default()
        };
        let resolved = resolve(settings, Overrides::default()).unwrap();
        let key = resolved.dashboard.weather_api_key.unwrap();
        assert_eq!(key.expose_secret(), "real-key");
    }

    #[test]
    fn overrides_win() {
        let overrides = Overrides {
            theme: Some("GREEN".into()),
            location: Some("Tokyo".into()),
            data_dir: Some(PathBuf::from("/tmp/dash")),
        };
        let resolved = resolve(Settings::default(), overrides).unwrap();
        assert_eq!(resolved.dashboard.theme, Theme::Green);
        assert_eq!(resolved.dashboard.weather_location, "Tokyo");
        assert_eq!(resolved.dashboard.data_dir, PathBuf::from("/tmp/dash"));
        assert!(resolved.dashboard.startup_notes.is_empty());
    }

    #[test]
    fn unknown_theme_falls_back_with_note() {
        let settings = Settings {
            theme: "purple".into(),
            ..Settings::default()
        };
        let resolved = resolve(settings, Overrides::default()).unwrap();
        assert_eq!(resolved.dashboard.theme, Theme::Amber);
        assert_eq!(
            resolved.dashboard.startup_notes,
            vec![
                "Unknown theme 'purple' in config, using amber. Available: amber, green, blue"
                    .to_string()
            ]
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = Settings {
            system_interval_secs: 0,
            ..Settings::default()
        };
        let err = resolve(settings, Overrides::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid system_interval_secs: must be at least 1 second"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let settings = Settings {
            weather_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(
            resolve(settings, Overrides::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let settings = Settings {
            weather_api_key: Some("hunter2".into()),
            ..Settings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
