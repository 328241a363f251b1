// ── External data sources ──
//
// The engine reads host metrics and weather through these two traits so
// tests can substitute scripted sources for the real probe and client.

use baseline_api::{CurrentWeather, SystemProbe, SystemSample, WeatherClient};
use futures::future::BoxFuture;
use secrecy::SecretString;

/// Blocking host metrics provider. Called from a blocking thread.
pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> Result<SystemSample, baseline_api::Error>;
}

/// Current-conditions provider.
pub trait WeatherSource: Send + Sync {
    fn fetch_current<'a>(
        &'a self,
        api_key: &'a SecretString,
        location: &'a str,
    ) -> BoxFuture<'a, Result<CurrentWeather, baseline_api::Error>>;
}

impl MetricsSource for SystemProbe {
    fn sample(&self) -> Result<SystemSample, baseline_api::Error> {
        Self::sample(self)
    }
}

impl WeatherSource for WeatherClient {
    fn fetch_current<'a>(
        &'a self,
        api_key: &'a SecretString,
        location: &'a str,
    ) -> BoxFuture<'a, Result<CurrentWeather, baseline_api::Error>> {
        Box::pin(self.current(api_key, location))
    }
}
