// baseline-api: external data sources for the baseline dashboard
//
// Two collaborators live here: an async client for the weatherapi.com
// `current.json` endpoint and a host metrics probe built on `sysinfo`.
// Neither knows anything about dashboard state; `baseline-core` adapts
// their outputs into its own model.

pub mod error;
pub mod system;
pub mod transport;
pub mod weather;

pub use error::Error;
pub use system::{LoadAverage, ProcessUsage, SystemProbe, SystemSample};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
pub use weather::{CurrentWeather, DEFAULT_BASE_URL, WeatherClient};
