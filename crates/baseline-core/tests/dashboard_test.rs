#![allow(clippy::unwrap_used)]
// Engine scenarios against scripted metric and weather sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tempfile::TempDir;
use tokio::sync::Notify;

use baseline_api::{CurrentWeather, SystemSample};
use baseline_core::store::{HISTORY_FILE, TODOS_FILE};
use baseline_core::{
    Dashboard, DashboardConfig, FocusMode, Intervals, Key, MetricsSource, NotificationKind, Panel,
    Priority, Routed, Sources, Theme, TodoItem, WeatherSource,
};

// ── Fakes ───────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeMetrics {
    calls: AtomicUsize,
    fail: bool,
}

impl MetricsSource for FakeMetrics {
    fn sample(&self) -> Result<SystemSample, baseline_api::Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        if self.fail {
            return Err(baseline_api::Error::Probe("no CPU information available".into()));
        }
        Ok(SystemSample {
            host_name: Some("testbox".into()),
            os: Some("TestOS 1.0".into()),
            cpu_pct: 25.0,
            memory_pct: 50.0,
            disk_pct: 75.0,
            net_rx_bytes: 1_000 * (n + 1),
            net_tx_bytes: 100 * (n + 1),
            logical_cores: 4,
            ..SystemSample::default()
        })
    }
}

/// Weather source that answers with the requested location, optionally
/// holding the first call until released.
#[derive(Default)]
struct FakeWeather {
    calls: AtomicUsize,
    fail_with_status: Option<u16>,
    gate: Option<Arc<Notify>>,
}

impl WeatherSource for FakeWeather {
    fn fetch_current<'a>(
        &'a self,
        _api_key: &'a SecretString,
        location: &'a str,
    ) -> BoxFuture<'a, Result<CurrentWeather, baseline_api::Error>> {
        Box::pin(async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let (0, Some(gate)) = (call, &self.gate) {
                gate.notified().await;
            }
            if let Some(status) = self.fail_with_status {
                return Err(baseline_api::Error::Status { status });
            }
            Ok(CurrentWeather {
                location: location.to_owned(),
                temp_c: 11.5,
                condition: "Drizzle".into(),
                humidity: 90,
                wind_kph: 14.0,
            })
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn config(dir: &TempDir) -> DashboardConfig {
    DashboardConfig::new(dir.path())
}

fn with_key(mut config: DashboardConfig) -> DashboardConfig {
    config.weather_api_key = Some(Arc::new("secret".to_string().into()));
    config
}

fn dashboard(config: DashboardConfig, metrics: FakeMetrics, weather: FakeWeather) -> Dashboard {
    Dashboard::new(
        config,
        Sources {
            metrics: Arc::new(metrics),
            weather: Arc::new(weather),
        },
    )
}

fn latest(dashboard: &Dashboard) -> (NotificationKind, String) {
    dashboard.state().read(|s| {
        let n = s.notifications().latest().unwrap();
        (n.kind, n.message.clone())
    })
}

async fn eventually(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

// ── Startup ─────────────────────────────────────────────────────────

#[test]
fn first_start_seeds_todos_and_greets() {
    let dir = TempDir::new().unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());

    let (todos, messages) = dash.state().read(|s| {
        (
            s.todos().len(),
            s.notifications()
                .iter()
                .map(|n| n.message.clone())
                .collect::<Vec<_>>(),
        )
    });
    assert_eq!(todos, 4);
    assert_eq!(
        messages,
        vec![
            "Weather API key not set. Using sample data.".to_string(),
            "Welcome to Baseline".to_string(),
        ]
    );
    assert!(dash.redraw().take().contains(Panel::Todo));
}

#[test]
fn malformed_todo_file_falls_back_with_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(TODOS_FILE), "[{\"text\": ").unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());

    let errors: Vec<String> = dash.state().read(|s| {
        s.notifications()
            .iter()
            .filter(|n| n.kind == NotificationKind::Error)
            .map(|n| n.message.clone())
            .collect()
    });
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error parsing"), "{}", errors[0]);
    assert_eq!(dash.state().read(|s| s.todos().len()), 4);
}

#[test]
fn startup_notes_are_shown() {
    let dir = TempDir::new().unwrap();
    let mut cfg = with_key(config(&dir));
    cfg.startup_notes = vec!["Unknown theme 'pink' in config, using amber".into()];
    let dash = dashboard(cfg, FakeMetrics::default(), FakeWeather::default());
    let first = dash
        .state()
        .read(|s| s.notifications().iter().next().unwrap().message.clone());
    assert_eq!(first, "Unknown theme 'pink' in config, using amber");
}

// ── Commands and persistence ────────────────────────────────────────

#[test]
fn todo_add_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(TODOS_FILE), "[]").unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());
    dash.redraw().take();

    assert!(!dash.dispatch("todo add Buy milk"));
    assert_eq!(
        latest(&dash),
        (NotificationKind::Success, "Added todo: Buy milk".into())
    );
    assert!(dash.redraw().take().contains(Panel::Todo));

    let reloaded = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());
    let todos = reloaded.state().read(|s| s.todos().to_vec());
    assert_eq!(
        todos,
        vec![TodoItem {
            text: "Buy milk".into(),
            done: false,
            priority: Priority::Medium,
        }]
    );
}

#[test]
fn shortcuts_walk_pending_tasks() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(TODOS_FILE),
        r#"[{"text":"A","done":false,"priority":"high"},{"text":"B","done":false,"priority":"low"}]"#,
    )
    .unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());

    assert_eq!(dash.handle_key(Key::Char('t'), ""), Routed::Handled);
    assert_eq!(dash.handle_key(Key::Char('t'), ""), Routed::Handled);
    let done: Vec<bool> = dash.state().read(|s| s.todos().iter().map(|t| t.done).collect());
    assert_eq!(done, [true, true]);

    dash.handle_key(Key::Char('t'), "");
    assert_eq!(
        latest(&dash),
        (NotificationKind::Info, "No pending tasks to toggle.".into())
    );

    let on_disk = std::fs::read_to_string(dir.path().join(TODOS_FILE)).unwrap();
    assert_eq!(on_disk.matches("\"done\": true").count(), 2);
}

#[test]
fn command_mode_round_trip_and_quit() {
    let dir = TempDir::new().unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());

    assert_eq!(dash.handle_key(Key::Char(':'), ""), Routed::Opened);
    assert_eq!(
        dash.state().read(|s| s.focus()),
        FocusMode::CommandInput
    );
    assert_eq!(dash.handle_key(Key::Enter, "THEME blue"), Routed::Closed);
    assert_eq!(dash.state().read(|s| s.theme()), Theme::Blue);
    assert!(dash.redraw().take().contains(Panel::System));

    assert!(!dash.is_shutting_down());
    assert_eq!(dash.handle_key(Key::Char('q'), ""), Routed::Quit);
    assert!(dash.is_shutting_down());
}

#[test]
fn exit_command_cancels_shutdown_token() {
    let dir = TempDir::new().unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());
    let token = dash.shutdown_token();
    assert!(dash.dispatch("exit"));
    assert!(token.is_cancelled());
}

// ── System refresh ──────────────────────────────────────────────────

#[tokio::test]
async fn system_refresh_records_history_and_persists() {
    let dir = TempDir::new().unwrap();
    let dash = dashboard(config(&dir), FakeMetrics::default(), FakeWeather::default());

    dash.refresh_system().await;
    dash.refresh_system().await;

    let (len, host, rx) = dash.state().read(|s| {
        (
            s.history().len(),
            s.system().host_name.clone(),
            s.history().network_in().to_vec(),
        )
    });
    assert_eq!(len, 2);
    assert_eq!(host.as_deref(), Some("testbox"));
    assert_eq!(rx, vec![1_000, 2_000]);

    let raw = std::fs::read_to_string(dir.path().join(HISTORY_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["cpu"].as_array().unwrap().len(), 2);
    assert!(dash.view(Panel::System).plain().contains("Host: testbox"));
}

#[tokio::test]
async fn metrics_failure_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let metrics = FakeMetrics {
        fail: true,
        ..FakeMetrics::default()
    };
    let dash = dashboard(config(&dir), metrics, FakeWeather::default());
    let before = dash.state().read(|s| s.notifications().len());

    dash.refresh_system().await;
    dash.refresh_system().await;

    let (after, error) = dash
        .state()
        .read(|s| (s.notifications().len(), s.system().error.clone()));
    assert_eq!(after, before + 1);
    assert_eq!(error.as_deref(), Some("System probe failed: no CPU information available"));
}

// ── Weather refresh ─────────────────────────────────────────────────

#[tokio::test]
async fn weather_without_key_uses_sample() {
    let dir = TempDir::new().unwrap();
    let weather = FakeWeather::default();
    let dash = dashboard(config(&dir), FakeMetrics::default(), weather);

    dash.refresh_weather().await;

    let snapshot = dash.state().read(|s| s.weather().clone());
    assert_eq!(snapshot.error.as_deref(), Some("API Key not set"));
    assert!((snapshot.temp_c - 22.0).abs() < f64::EPSILON);
    assert_eq!(snapshot.condition, "Partly Cloudy (Sample)");
    assert!(snapshot.last_updated.is_some());
}

#[tokio::test]
async fn weather_with_key_uses_source() {
    let dir = TempDir::new().unwrap();
    let dash = dashboard(
        with_key(config(&dir)),
        FakeMetrics::default(),
        FakeWeather::default(),
    );

    dash.refresh_weather().await;

    let snapshot = dash.state().read(|s| s.weather().clone());
    assert_eq!(snapshot.location, "Lahore");
    assert_eq!(snapshot.condition, "Drizzle");
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn weather_failure_lands_in_snapshot_and_notification() {
    let dir = TempDir::new().unwrap();
    let weather = FakeWeather {
        fail_with_status: Some(503),
        ..FakeWeather::default()
    };
    let dash = dashboard(with_key(config(&dir)), FakeMetrics::default(), weather);

    dash.refresh_weather().await;

    let snapshot = dash.state().read(|s| s.weather().clone());
    assert_eq!(snapshot.error.as_deref(), Some("API error: Status 503"));
    assert!(snapshot.condition.is_empty());
    assert_eq!(
        latest(&dash),
        (
            NotificationKind::Error,
            "Weather update failed: API error: Status 503".into()
        )
    );
}

#[tokio::test]
async fn stale_location_result_is_discarded() {
    let dir = TempDir::new().unwrap();
    let gate = Arc::new(Notify::new());
    let weather = FakeWeather {
        gate: Some(Arc::clone(&gate)),
        ..FakeWeather::default()
    };
    let dash = dashboard(with_key(config(&dir)), FakeMetrics::default(), weather);

    let slow = {
        let dash = dash.clone();
        tokio::spawn(async move { dash.refresh_weather().await })
    };
    tokio::task::yield_now().await;

    dash.dispatch("weather set Paris");
    eventually(|| dash.state().read(|s| s.weather().location == "Paris")).await;

    gate.notify_one();
    slow.await.unwrap();

    let location = dash.state().read(|s| s.weather().location.clone());
    assert_eq!(location, "Paris");
}

// ── Producers ───────────────────────────────────────────────────────

#[tokio::test]
async fn producers_run_and_stop_on_shutdown() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.intervals = Intervals {
        system: Duration::from_millis(20),
        weather: Duration::from_secs(60),
        clock: Duration::from_millis(20),
        weather_startup_delay: Duration::from_millis(10),
    };
    let dash = dashboard(cfg, FakeMetrics::default(), FakeWeather::default());
    let producers = dash.start();

    eventually(|| {
        dash.state()
            .read(|s| s.history().len() >= 2 && s.weather().last_updated.is_some())
    })
    .await;
    assert!(dash.redraw().take().contains(Panel::Clock));

    dash.request_shutdown();
    tokio::time::timeout(Duration::from_secs(5), producers.shutdown())
        .await
        .unwrap();
}
