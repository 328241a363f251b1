// ── Dashboard facade ──
//
// Owns the shared state, persistence, redraw signal and data sources,
// and is the only thing the terminal layer talks to. State transitions
// happen inside one lock section; saves, fetches and redraw requests
// run after the lock is released.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Local;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::input::{Key, Routed};
use crate::model::{MetricHistory, Notification, TodoItem, WeatherSnapshot};
use crate::scheduler::{Producers, spawn_supervised};
use crate::source::{MetricsSource, WeatherSource};
use crate::store::{AppState, Effects, Panel, PanelSet, Persistence, RedrawSignal, SharedState};
use crate::view::{self, PanelView};

pub const WELCOME_TEXT: &str = "Welcome to Baseline";
pub const SAMPLE_MODE_TEXT: &str = "Weather API key not set. Using sample data.";

/// The data providers the dashboard polls.
pub struct Sources {
    pub metrics: Arc<dyn MetricsSource>,
    pub weather: Arc<dyn WeatherSource>,
}

/// Cheaply cloneable handle to the running dashboard.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    state: SharedState,
    persistence: Arc<Persistence>,
    redraw: RedrawSignal,
    shutdown: CancellationToken,
    metrics: Arc<dyn MetricsSource>,
    weather: Arc<dyn WeatherSource>,
    /// Set while history saves are failing, so the error is reported once.
    history_save_failing: AtomicBool,
}

impl Dashboard {
    /// Load persisted state and build the dashboard. Nothing is spawned
    /// until [`start`](Self::start).
    pub fn new(config: DashboardConfig, sources: Sources) -> Self {
        let persistence = Persistence::new(&config.data_dir);
        let mut problems = Vec::new();

        if let Err(e) = persistence.ensure_dir() {
            warn!(error = %e, "data directory unavailable");
            problems.push(e.to_string());
        }
        let todos = persistence.load_todos();
        problems.extend(todos.warning.map(|e| e.to_string()));
        let history = persistence.load_history();
        problems.extend(history.warning.map(|e| e.to_string()));

        let mut state = AppState::new(&config, todos.value, history.value);
        for note in &config.startup_notes {
            state.notify(Notification::info(note.clone()));
        }
        for problem in problems {
            state.notify(Notification::error(problem));
        }
        if state.weather_sample_mode() {
            state.notify(Notification::info(SAMPLE_MODE_TEXT));
        }
        state.notify(Notification::info(WELCOME_TEXT));

        info!(
            data_dir = %config.data_dir.display(),
            todos = state.todos().len(),
            history = state.history().len(),
            theme = %state.theme(),
            "dashboard initialised"
        );

        let redraw = RedrawSignal::default();
        redraw.request_all(PanelSet::all());

        Self {
            inner: Arc::new(DashboardInner {
                config,
                state: SharedState::new(state),
                persistence: Arc::new(persistence),
                redraw,
                shutdown: CancellationToken::new(),
                metrics: sources.metrics,
                weather: sources.weather,
                history_save_failing: AtomicBool::new(false),
            }),
        }
    }

    /// Spawn the background producers. Must be called inside a Tokio runtime.
    pub fn start(&self) -> Producers {
        Producers::start(self)
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn state(&self) -> &SharedState {
        &self.inner.state
    }

    pub fn redraw(&self) -> &RedrawSignal {
        &self.inner.redraw
    }

    pub fn persistence(&self) -> &Persistence {
        &self.inner.persistence
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    pub fn request_shutdown(&self) {
        if !self.inner.shutdown.is_cancelled() {
            info!("shutdown requested");
            self.inner.shutdown.cancel();
        }
    }

    pub fn request_redraw(&self, panel: Panel) {
        self.inner.redraw.request(panel);
    }

    /// Build the current content of one panel.
    pub fn view(&self, panel: Panel) -> PanelView {
        let now = Local::now();
        self.inner.state.read(|s| view::build(panel, s, now))
    }

    // ── Input ────────────────────────────────────────────────────

    /// Route one key. `line` is the command line's current text.
    pub fn handle_key(&self, key: Key, line: &str) -> Routed {
        let (routed, effects) = self.inner.state.write(|s| s.route_key(key, line));
        self.apply_effects(effects);
        routed
    }

    /// Run one command line as if it had been typed. Returns `true` when
    /// the command asked the dashboard to quit.
    pub fn dispatch(&self, line: &str) -> bool {
        let effects = self.inner.state.write(|s| s.apply_line(line));
        let quit = effects.quit;
        self.apply_effects(effects);
        quit
    }

    pub fn notify(&self, notification: Notification) {
        self.inner.state.write(|s| s.notify(notification));
        self.inner.redraw.request(Panel::Footer);
    }

    fn apply_effects(&self, effects: Effects) {
        if let Some((revision, todos)) = effects.save_todos {
            self.persist_todos(revision, &todos);
        }
        if effects.fetch_weather {
            self.spawn_weather_refresh();
        }
        self.inner.redraw.request_all(effects.redraw);
        if effects.quit {
            self.request_shutdown();
        }
    }

    fn persist_todos(&self, revision: u64, todos: &[TodoItem]) {
        if let Err(e) = self.inner.persistence.save_todos(revision, todos) {
            warn!(error = %e, revision, "todo save failed");
            self.notify(Notification::error(e.to_string()));
        } else {
            debug!(revision, count = todos.len(), "todos saved");
        }
    }

    async fn persist_history(&self, revision: u64, history: MetricHistory) {
        let persistence = Arc::clone(&self.inner.persistence);
        let result = tokio::task::spawn_blocking(move || persistence.save_history(revision, &history))
            .await
            .map_err(|e| CoreError::Task(e.to_string()))
            .and_then(std::convert::identity);

        let failing = &self.inner.history_save_failing;
        match result {
            Ok(()) => failing.store(false, Ordering::Relaxed),
            Err(e) => {
                warn!(error = %e, revision, "history save failed");
                if !failing.swap(true, Ordering::Relaxed) {
                    self.notify(Notification::error(e.to_string()));
                }
            }
        }
    }

    fn spawn_weather_refresh(&self) {
        if Handle::try_current().is_err() {
            warn!("no async runtime, weather refresh not scheduled");
            return;
        }
        let dashboard = self.clone();
        spawn_supervised("weather", async move { dashboard.refresh_weather().await });
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Take one host sample and fold it into the state.
    pub async fn refresh_system(&self) {
        let metrics = Arc::clone(&self.inner.metrics);
        let result = tokio::task::spawn_blocking(move || metrics.sample())
            .await
            .map_err(|e| CoreError::Task(e.to_string()))
            .and_then(|sample| sample.map_err(CoreError::from))
            .map_err(|e| e.to_string());
        if let Err(message) = &result {
            warn!(error = %message, "system sample failed");
        }

        let saved = self
            .inner
            .state
            .write(|s| s.record_system_sample(result, Instant::now(), Local::now()));
        self.inner
            .redraw
            .request_all(PanelSet::of(&[Panel::System, Panel::Header, Panel::Footer]));

        if let Some((revision, history)) = saved {
            self.persist_history(revision, history).await;
        }
    }

    /// Fetch weather for the configured location, or install sample
    /// data when no API key is set.
    pub async fn refresh_weather(&self) {
        let (location, api_key, generation) = self.inner.state.read(|s| {
            (
                s.weather_location.clone(),
                s.weather_api_key.clone(),
                s.weather_generation,
            )
        });

        let (snapshot, failure) = match api_key {
            None => {
                debug!(%location, "no API key, installing sample weather");
                (WeatherSnapshot::sample(location, Local::now()), None)
            }
            Some(key) => match self.inner.weather.fetch_current(&key, &location).await {
                Ok(report) => {
                    debug!(%location, temp_c = report.temp_c, "weather updated");
                    (WeatherSnapshot::from_report(report, Local::now()), None)
                }
                Err(e) => {
                    warn!(error = %e, %location, "weather fetch failed");
                    let message = e.to_string();
                    (
                        WeatherSnapshot::failed(location, message.clone(), Local::now()),
                        Some(message),
                    )
                }
            },
        };

        let applied = self
            .inner
            .state
            .write(|s| s.commit_weather(generation, snapshot, failure));
        if applied {
            self.inner
                .redraw
                .request_all(PanelSet::of(&[Panel::Weather, Panel::Footer]));
        }
    }
}
