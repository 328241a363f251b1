// ── Application state ──
//
// One struct owns every mutable field the dashboard has, behind a single
// reader/writer lock. Access goes through closures so a guard can never
// be held across an await or a file write.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use baseline_api::SystemSample;
use chrono::{DateTime, Local};
use secrecy::SecretString;
use tracing::debug;

use super::redraw::{Panel, PanelSet};
use crate::config::DashboardConfig;
use crate::model::{
    FocusMode, MetricHistory, MetricSample, Notification, NotificationQueue, SystemSnapshot,
    Theme, TodoItem, WeatherSnapshot, throughput,
};

/// Entered commands kept for recall.
pub const COMMAND_HISTORY_LIMIT: usize = 20;

// ── Command history ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// Position of the entry currently recalled into the input line.
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn push(&mut self, line: &str) {
        self.entries.push_back(line.to_owned());
        while self.entries.len() > COMMAND_HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.cursor = None;
    }

    /// Step towards older entries. Stops at the oldest one.
    pub fn older(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        let next = match self.cursor {
            None => last,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step towards newer entries. Past the newest, returns an empty line.
    pub fn newer(&mut self) -> Option<&str> {
        let current = self.cursor?;
        if current + 1 < self.entries.len() {
            self.cursor = Some(current + 1);
            self.entries.get(current + 1).map(String::as_str)
        } else {
            self.cursor = None;
            Some("")
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Effects ──────────────────────────────────────────────────────

/// Work a state transition asks for once the lock is released.
#[derive(Debug, Default)]
pub struct Effects {
    pub redraw: PanelSet,
    /// Todo list copied at `revision`, to be written to disk.
    pub save_todos: Option<(u64, Vec<TodoItem>)>,
    pub fetch_weather: bool,
    pub quit: bool,
}

impl Effects {
    pub fn redraw(panels: &[Panel]) -> Self {
        Self {
            redraw: PanelSet::of(panels),
            ..Self::default()
        }
    }
}

// ── AppState ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct NetCounters {
    pub rx: u64,
    pub tx: u64,
    pub at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub(crate) system: SystemSnapshot,
    pub(crate) history: MetricHistory,
    pub(crate) history_rev: u64,
    pub(crate) last_net: Option<NetCounters>,
    pub(crate) probe_failing: bool,

    pub(crate) weather: WeatherSnapshot,
    pub(crate) weather_location: String,
    pub(crate) weather_api_key: Option<Arc<SecretString>>,
    /// Bumped whenever the location changes; in-flight fetches for an
    /// older generation are discarded on completion.
    pub(crate) weather_generation: u64,
    pub(crate) weather_failing: bool,

    pub(crate) todos: Vec<TodoItem>,
    pub(crate) todo_rev: u64,

    pub(crate) notifications: NotificationQueue,
    pub(crate) command_history: CommandHistory,
    pub(crate) focus: FocusMode,
    pub(crate) theme: Theme,
    pub(crate) user_name: String,
}

impl AppState {
    pub fn new(config: &DashboardConfig, todos: Vec<TodoItem>, history: MetricHistory) -> Self {
        Self {
            system: SystemSnapshot::default(),
            history,
            history_rev: 0,
            last_net: None,
            probe_failing: false,
            weather: WeatherSnapshot::pending(config.weather_location.clone()),
            weather_location: config.weather_location.clone(),
            weather_api_key: config.weather_api_key.clone(),
            weather_generation: 0,
            weather_failing: false,
            todos,
            todo_rev: 0,
            notifications: NotificationQueue::default(),
            command_history: CommandHistory::default(),
            focus: FocusMode::Dashboard,
            theme: config.theme,
            user_name: config.user_name.clone(),
        }
    }

    // ── Read accessors ──

    pub fn system(&self) -> &SystemSnapshot {
        &self.system
    }

    pub fn history(&self) -> &MetricHistory {
        &self.history
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn weather_location(&self) -> &str {
        &self.weather_location
    }

    /// True when weather comes from the built-in sample.
    pub fn weather_sample_mode(&self) -> bool {
        self.weather_api_key.is_none()
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn command_history(&self) -> &CommandHistory {
        &self.command_history
    }

    pub fn focus(&self) -> FocusMode {
        self.focus
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    // ── Mutations ──

    pub fn notify(&mut self, notification: Notification) {
        debug!(kind = %notification.kind, message = %notification.message, "notification");
        self.notifications.push(notification);
    }

    pub(crate) fn set_focus(&mut self, focus: FocusMode) {
        self.focus = focus;
        self.command_history.reset_cursor();
    }

    /// Bump the todo revision and copy the list for saving.
    pub(crate) fn todos_changed(&mut self) -> (u64, Vec<TodoItem>) {
        self.todo_rev += 1;
        (self.todo_rev, self.todos.clone())
    }

    /// Fold a probe result into the state. On success returns the history
    /// copy to persist.
    pub(crate) fn record_system_sample(
        &mut self,
        result: Result<SystemSample, String>,
        at: Instant,
        now: DateTime<Local>,
    ) -> Option<(u64, MetricHistory)> {
        match result {
            Ok(sample) => {
                let (rx_rate, tx_rate) = self.last_net.map_or((0.0, 0.0), |prev| {
                    let elapsed = at.saturating_duration_since(prev.at).as_secs_f64();
                    (
                        throughput(prev.rx, sample.net_rx_bytes, elapsed),
                        throughput(prev.tx, sample.net_tx_bytes, elapsed),
                    )
                });
                self.last_net = Some(NetCounters {
                    rx: sample.net_rx_bytes,
                    tx: sample.net_tx_bytes,
                    at,
                });
                self.history.push(MetricSample {
                    cpu: sample.cpu_pct,
                    memory: sample.memory_pct,
                    timestamp: now.format("%H:%M:%S").to_string(),
                    network_in: sample.net_rx_bytes,
                    network_out: sample.net_tx_bytes,
                });
                self.history_rev += 1;
                self.probe_failing = false;
                self.system = SystemSnapshot::from_sample(sample, rx_rate, tx_rate, now);
                Some((self.history_rev, self.history.clone()))
            }
            Err(message) => {
                if !self.probe_failing {
                    self.probe_failing = true;
                    self.notify(Notification::error(format!(
                        "System metrics unavailable: {message}"
                    )));
                }
                self.system.error = Some(message);
                self.system.taken_at = Some(now);
                None
            }
        }
    }

    /// Install a finished weather fetch unless the location moved on
    /// while it was in flight. Returns whether it was applied.
    pub(crate) fn commit_weather(
        &mut self,
        generation: u64,
        snapshot: WeatherSnapshot,
        failure: Option<String>,
    ) -> bool {
        if generation != self.weather_generation {
            debug!(
                generation,
                current = self.weather_generation,
                "discarding weather result for a stale location"
            );
            return false;
        }
        match failure {
            Some(message) if !self.weather_failing => {
                self.weather_failing = true;
                self.notify(Notification::error(format!(
                    "Weather update failed: {message}"
                )));
            }
            Some(_) => {}
            None => self.weather_failing = false,
        }
        self.weather = snapshot;
        true
    }
}

// ── SharedState ──────────────────────────────────────────────────

/// Cloneable handle to the state lock.
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<RwLock<AppState>>,
}

impl SharedState {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let guard = self.inner.read().expect("app state lock poisoned");
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut guard = self.inner.write().expect("app state lock poisoned");
        f(&mut guard)
    }
}
