// ── Refresh scheduling ──
//
// One long-lived task per producer. Each tick spawns the refresh as its
// own task so a slow fetch never holds up the timer, and a tick that
// arrives while the previous refresh is still running is skipped, so
// the same producer never runs twice at once. Refresh tasks are joined
// and panics are logged rather than lost.

use std::future::Future;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::dashboard::Dashboard;
use crate::store::Panel;

/// Handle to the running producers.
pub struct Producers {
    tasks: JoinSet<()>,
    cancel: CancellationToken,
}

impl Producers {
    pub(crate) fn start(dashboard: &Dashboard) -> Self {
        let cancel = dashboard.shutdown_token();
        let intervals = dashboard.config().intervals;
        let mut tasks = JoinSet::new();

        let system = dashboard.clone();
        tasks.spawn(run_periodic(
            "system",
            intervals.system,
            Duration::ZERO,
            cancel.clone(),
            move || {
                let dashboard = system.clone();
                async move { dashboard.refresh_system().await }
            },
        ));

        let weather = dashboard.clone();
        tasks.spawn(run_periodic(
            "weather",
            intervals.weather,
            intervals.weather_startup_delay,
            cancel.clone(),
            move || {
                let dashboard = weather.clone();
                async move { dashboard.refresh_weather().await }
            },
        ));

        tasks.spawn(run_clock(
            dashboard.clone(),
            intervals.clock,
            cancel.clone(),
        ));

        info!(
            system_secs = intervals.system.as_secs_f64(),
            weather_secs = intervals.weather.as_secs_f64(),
            clock_secs = intervals.clock.as_secs_f64(),
            "producers started"
        );
        Self { tasks, cancel }
    }

    /// Cancel every producer and wait for them to wind down.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        while let Some(result) = self.tasks.join_next().await {
            report("producer", result);
        }
        debug!("producers stopped");
    }
}

async fn run_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    initial_delay: Duration,
    cancel: CancellationToken,
    refresh: F,
) where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    if !initial_delay.is_zero() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(initial_delay) => {}
        }
    }

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        match in_flight.take() {
            Some(handle) if !handle.is_finished() => {
                debug!(producer = name, "previous refresh still running, tick skipped");
                in_flight = Some(handle);
            }
            finished => {
                if let Some(handle) = finished {
                    report(name, handle.await);
                }
                in_flight = Some(tokio::spawn(refresh()));
            }
        }
    }

    if let Some(handle) = in_flight {
        handle.abort();
        report(name, handle.await);
    }
}

async fn run_clock(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => dashboard.request_redraw(Panel::Clock),
        }
    }
}

/// Spawn a one-off task whose failure is logged.
pub(crate) fn spawn_supervised<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(future);
    tokio::spawn(async move { report(name, task.await) });
}

fn report(name: &'static str, result: Result<(), JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => error!(task = name, error = %e, "refresh task panicked"),
        Err(_) => debug!(task = name, "refresh task cancelled"),
    }
}
