// Panel builders. Pure functions of the state and the current time.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

use super::format::{fmt_pct_bar, fmt_rate, fmt_sparkline, fmt_uptime, truncate_name};
use super::{PanelView, Role, Segment, ViewLine};
use crate::input::FOOTER_HINT;
use crate::model::{FocusMode, NotificationKind, Priority, display_order};
use crate::store::AppState;

pub const APP_TITLE: &str = "BASELINE";

const BAR_WIDTH: u16 = 15;
const PROCESS_NAME_WIDTH: usize = 15;
const SPARKLINE_WIDTH: usize = 30;
const TODO_KEY_HINT: &str = "[N]ew [T]oggle [D]elete [P]riority [Q]uit [:]Cmd [?]Help";

const SAMPLE_FORECAST: [(&str, &str); 4] = [
    ("06:00", "18°C"),
    ("12:00", "22°C"),
    ("18:00", "20°C"),
    ("00:00", "16°C"),
];

const SAMPLE_AGENDA: [(&str, &str); 3] = [
    ("14:00", "Team Meeting"),
    ("16:30", "Project Review"),
    ("Tomorrow", "Deadline: Report"),
];

const CLOUD: [&str; 4] = [
    r"    \  /",
    r#"  _ /"".-.    "#,
    r"    \_(   ).  ",
    r"    /(___(__)  ",
];

// ── Header ──────────────────────────────────────────────────────────

pub(super) fn header(state: &AppState, now: DateTime<Local>) -> PanelView {
    let host = state.system().host_name.as_deref().unwrap_or("localhost");
    PanelView {
        title: "",
        lines: vec![
            ViewLine::blank().then_segment(Segment::new(APP_TITLE, Role::Main).bold()),
            ViewLine::of(
                format!(
                    "[Session: {}] [Terminal: {}@{host}]",
                    now.format("%Y-%m-%d"),
                    state.user_name()
                ),
                Role::Dim,
            ),
        ],
    }
}

// ── System ──────────────────────────────────────────────────────────

pub(super) fn system(state: &AppState) -> PanelView {
    let snapshot = state.system();
    let mut lines = vec![ViewLine::blank().then_segment(Segment::new("SYSTEM STATUS", Role::Bright).bold())];

    let Some(taken_at) = snapshot.taken_at else {
        lines.push(ViewLine::of("Collecting metrics...", Role::Dim));
        return PanelView {
            title: " System Status ",
            lines,
        };
    };

    if let Some(error) = &snapshot.error {
        lines.push(
            ViewLine::of("Status: ", Role::Main).then(error.clone(), Role::Error),
        );
    }

    match &snapshot.host_name {
        Some(host) => {
            lines.push(ViewLine::of(format!("Host: {host}"), Role::Main));
            lines.push(ViewLine::of(
                format!("OS: {}", snapshot.os.as_deref().unwrap_or("unknown")),
                Role::Main,
            ));
            lines.push(ViewLine::of(
                format!("Uptime: {}", fmt_uptime(snapshot.uptime_secs)),
                Role::Main,
            ));
            lines.push(ViewLine::of(
                format!("Boot: {}", fmt_boot_time(snapshot.boot_time_secs)),
                Role::Dim,
            ));
        }
        None => lines.push(ViewLine::of("Host/OS Info: Unavailable", Role::Dim)),
    }

    lines.push(ViewLine::blank());
    lines.push(pct_line("CPU", snapshot.cpu_pct));
    lines.push(pct_line("MEM", snapshot.memory_pct));
    lines.push(pct_line("DSK", snapshot.disk_pct));
    lines.push(
        ViewLine::of("NET: ", Role::Main).then(
            format!(
                "↓ {} ↑ {}",
                fmt_rate(snapshot.rx_rate),
                fmt_rate(snapshot.tx_rate)
            ),
            Role::Dim,
        ),
    );
    lines.push(
        ViewLine::of("LOAD: ", Role::Main).then(
            format!(
                "{:.2} {:.2} {:.2}",
                snapshot.load.one, snapshot.load.five, snapshot.load.fifteen
            ),
            Role::Dim,
        ),
    );
    if !state.history().is_empty() {
        lines.push(
            ViewLine::of("HIST: ", Role::Main).then(
                fmt_sparkline(state.history().cpu(), SPARKLINE_WIDTH),
                Role::Bright,
            ),
        );
    }

    lines.push(ViewLine::blank());
    lines.push(ViewLine::of("TOP PROCESSES:", Role::Main));
    if snapshot.top_processes.is_empty() {
        lines.push(ViewLine::of("(No active processes found)", Role::Dim));
    }
    for process in &snapshot.top_processes {
        lines.push(
            ViewLine::of(
                format!(
                    "{:<width$} ",
                    truncate_name(&process.name, PROCESS_NAME_WIDTH),
                    width = PROCESS_NAME_WIDTH
                ),
                Role::Dim,
            )
            .then(format!("CPU: {:.1}%", process.cpu_pct), Role::Main),
        );
    }

    lines.push(ViewLine::blank());
    lines.push(ViewLine::of(
        format!("Sampled: {}", taken_at.format("%H:%M:%S")),
        Role::Dim,
    ));

    PanelView {
        title: " System Status ",
        lines,
    }
}

fn pct_line(label: &str, pct: f64) -> ViewLine {
    let (filled, empty) = fmt_pct_bar(pct, BAR_WIDTH);
    ViewLine::of(format!("{label}: "), Role::Main)
        .then(filled, Role::Bright)
        .then(empty, Role::Dim)
        .then(format!(" {pct:.1}%"), Role::Bright)
}

fn fmt_boot_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| Local.timestamp_opt(s, 0).single())
        .map_or_else(|| "unknown".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

// ── Weather ─────────────────────────────────────────────────────────

pub(super) fn weather(state: &AppState) -> PanelView {
    let snapshot = state.weather();
    let mut lines = vec![ViewLine::blank().then_segment(Segment::new("WEATHER REPORT", Role::Bright).bold())];

    if snapshot.last_updated.is_none() {
        lines.push(ViewLine::of(
            format!("Location: {}", state.weather_location()),
            Role::Main,
        ));
        lines.push(ViewLine::of("Fetching weather...", Role::Dim));
        return PanelView {
            title: " Weather Report ",
            lines,
        };
    }

    if let Some(error) = &snapshot.error {
        lines.push(ViewLine::of(
            format!("Location: {}", state.weather_location()),
            Role::Main,
        ));
        lines.push(ViewLine::of("Status: ", Role::Main).then(error.clone(), Role::Error));
        if state.weather_sample_mode() {
            lines.push(ViewLine::blank());
            lines.push(ViewLine::of("Set WEATHER_API_KEY to fetch live data", Role::Dim));
            lines.push(ViewLine::blank());
            lines.extend(CLOUD.iter().map(|row| ViewLine::of(*row, Role::Bright)));
        }
    }
    if snapshot.has_reading() {
        if snapshot.error.is_none() {
            lines.push(ViewLine::of(format!("Location: {}", snapshot.location), Role::Main));
        }
        lines.push(ViewLine::of(
            format!("Temperature: {:.1}°C", snapshot.temp_c),
            Role::Main,
        ));
        lines.push(ViewLine::of(format!("Condition: {}", snapshot.condition), Role::Main));
        lines.push(ViewLine::of(format!("Humidity: {}%", snapshot.humidity), Role::Dim));
        lines.push(ViewLine::of(format!("Wind: {:.1} km/h", snapshot.wind_kph), Role::Dim));
    }

    lines.push(ViewLine::blank());
    lines.push(ViewLine::of("FORECAST (Sample):", Role::Main));
    lines.extend(
        SAMPLE_FORECAST
            .iter()
            .map(|(hour, temp)| ViewLine::of(format!("{hour}: {temp}"), Role::Dim)),
    );

    if let Some(updated) = snapshot.last_updated {
        lines.push(ViewLine::blank());
        lines.push(ViewLine::of(
            format!("Last updated: {}", updated.format("%H:%M:%S")),
            Role::Dim,
        ));
    }

    PanelView {
        title: " Weather Report ",
        lines,
    }
}

// ── Clock ───────────────────────────────────────────────────────────

pub(super) fn clock(now: DateTime<Local>) -> PanelView {
    let today = now.date_naive();
    let mut lines = vec![
        ViewLine::blank()
            .then_segment(Segment::new(now.format("%H:%M:%S").to_string(), Role::Bright).bold()),
        ViewLine::of(now.format("%A, %B %d, %Y").to_string(), Role::Main),
        ViewLine::blank(),
        ViewLine::of("     CALENDAR     ", Role::Main),
        ViewLine::of("Mo Tu We Th Fr Sa Su", Role::Dim),
    ];

    for week in month_grid(today) {
        let is_current = week.contains(&Some(today.day()));
        let base = if is_current { Role::Main } else { Role::Dim };
        let mut line = ViewLine::blank();
        for cell in week {
            line = match cell {
                Some(day) if day == today.day() => line.then(format!("{day:>2}*"), Role::Bright),
                Some(day) => line.then(format!("{day:>2} "), base),
                None => line.then("   ", base),
            };
        }
        lines.push(line);
    }

    lines.push(ViewLine::blank());
    lines.push(ViewLine::of("UPCOMING (Sample):", Role::Main));
    lines.extend(
        SAMPLE_AGENDA
            .iter()
            .map(|(when, what)| ViewLine::of(format!("{when}: "), Role::Dim).then(*what, Role::Main)),
    );

    PanelView {
        title: " Time & Calendar ",
        lines,
    }
}

/// Monday-first weeks of the month containing `date`; `None` pads cells
/// outside the month.
pub fn month_grid(date: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let Some(first) = date.with_day(1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_monday();
    let days = days_in_month(first);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = offset;
    for day in 1..=days {
        if let Some(cell) = week.get_mut(usize::try_from(slot).unwrap_or(0)) {
            *cell = Some(day);
        }
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot != 0 {
        weeks.push(week);
    }
    weeks
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(28, |last| last.day())
}

// ── Todo ────────────────────────────────────────────────────────────

pub(super) fn todo(state: &AppState) -> PanelView {
    let mut lines = Vec::new();
    if state.todos().is_empty() {
        lines.push(ViewLine::of("(no tasks, use :todo add <task>)", Role::Dim));
    }
    for (index, item) in display_order(state.todos()) {
        let (marker, marker_role) = match item.priority {
            Priority::High => ("!", Role::Bright),
            Priority::Medium => ("o", Role::Main),
            Priority::Low => ("-", Role::Dim),
        };
        let (status, status_role, text_role) = if item.done {
            ("[X]", Role::Bright, Role::Dim)
        } else {
            ("[ ]", Role::Main, Role::Main)
        };
        lines.push(
            ViewLine::of(format!("{index:>2} "), Role::Dim)
                .then(format!("[{marker}] "), marker_role)
                .then(format!("{status} "), status_role)
                .then(item.text.clone(), text_role),
        );
    }
    lines.push(ViewLine::blank());
    lines.push(ViewLine::of(TODO_KEY_HINT, Role::Dim));

    PanelView {
        title: " Task List ",
        lines,
    }
}

// ── Footer ──────────────────────────────────────────────────────────

pub(super) fn footer(state: &AppState) -> PanelView {
    let line = if state.focus() == FocusMode::CommandInput {
        ViewLine::blank()
    } else if let Some(latest) = state.notifications().latest() {
        let role = match latest.kind {
            NotificationKind::Error => Role::Error,
            NotificationKind::Success => Role::Success,
            NotificationKind::Info => Role::Main,
        };
        ViewLine::of(format!("[{}] ", latest.timestamp.format("%H:%M:%S")), Role::Dim)
            .then(latest.message.clone(), role)
    } else {
        ViewLine::of(FOOTER_HINT, Role::Dim)
    };
    PanelView {
        title: "",
        lines: vec![line],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::model::{MetricHistory, Notification, TodoItem, WeatherSnapshot};

    fn state_with(todos: Vec<TodoItem>) -> AppState {
        AppState::new(
            &DashboardConfig::new("/tmp/unused"),
            todos,
            MetricHistory::default(),
        )
    }

    #[test]
    fn month_grid_starts_on_monday() {
        // 1 March 2026 is a Sunday
        let grid = month_grid(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(grid[0], [None, None, None, None, None, None, Some(1)]);
        assert_eq!(grid[1][0], Some(2));
        assert_eq!(grid.last().unwrap()[1], Some(31));
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn february_leap_year() {
        let grid = month_grid(NaiveDate::from_ymd_opt(2028, 2, 1).unwrap());
        let days: Vec<u32> = grid.iter().flatten().flatten().copied().collect();
        assert_eq!(days.len(), 29);
    }

    #[test]
    fn todo_rows_sorted_with_storage_numbers() {
        let state = state_with(vec![
            TodoItem::new("later").with_priority(Priority::Low),
            TodoItem::new("now").with_priority(Priority::High).completed(),
        ]);
        let view = todo(&state);
        assert_eq!(view.lines[0].plain(), " 2 [!] [X] now");
        assert_eq!(view.lines[1].plain(), " 1 [-] [ ] later");
        assert_eq!(view.lines[0].segments[3].role, Role::Dim);
    }

    #[test]
    fn footer_shows_hint_then_latest_notification() {
        let mut state = state_with(Vec::new());
        assert_eq!(footer(&state).lines[0].plain(), FOOTER_HINT);

        state.notify(Notification::error("disk full"));
        let line = &footer(&state).lines[0];
        assert!(line.plain().ends_with("disk full"));
        assert_eq!(line.segments[1].role, Role::Error);

        state.focus = FocusMode::CommandInput;
        assert_eq!(footer(&state).lines[0].plain(), "");
    }

    #[test]
    fn sample_weather_shows_note_and_reading() {
        let mut state = state_with(Vec::new());
        state.weather = WeatherSnapshot::sample("Lahore", Local::now());
        let text = weather(&state).plain();
        assert!(text.contains("Status: API Key not set"));
        assert!(text.contains("Temperature: 22.0°C"));
        assert!(text.contains("Partly Cloudy (Sample)"));
        assert!(text.contains("FORECAST (Sample):"));
    }

    #[test]
    fn failed_weather_has_no_reading() {
        let mut state = state_with(Vec::new());
        state.weather_api_key = Some(std::sync::Arc::new("k".to_string().into()));
        state.weather = WeatherSnapshot::failed("Lahore", "API error: Status 503", Local::now());
        let text = weather(&state).plain();
        assert!(text.contains("Status: API error: Status 503"));
        assert!(!text.contains("Temperature"));
        assert!(!text.contains("WEATHER_API_KEY"));
    }

    #[test]
    fn system_before_first_sample() {
        let state = state_with(Vec::new());
        assert!(system(&state).plain().contains("Collecting metrics..."));
    }

    #[test]
    fn clock_marks_today() {
        let now = Local.with_ymd_and_hms(2026, 3, 15, 9, 30, 0).unwrap();
        let view = clock(now);
        assert_eq!(view.lines[0].plain(), "09:30:00");
        assert_eq!(view.lines[1].plain(), "Sunday, March 15, 2026");
        assert!(view.plain().contains("15*"));
    }
}
