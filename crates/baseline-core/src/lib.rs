//! Concurrent state engine behind the baseline terminal dashboard.
//!
//! This crate owns the dashboard's state and everything that mutates it:
//!
//! - **[`Dashboard`]**: Central facade. [`Dashboard::new`] loads persisted
//!   todos and metric history, [`Dashboard::start`] spawns the periodic
//!   producers, and [`Dashboard::handle_key`] routes keystrokes.
//!
//! - **[`SharedState`]**: The single [`AppState`] behind one
//!   reader/writer lock, reached only through `read(|s| ..)` /
//!   `write(|s| ..)` closures so no guard outlives a synchronous section.
//!
//! - **[`RedrawSignal`]**: Coalescing dirty-panel set the render loop
//!   waits on.
//!
//! - **Commands and keys** ([`command`], [`input`]): The command-line
//!   grammar and the two-state focus machine. Both are plain state
//!   transitions that return [`Effects`] (saves, fetches, redraws) which
//!   the dashboard carries out after the lock is released.
//!
//! - **Views** ([`view`]): Panel content as lines of role-tagged
//!   segments, independent of any terminal library.

pub mod command;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod input;
pub mod model;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandError};
pub use config::{DashboardConfig, Intervals};
pub use dashboard::{Dashboard, Sources};
pub use error::CoreError;
pub use input::{Key, Routed};
pub use scheduler::Producers;
pub use source::{MetricsSource, WeatherSource};
pub use store::{AppState, Effects, Panel, PanelSet, RedrawSignal, SharedState};
pub use view::{PanelView, Role, Segment, ViewLine};

pub use model::{
    FocusMode, MetricHistory, Notification, NotificationKind, Palette, Priority, Rgb, Theme,
    TodoItem, WeatherSnapshot,
};
