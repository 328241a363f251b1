// ── Domain model ──
//
// Plain data types shared by the store, the command layer and the
// views. Nothing in here performs I/O.

pub mod history;
pub mod notification;
pub mod system;
pub mod theme;
pub mod todo;
pub mod weather;

pub use history::{HISTORY_LIMIT, MetricHistory, MetricSample};
pub use notification::{NOTIFICATION_LIMIT, Notification, NotificationKind, NotificationQueue};
pub use system::{SystemSnapshot, throughput};
pub use theme::{Palette, Rgb, Theme};
pub use todo::{Priority, TodoItem, display_order, seed_todos};
pub use weather::WeatherSnapshot;

/// Which widget receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusMode {
    #[default]
    Dashboard,
    CommandInput,
}
