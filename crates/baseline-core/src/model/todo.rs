// ── Todo items ──

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Task priority. Anything unrecognized on disk or on the command line
/// reads as [`Priority::Medium`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lenient parse: case-insensitive, surrounding whitespace ignored,
    /// unknown values fall back to medium.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }

    /// low -> medium -> high -> low
    pub const fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Display order: high sorts first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or_else(Self::default, Self::parse_lenient))
    }
}

/// A single task. Storage order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            priority: Priority::Medium,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn completed(mut self) -> Self {
        self.done = true;
        self
    }
}

/// The list used on first run and whenever the todo file is unreadable.
pub fn seed_todos() -> Vec<TodoItem> {
    vec![
        TodoItem::new("Review project documentation"),
        TodoItem::new("Debug terminal interface")
            .with_priority(Priority::High)
            .completed(),
        TodoItem::new("Implement weather module"),
        TodoItem::new("Optimize system performance").with_priority(Priority::Low),
    ]
}

/// Presentation order: a stable sort by priority over a copy, so ties keep
/// storage order. Each entry carries its 1-based storage index, which is
/// the number `todo toggle` and `todo delete` accept.
pub fn display_order(todos: &[TodoItem]) -> Vec<(usize, &TodoItem)> {
    let mut rows: Vec<(usize, &TodoItem)> = todos
        .iter()
        .enumerate()
        .map(|(i, item)| (i + 1, item))
        .collect();
    rows.sort_by_key(|(_, item)| item.priority.rank());
    rows
}
