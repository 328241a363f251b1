// ── Panel content ──
//
// Each panel is described as lines of styled segments. Segments carry a
// semantic role, not a colour; the renderer maps roles through the
// active palette. This keeps the engine independent of the terminal
// library.

pub mod format;
mod panels;

use chrono::{DateTime, Local};

use crate::store::{AppState, Panel};

pub use panels::month_grid;

/// What a piece of text means; the renderer picks the colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Main,
    Dim,
    Bright,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub role: Role,
    pub bold: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLine {
    pub segments: Vec<Segment>,
}

impl ViewLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn of(text: impl Into<String>, role: Role) -> Self {
        Self::blank().then(text, role)
    }

    pub fn then(mut self, text: impl Into<String>, role: Role) -> Self {
        self.segments.push(Segment::new(text, role));
        self
    }

    pub fn then_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Concatenated text without styling.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Border title; empty for the borderless header and footer.
    pub title: &'static str,
    pub lines: Vec<ViewLine>,
}

impl PanelView {
    /// Unstyled text, one line per row.
    pub fn plain(&self) -> String {
        self.lines
            .iter()
            .map(ViewLine::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the content of `panel` from a consistent view of the state.
pub fn build(panel: Panel, state: &AppState, now: DateTime<Local>) -> PanelView {
    match panel {
        Panel::Header => panels::header(state, now),
        Panel::System => panels::system(state),
        Panel::Weather => panels::weather(state),
        Panel::Clock => panels::clock(now),
        Panel::Todo => panels::todo(state),
        Panel::Footer => panels::footer(state),
    }
}
