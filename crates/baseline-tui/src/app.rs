//! Render loop and key handling.
//!
//! The loop sleeps until either a terminal event arrives or the engine
//! marks panels dirty, rebuilds only the dirty panel views, and draws
//! the whole frame from the cached views.

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tracing::{debug, info};
use tui_input::{Input, InputRequest};

use baseline_core::{Dashboard, FocusMode, Key, Palette, Panel, PanelView, Routed, ViewLine};

use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

const HEADER_HEIGHT: u16 = 3;
const PROMPT: &str = "> ";

pub struct App {
    dashboard: Dashboard,
    /// Command line contents while in command focus.
    input: Input,
    /// Last built view per panel; rebuilt only when the panel is dirty.
    views: HashMap<Panel, PanelView>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            input: Input::default(),
            views: HashMap::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::spawn();
        let shutdown = self.dashboard.shutdown_token();
        let dashboard = self.dashboard.clone();

        info!("render loop started");
        loop {
            self.refresh_views();
            tui.draw(|frame| self.render(frame))?;

            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                event = events.next() => match event {
                    Some(Event::Key(key)) => self.on_key(key),
                    // The next draw picks up the new size.
                    Some(Event::Resize(w, h)) => debug!(w, h, "terminal resized"),
                    None => break,
                },
                () = dashboard.redraw().changed() => {}
            }
        }

        events.stop();
        info!("render loop ended");
        Ok(())
    }

    /// Rebuild the views of every panel marked dirty since the last frame.
    fn refresh_views(&mut self) {
        for panel in self.dashboard.redraw().take().iter() {
            self.views.insert(panel, self.dashboard.view(panel));
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.dashboard.request_shutdown();
            return;
        }

        match self.dashboard.handle_key(core_key(key), self.input.value()) {
            Routed::Edit => {
                if let Some(request) = edit_request(key) {
                    self.input.handle(request);
                }
            }
            Routed::SetLine(line) => self.input = Input::new(line),
            Routed::Opened | Routed::Closed => self.input.reset(),
            Routed::Ignored | Routed::Handled | Routed::Quit => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let (palette, focus) = self
            .dashboard
            .state()
            .read(|s| (s.theme().palette(), s.focus()));

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        let halves = [Constraint::Percentage(50), Constraint::Percentage(50)];
        let [system, weather] = Layout::horizontal(halves).areas(top);
        let [clock, todo] = Layout::horizontal(halves).areas(bottom);

        self.render_panel(frame, Panel::Header, header, &palette);
        self.render_panel(frame, Panel::System, system, &palette);
        self.render_panel(frame, Panel::Weather, weather, &palette);
        self.render_panel(frame, Panel::Clock, clock, &palette);
        self.render_panel(frame, Panel::Todo, todo, &palette);

        if focus == FocusMode::CommandInput {
            self.render_command_line(frame, footer, &palette);
        } else {
            self.render_panel(frame, Panel::Footer, footer, &palette);
        }
    }

    fn render_panel(&self, frame: &mut Frame, panel: Panel, area: Rect, palette: &Palette) {
        let Some(view) = self.views.get(&panel) else {
            return;
        };
        let lines: Vec<Line> = view.lines.iter().map(|l| to_line(l, palette)).collect();

        let block = match panel {
            Panel::Header => Block::new()
                .borders(Borders::BOTTOM)
                .border_style(theme::border(palette)),
            Panel::Footer => Block::new(),
            _ => Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(theme::border(palette))
                .title(Span::styled(view.title, theme::title(palette))),
        };

        let paragraph = Paragraph::new(lines).block(block);
        let paragraph = if panel == Panel::Footer {
            paragraph
        } else {
            paragraph.wrap(Wrap { trim: false })
        };
        frame.render_widget(paragraph, area);
    }

    fn render_command_line(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let prompt_width = u16::try_from(PROMPT.len()).unwrap_or(2);
        let [prompt_area, input_area] =
            Layout::horizontal([Constraint::Length(prompt_width), Constraint::Min(0)]).areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(PROMPT, theme::prompt(palette))),
            prompt_area,
        );

        let scroll = self.input.visual_scroll(usize::from(input_area.width.saturating_sub(1)));
        frame.render_widget(
            Paragraph::new(Span::styled(self.input.value(), theme::input(palette)))
                .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            input_area,
        );

        let offset = self.input.visual_cursor().saturating_sub(scroll);
        let x = input_area
            .x
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
        frame.set_cursor_position((x, input_area.y));
    }
}

fn to_line(line: &ViewLine, palette: &Palette) -> Line<'static> {
    Line::from(
        line.segments
            .iter()
            .map(|s| Span::styled(s.text.clone(), theme::segment_style(s, palette)))
            .collect::<Vec<_>>(),
    )
}

// ── Key translation ───────────────────────────────────────────────────

/// Translate a terminal key into the engine's key vocabulary. Control and
/// Alt chords never count as shortcuts.
fn core_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Key::Char(c)
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        _ => Key::Other,
    }
}

/// Line-editing request for a key the engine handed back to the text field.
fn edit_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}
