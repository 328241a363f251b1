// State transitions for parsed commands. Runs entirely under the write
// lock; anything involving I/O is returned as an `Effects` request.

use super::{Command, CommandError, HELP_TEXT, SHORTCUT_TEXT, TODO_HELP_TEXT, parse};
use crate::model::{Notification, TodoItem};
use crate::store::{AppState, Effects, Panel, PanelSet};

impl AppState {
    /// Record, parse and apply one entered line.
    pub(crate) fn apply_line(&mut self, line: &str) -> Effects {
        let line = line.trim();
        if line.is_empty() {
            return Effects::default();
        }
        self.command_history.push(line);
        match parse(line) {
            Ok(Some(command)) => self.apply_command(command),
            Ok(None) => Effects::default(),
            Err(e) => self.reject(&e),
        }
    }

    pub(crate) fn apply_command(&mut self, command: Command) -> Effects {
        match command {
            Command::Help => self.inform(HELP_TEXT),
            Command::Shortcuts => self.inform(SHORTCUT_TEXT),
            Command::TodoHelp => self.inform(TODO_HELP_TEXT),
            Command::Exit => Effects {
                quit: true,
                ..Effects::default()
            },
            Command::Clear => {
                self.notifications.clear();
                Effects::redraw(&[Panel::Footer])
            }
            Command::Theme(theme) => {
                self.theme = theme;
                self.notify(Notification::success(format!("Theme changed to {theme}")));
                Effects {
                    redraw: PanelSet::all(),
                    ..Effects::default()
                }
            }
            Command::TodoAdd(text) => {
                self.todos.push(TodoItem::new(text.clone()));
                self.notify(Notification::success(format!("Added todo: {text}")));
                self.todo_effects()
            }
            Command::TodoToggle(index) => match index.resolve(self.todos.len()) {
                Ok(i) => {
                    if let Some(item) = self.todos.get_mut(i) {
                        item.done = !item.done;
                    }
                    self.notify(Notification::success(format!("Toggled todo #{}", i + 1)));
                    self.todo_effects()
                }
                Err(e) => self.reject(&e),
            },
            Command::TodoDelete(index) => match index.resolve(self.todos.len()) {
                Ok(i) => {
                    let removed = self.todos.remove(i);
                    self.notify(Notification::success(format!(
                        "Deleted todo: {}",
                        removed.text
                    )));
                    self.todo_effects()
                }
                Err(e) => self.reject(&e),
            },
            Command::WeatherSet(location) => {
                self.weather_location.clone_from(&location);
                self.weather_generation += 1;
                self.notify(Notification::success(format!(
                    "Weather location set to: {location}. Fetching..."
                )));
                Effects {
                    redraw: PanelSet::of(&[Panel::Weather, Panel::Footer]),
                    fetch_weather: true,
                    ..Effects::default()
                }
            }
        }
    }

    fn inform(&mut self, message: &str) -> Effects {
        self.notify(Notification::info(message));
        Effects::redraw(&[Panel::Footer])
    }

    fn reject(&mut self, error: &CommandError) -> Effects {
        self.notify(Notification::error(error.to_string()));
        Effects::redraw(&[Panel::Footer])
    }

    pub(crate) fn todo_effects(&mut self) -> Effects {
        Effects {
            redraw: PanelSet::of(&[Panel::Todo, Panel::Footer]),
            save_todos: Some(self.todos_changed()),
            ..Effects::default()
        }
    }
}
