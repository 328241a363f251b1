// ── Input routing ──
//
// Two-state focus machine. In dashboard focus single characters are
// global shortcuts; in command focus keys belong to the command line
// except Enter, Escape and history recall.

use crate::model::{FocusMode, Notification};
use crate::store::{AppState, Effects, Panel};

pub const KEY_HELP_TEXT: &str = "Keys: N(ew), T(oggle), D(elete), P(rio), Q(uit), :(Cmd), ?(Help)";
pub const NEW_TASK_HINT: &str = "Use ':todo add <task>' to add a new task";
pub const FOOTER_HINT: &str = "Press ':' to enter command mode, '?' for help";

/// Terminal-independent key events the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Up,
    Down,
    Tab,
    Other,
}

/// What the terminal layer should do after routing a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Dashboard focus, not a shortcut: nothing happened.
    Ignored,
    /// Consumed; nothing for the terminal layer to do.
    Handled,
    /// Command focus: let the text field edit the line.
    Edit,
    /// Replace the command line with a recalled entry.
    SetLine(String),
    /// Command focus entered; start with an empty line.
    Opened,
    /// Command focus left (submitted or cancelled); clear the line.
    Closed,
    Quit,
}

impl AppState {
    pub(crate) fn route_key(&mut self, key: Key, line: &str) -> (Routed, Effects) {
        match self.focus {
            FocusMode::Dashboard => self.route_shortcut(key),
            FocusMode::CommandInput => self.route_command_key(key, line),
        }
    }

    fn route_shortcut(&mut self, key: Key) -> (Routed, Effects) {
        let Key::Char(c) = key else {
            return (Routed::Ignored, Effects::default());
        };
        let effects = match c {
            ':' => {
                self.set_focus(FocusMode::CommandInput);
                return (Routed::Opened, Effects::redraw(&[Panel::Footer]));
            }
            'q' => {
                return (
                    Routed::Quit,
                    Effects {
                        quit: true,
                        ..Effects::default()
                    },
                );
            }
            '?' => self.hint(KEY_HELP_TEXT),
            'n' => self.hint(NEW_TASK_HINT),
            't' => self.complete_first_pending(),
            'd' => self.delete_first_completed(),
            'p' => self.cycle_first_pending_priority(),
            _ => return (Routed::Ignored, Effects::default()),
        };
        (Routed::Handled, effects)
    }

    fn route_command_key(&mut self, key: Key, line: &str) -> (Routed, Effects) {
        match key {
            Key::Enter => {
                self.set_focus(FocusMode::Dashboard);
                let mut effects = self.apply_line(line);
                effects.redraw.insert(Panel::Footer);
                let routed = if effects.quit {
                    Routed::Quit
                } else {
                    Routed::Closed
                };
                (routed, effects)
            }
            Key::Esc => {
                self.set_focus(FocusMode::Dashboard);
                (Routed::Closed, Effects::redraw(&[Panel::Footer]))
            }
            Key::Up | Key::Tab => recalled(self.command_history.older()),
            Key::Down => recalled(self.command_history.newer()),
            Key::Char(_) | Key::Other => (Routed::Edit, Effects::default()),
        }
    }

    fn hint(&mut self, message: &str) -> Effects {
        self.notify(Notification::info(message));
        Effects::redraw(&[Panel::Footer])
    }

    fn complete_first_pending(&mut self) -> Effects {
        let Some(item) = self.todos.iter_mut().find(|t| !t.done) else {
            return self.hint("No pending tasks to toggle.");
        };
        item.done = true;
        let message = format!("Completed: {}", item.text);
        self.notify(Notification::success(message));
        self.todo_effects()
    }

    fn delete_first_completed(&mut self) -> Effects {
        let Some(index) = self.todos.iter().position(|t| t.done) else {
            return self.hint("No completed tasks to delete.");
        };
        let removed = self.todos.remove(index);
        self.notify(Notification::success(format!("Deleted: {}", removed.text)));
        self.todo_effects()
    }

    fn cycle_first_pending_priority(&mut self) -> Effects {
        let Some(item) = self.todos.iter_mut().find(|t| !t.done) else {
            return self.hint("No pending tasks to change priority.");
        };
        item.priority = item.priority.next();
        let message = format!("Priority set to {} for: {}", item.priority, item.text);
        self.notify(Notification::success(message));
        self.todo_effects()
    }
}

fn recalled(entry: Option<&str>) -> (Routed, Effects) {
    match entry {
        Some(line) => (Routed::SetLine(line.to_owned()), Effects::default()),
        None => (Routed::Handled, Effects::default()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::model::{MetricHistory, NotificationKind, Priority, TodoItem};

    fn state_with(todos: Vec<TodoItem>) -> AppState {
        AppState::new(
            &DashboardConfig::new("/tmp/unused"),
            todos,
            MetricHistory::default(),
        )
    }

    fn press(state: &mut AppState, c: char) -> Routed {
        state.route_key(Key::Char(c), "").0
    }

    #[test]
    fn t_completes_pending_in_storage_order() {
        let mut state = state_with(vec![
            TodoItem::new("A").with_priority(Priority::High),
            TodoItem::new("B").with_priority(Priority::Low),
        ]);

        assert_eq!(press(&mut state, 't'), Routed::Handled);
        assert!(state.todos()[0].done);
        assert!(!state.todos()[1].done);

        press(&mut state, 't');
        assert!(state.todos()[1].done);

        let before = state.todos().to_vec();
        let (_, effects) = state.route_key(Key::Char('t'), "");
        assert_eq!(state.todos(), before.as_slice());
        assert!(effects.save_todos.is_none());
        let latest = state.notifications().latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Info);
        assert_eq!(latest.message, "No pending tasks to toggle.");
    }

    #[test]
    fn d_deletes_first_completed() {
        let mut state = state_with(vec![
            TodoItem::new("keep"),
            TodoItem::new("gone").completed(),
            TodoItem::new("also done").completed(),
        ]);
        press(&mut state, 'd');
        let texts: Vec<&str> = state.todos().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["keep", "also done"]);
        assert_eq!(
            state.notifications().latest().unwrap().message,
            "Deleted: gone"
        );
    }

    #[test]
    fn p_cycles_priority_three_times_back_to_start() {
        let mut state = state_with(vec![TodoItem::new("x").with_priority(Priority::Low)]);
        for _ in 0..3 {
            press(&mut state, 'p');
        }
        assert_eq!(state.todos()[0].priority, Priority::Low);
        assert_eq!(
            state.notifications().latest().unwrap().message,
            "Priority set to low for: x"
        );
    }

    #[test]
    fn unbound_keys_pass_through_silently() {
        let mut state = state_with(Vec::new());
        assert_eq!(press(&mut state, 'z'), Routed::Ignored);
        assert_eq!(state.route_key(Key::Enter, "").0, Routed::Ignored);
        assert!(state.notifications().is_empty());
    }

    #[test]
    fn shifted_letters_are_not_shortcuts() {
        let mut state = state_with(vec![
            TodoItem::new("pending").with_priority(Priority::Low),
            TodoItem::new("finished").completed(),
        ]);
        let before = state.todos().to_vec();

        for c in ['T', 'D', 'P', 'Q', 'N'] {
            let (routed, effects) = state.route_key(Key::Char(c), "");
            assert_eq!(routed, Routed::Ignored, "{c}");
            assert!(!effects.quit, "{c}");
            assert!(effects.save_todos.is_none(), "{c}");
        }
        assert_eq!(state.todos(), before.as_slice());
        assert!(state.notifications().is_empty());
        assert_eq!(state.focus(), FocusMode::Dashboard);
    }

    #[test]
    fn colon_opens_and_enter_dispatches() {
        let mut state = state_with(Vec::new());
        assert_eq!(press(&mut state, ':'), Routed::Opened);
        assert_eq!(state.focus(), FocusMode::CommandInput);

        // shortcuts are suppressed while typing
        assert_eq!(press(&mut state, 'q'), Routed::Edit);

        let (routed, effects) = state.route_key(Key::Enter, "todo add Walk dog");
        assert_eq!(routed, Routed::Closed);
        assert!(effects.save_todos.is_some());
        assert_eq!(state.focus(), FocusMode::Dashboard);
        assert_eq!(state.todos()[0].text, "Walk dog");
    }

    #[test]
    fn escape_discards_line() {
        let mut state = state_with(Vec::new());
        press(&mut state, ':');
        let (routed, _) = state.route_key(Key::Esc, "todo add never");
        assert_eq!(routed, Routed::Closed);
        assert!(state.todos().is_empty());
        assert!(state.command_history().is_empty());
        assert_eq!(state.focus(), FocusMode::Dashboard);
    }

    #[test]
    fn exit_from_command_line_quits() {
        let mut state = state_with(Vec::new());
        press(&mut state, ':');
        assert_eq!(state.route_key(Key::Enter, "EXIT").0, Routed::Quit);
    }

    #[test]
    fn up_and_down_recall_history() {
        let mut state = state_with(Vec::new());
        press(&mut state, ':');
        state.route_key(Key::Enter, "help");
        press(&mut state, ':');
        state.route_key(Key::Enter, "shortcut");
        press(&mut state, ':');

        assert_eq!(
            state.route_key(Key::Up, "").0,
            Routed::SetLine("shortcut".into())
        );
        assert_eq!(
            state.route_key(Key::Up, "").0,
            Routed::SetLine("help".into())
        );
        assert_eq!(
            state.route_key(Key::Down, "").0,
            Routed::SetLine("shortcut".into())
        );
        assert_eq!(state.route_key(Key::Down, "").0, Routed::SetLine(String::new()));
    }
}
