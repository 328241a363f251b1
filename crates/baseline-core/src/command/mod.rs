// ── Command line grammar ──
//
// `verb [subcommand] [args...]`, whitespace separated. Verbs and
// subcommands match case-insensitively; argument text keeps its case.

mod apply;

use thiserror::Error;

use crate::model::Theme;

pub const HELP_TEXT: &str = "Cmds: help, todo, weather, clear, exit, theme, shortcut";
pub const SHORTCUT_TEXT: &str = "Shortcuts: N(ew), T(oggle), D(elete), P(rio), Q(uit), :(Cmd), ?(Help)";
pub const TODO_HELP_TEXT: &str = "Todo commands: add, toggle, delete";

/// Rejections produced while parsing or applying a command. The display
/// text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown theme: {name}. Available: {available}")]
    UnknownTheme { name: String, available: String },

    #[error("Invalid todo index: {0}")]
    InvalidIndex(String),

    #[error("Unknown todo command: {0}")]
    UnknownTodoCommand(String),

    #[error("Unknown command: {0}")]
    Unknown(String),
}

/// A 1-based todo index as typed; validated against the list when the
/// command is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoIndex(String);

impl TodoIndex {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Zero-based position, if the text names an existing item.
    pub fn resolve(&self, len: usize) -> Result<usize, CommandError> {
        match self.0.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
            _ => Err(CommandError::InvalidIndex(self.0.clone())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Clear,
    Shortcuts,
    Theme(Theme),
    TodoHelp,
    TodoAdd(String),
    TodoToggle(TodoIndex),
    TodoDelete(TodoIndex),
    WeatherSet(String),
}

/// Parse one entered line. `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "clear" => Command::Clear,
        "shortcut" | "shortcuts" => Command::Shortcuts,
        "theme" => parse_theme(&args)?,
        "todo" => parse_todo(&args)?,
        "weather" => parse_weather(&args)?,
        _ => return Err(CommandError::Unknown(verb.to_owned())),
    };
    Ok(Some(command))
}

fn parse_theme(args: &[&str]) -> Result<Command, CommandError> {
    let [name] = args else {
        return Err(CommandError::Usage("theme <themename>"));
    };
    name.parse::<Theme>()
        .map(Command::Theme)
        .map_err(|_| CommandError::UnknownTheme {
            name: (*name).to_owned(),
            available: Theme::available(),
        })
}

fn parse_todo(args: &[&str]) -> Result<Command, CommandError> {
    let Some((sub, rest)) = args.split_first() else {
        return Ok(Command::TodoHelp);
    };
    match sub.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                Err(CommandError::Usage("todo add <task text>"))
            } else {
                Ok(Command::TodoAdd(rest.join(" ")))
            }
        }
        "toggle" | "done" => match rest {
            [index] => Ok(Command::TodoToggle(TodoIndex::new(*index))),
            _ => Err(CommandError::Usage("todo toggle <index>")),
        },
        "delete" | "rm" => match rest {
            [index] => Ok(Command::TodoDelete(TodoIndex::new(*index))),
            _ => Err(CommandError::Usage("todo delete <index>")),
        },
        _ => Err(CommandError::UnknownTodoCommand((*sub).to_owned())),
    }
}

fn parse_weather(args: &[&str]) -> Result<Command, CommandError> {
    match args.split_first() {
        Some((sub, location)) if sub.eq_ignore_ascii_case("set") && !location.is_empty() => {
            Ok(Command::WeatherSet(location.join(" ")))
        }
        _ => Err(CommandError::Usage("weather set <location>")),
    }
}
