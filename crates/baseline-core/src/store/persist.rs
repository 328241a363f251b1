// ── Disk persistence ──
//
// Two pretty-printed JSON files under the data directory. Loads never
// fail: a missing file yields defaults, an unreadable one yields
// defaults plus a warning. Saves carry the revision of the state they
// were copied from and are dropped when a newer revision already
// reached disk, so concurrent savers cannot regress a file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{HISTORY_LIMIT, MetricHistory, TodoItem, seed_todos};

pub const TODOS_FILE: &str = "todos.json";
pub const HISTORY_FILE: &str = "system_history.json";

/// A loaded value and the problem encountered while loading it, if any.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<CoreError>,
}

#[derive(Debug)]
pub struct Persistence {
    data_dir: PathBuf,
    todos_path: PathBuf,
    history_path: PathBuf,
    /// Highest revision written per file.
    todos_written: Mutex<u64>,
    history_written: Mutex<u64>,
}

impl Persistence {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            todos_path: data_dir.join(TODOS_FILE),
            history_path: data_dir.join(HISTORY_FILE),
            data_dir,
            todos_written: Mutex::new(0),
            history_written: Mutex::new(0),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn todos_path(&self) -> &Path {
        &self.todos_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn ensure_dir(&self) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| CoreError::DataDir {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Todos from disk, or the seed list when absent or unreadable.
    pub fn load_todos(&self) -> Loaded<Vec<TodoItem>> {
        match read_json::<Vec<TodoItem>>(&self.todos_path) {
            Ok(Some(todos)) => Loaded {
                value: todos,
                warning: None,
            },
            Ok(None) => {
                debug!(path = %self.todos_path.display(), "no todo file, using seed list");
                Loaded {
                    value: seed_todos(),
                    warning: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "todo file unusable, using seed list");
                Loaded {
                    value: seed_todos(),
                    warning: Some(e),
                }
            }
        }
    }

    /// History from disk, normalized; empty when absent or unreadable.
    pub fn load_history(&self) -> Loaded<MetricHistory> {
        match read_json::<MetricHistory>(&self.history_path) {
            Ok(Some(mut history)) => {
                history.normalize();
                Loaded {
                    value: history,
                    warning: None,
                }
            }
            Ok(None) => Loaded {
                value: MetricHistory::default(),
                warning: None,
            },
            Err(e) => {
                warn!(error = %e, "history file unusable, starting empty");
                Loaded {
                    value: MetricHistory::default(),
                    warning: Some(e),
                }
            }
        }
    }

    pub fn save_todos(&self, revision: u64, todos: &[TodoItem]) -> Result<(), CoreError> {
        let mut written = self.todos_written.lock().expect("todo save lock poisoned");
        if revision <= *written {
            debug!(revision, written = *written, "stale todo save skipped");
            return Ok(());
        }
        write_json(&self.todos_path, "todos", &todos)?;
        *written = revision;
        Ok(())
    }

    pub fn save_history(&self, revision: u64, history: &MetricHistory) -> Result<(), CoreError> {
        let mut written = self
            .history_written
            .lock()
            .expect("history save lock poisoned");
        if revision <= *written {
            debug!(revision, written = *written, "stale history save skipped");
            return Ok(());
        }
        let mut trimmed = history.clone();
        trimmed.trim(HISTORY_LIMIT);
        write_json(&self.history_path, "history", &trimmed)?;
        *written = revision;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), CoreError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|source| CoreError::Encode { what, source })?;
    std::fs::write(path, body).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
