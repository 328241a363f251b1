// ── State store ──
//
// Shared application state, the redraw signal and disk persistence.

pub mod persist;
pub mod redraw;
pub mod state;

pub use persist::{HISTORY_FILE, Loaded, Persistence, TODOS_FILE};
pub use redraw::{Panel, PanelSet, RedrawSignal};
pub use state::{AppState, COMMAND_HISTORY_LIMIT, CommandHistory, Effects, SharedState};
