//! Core state management: the editor state, its action vocabulary, the
//! dispatching store, and the undo/redo layer.

pub mod actions;
pub mod history;
pub mod state;
pub mod store;

pub use actions::{Action, ObjectPatch};
pub use history::HistoryManager;
pub use state::{
    CameraDelta, EditorCamera, EditorSettings, EditorState, HistorySnapshot, SettingsPatch,
    DEFAULT_MAX_HISTORY,
};
pub use store::{EditorStore, SubscriptionId};
