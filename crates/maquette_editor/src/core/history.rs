//! Undo/redo layered on the store's history actions.
//!
//! Snapshots capture store-level sub-state only (selection, optional camera
//! and settings deltas). Scene-graph mutations are not captured or restored
//! here; hosts bracket multi-step edits with [`HistoryManager::start_batch`]
//! and [`HistoryManager::end_batch`] instead.

use crate::core::actions::Action;
use crate::core::state::{CameraDelta, EditorState, HistorySnapshot, SettingsPatch};
use crate::core::store::EditorStore;

/// Bounded undo/redo manager.
#[derive(Clone, Copy, Debug, Default)]
pub struct HistoryManager;

impl HistoryManager {
    pub fn new() -> Self {
        Self
    }

    /// Record the current selection plus any provided deltas.
    pub fn add_snapshot(
        &self,
        store: &mut EditorStore,
        description: impl Into<String>,
        camera: Option<CameraDelta>,
        settings: Option<SettingsPatch>,
    ) {
        store.dispatch(Action::AddHistorySnapshot {
            description: description.into(),
            camera,
            settings,
        });
    }

    /// Re-apply the previous snapshot's captured sub-state and move the
    /// cursor back. Returns `false` at the start of history.
    pub fn undo(&self, store: &mut EditorStore) -> bool {
        let state = store.state();
        if !self.can_undo(state) {
            return false;
        }

        let previous = state.history[(state.history_cursor - 1) as usize].clone();
        self.restore(store, &previous);
        store.dispatch(Action::Undo);
        true
    }

    /// Re-apply the next snapshot's captured sub-state and move the cursor
    /// forward. Returns `false` at the end of history.
    pub fn redo(&self, store: &mut EditorStore) -> bool {
        let state = store.state();
        if !self.can_redo(state) {
            return false;
        }

        let next = state.history[(state.history_cursor + 1) as usize].clone();
        self.restore(store, &next);
        store.dispatch(Action::Redo);
        true
    }

    pub fn can_undo(&self, state: &EditorState) -> bool {
        state.history_cursor > 0
    }

    pub fn can_redo(&self, state: &EditorState) -> bool {
        state.history_cursor < state.history.len() as isize - 1
    }

    /// Open a multi-step edit with a boundary snapshot; a single undo from
    /// inside the batch returns to this point.
    pub fn start_batch(&self, store: &mut EditorStore, description: &str) {
        self.add_snapshot(store, format!("Start: {description}"), None, None);
    }

    /// Close a multi-step edit with a boundary snapshot.
    pub fn end_batch(&self, store: &mut EditorStore, description: &str) {
        self.add_snapshot(store, format!("Complete: {description}"), None, None);
    }

    fn restore(&self, store: &mut EditorStore, snapshot: &HistorySnapshot) {
        store.dispatch(Action::SelectObjects(snapshot.selected_ids.clone()));
        if let Some(camera) = snapshot.camera {
            store.dispatch(Action::UpdateCamera(camera));
        }
        if let Some(settings) = snapshot.settings {
            store.dispatch(Action::UpdateSettings(settings));
        }
    }
}
