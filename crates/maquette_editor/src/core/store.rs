//! Reducer-style state store.
//!
//! All mutation of editor state goes through [`EditorStore::dispatch`].
//! Every action applies atomically; the notifications it produces are
//! collected into an outbox that the facade drains after the state update
//! completes, so no observer sees a partial update. Selection and hover
//! transitions are diffed against the previous state and emit exactly one
//! notification set per logical change.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::actions::{Action, ObjectPatch};
use crate::core::state::{EditorSettings, EditorState, HistorySnapshot};
use crate::events::EditorEvent;
use crate::scene::ObjectId;

/// Token returned by [`EditorStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

type Listener = Box<dyn FnMut(&EditorState)>;

/// Single source of truth, mutated only via named actions.
pub struct EditorStore {
    state: EditorState,
    outbox: VecDeque<EditorEvent>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: u64,
    next_snapshot_id: u64,
}

impl EditorStore {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            state: EditorState::new(settings),
            outbox: VecDeque::new(),
            listeners: Vec::new(),
            next_subscription_id: 1,
            next_snapshot_id: 1,
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply an action. State observers are notified once if the action
    /// changed anything; emitted events land in the outbox.
    pub fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {}", action.name());
        if self.reduce(action) {
            self.notify();
        }
    }

    /// Register a state observer, called once per applied action.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EditorState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a state observer. Returns `false` for unknown tokens.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub_id, _)| *sub_id != id);
        self.listeners.len() != before
    }

    /// Drain the events produced by dispatches since the last call.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.outbox.drain(..).collect()
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    fn reduce(&mut self, action: Action) -> bool {
        match action {
            Action::SetActiveTool(tool) => {
                let old = self.state.active_tool;
                if old == tool {
                    return false;
                }
                self.state.active_tool = tool;
                self.outbox
                    .push_back(EditorEvent::ToolChanged { old, new: tool });
                true
            }

            Action::SelectObjects(ids) => self.set_selection(ids),

            Action::AddSelection(id) => {
                // Idempotent: re-adding a selected id is a no-op.
                if self.state.selected_ids.contains(&id) {
                    return false;
                }
                let mut next = self.state.selected_ids.clone();
                next.push(id);
                self.set_selection(next)
            }

            Action::RemoveSelection(id) => {
                if !self.state.selected_ids.contains(&id) {
                    return false;
                }
                let next: Vec<ObjectId> = self
                    .state
                    .selected_ids
                    .iter()
                    .copied()
                    .filter(|&s| s != id)
                    .collect();
                self.set_selection(next)
            }

            Action::ClearSelection => self.set_selection(Vec::new()),

            Action::SetHoveredObject(id) => self.set_hover(id),

            Action::AddSceneObject(mut object) => {
                let id = object.id;
                if self.state.objects.contains_key(&id) {
                    log::warn!("ADD_SCENE_OBJECT: {id} already present");
                    return false;
                }
                // Attach to the parent atomically with the insert.
                if let Some(parent_id) = object.parent {
                    match self.state.objects.get_mut(&parent_id) {
                        Some(parent) => {
                            if !parent.children.contains(&id) {
                                parent.children.push(id);
                            }
                        }
                        None => {
                            log::warn!("ADD_SCENE_OBJECT: unknown parent {parent_id}, attaching {id} at root");
                            object.parent = None;
                        }
                    }
                }
                self.state.objects.insert(id, object);
                self.outbox.push_back(EditorEvent::ObjectAdded { id });
                true
            }

            Action::RemoveSceneObject(id) => {
                let Some(removed) = self.state.objects.remove(&id) else {
                    return false;
                };

                if let Some(parent_id) = removed.parent {
                    if let Some(parent) = self.state.objects.get_mut(&parent_id) {
                        parent.children.retain(|&c| c != id);
                    }
                }
                // Children are normally removed first by the scene graph;
                // promote any survivors to roots to keep the forest sound.
                for child_id in &removed.children {
                    if let Some(child) = self.state.objects.get_mut(child_id) {
                        log::warn!("REMOVE_SCENE_OBJECT: {id} still had child {child_id}");
                        child.parent = None;
                    }
                }

                // Cascade: drop from selection, clear matching hover.
                let next: Vec<ObjectId> = self
                    .state
                    .selected_ids
                    .iter()
                    .copied()
                    .filter(|&s| s != id)
                    .collect();
                self.set_selection(next);
                if self.state.hovered_id == Some(id) {
                    self.set_hover(None);
                }

                self.outbox.push_back(EditorEvent::ObjectRemoved { id });
                true
            }

            Action::UpdateSceneObject { id, patch } => self.update_object(id, patch),

            Action::UpdateCamera(delta) => {
                if delta.is_empty() {
                    return false;
                }
                delta.apply(&mut self.state.camera);
                self.outbox.push_back(EditorEvent::CameraChanged {
                    camera: self.state.camera,
                });
                true
            }

            Action::UpdateSettings(patch) => {
                patch.apply(&mut self.state.settings);
                true
            }

            Action::AddHistorySnapshot {
                description,
                camera,
                settings,
            } => {
                let snapshot = HistorySnapshot {
                    id: self.next_snapshot_id,
                    timestamp_ms: timestamp_ms(),
                    description,
                    selected_ids: self.state.selected_ids.clone(),
                    camera,
                    settings,
                };
                self.next_snapshot_id += 1;

                // Truncate the redo tail, append, then evict the oldest.
                let keep = (self.state.history_cursor + 1).max(0) as usize;
                self.state.history.truncate(keep);
                self.state.history.push(snapshot);
                if self.state.history.len() > self.state.max_history {
                    self.state.history.remove(0);
                }
                self.state.history_cursor = self.state.history.len() as isize - 1;
                true
            }

            Action::Undo => {
                if self.state.history_cursor > 0 {
                    self.state.history_cursor -= 1;
                    true
                } else {
                    false
                }
            }

            Action::Redo => {
                if self.state.history_cursor < self.state.history.len() as isize - 1 {
                    self.state.history_cursor += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Replace the selection, emitting one deselect-set and one select-set
    /// notification when the selection actually changes.
    fn set_selection(&mut self, next: Vec<ObjectId>) -> bool {
        let next = dedup_preserving_order(next);
        if next == self.state.selected_ids {
            return false;
        }

        let deselected: Vec<ObjectId> = self
            .state
            .selected_ids
            .iter()
            .copied()
            .filter(|id| !next.contains(id))
            .collect();

        self.state.selected_ids = next.clone();

        if !deselected.is_empty() {
            self.outbox
                .push_back(EditorEvent::ObjectsDeselected { ids: deselected });
        }
        if !next.is_empty() {
            self.outbox
                .push_back(EditorEvent::ObjectsSelected { ids: next });
        }
        true
    }

    fn set_hover(&mut self, next: Option<ObjectId>) -> bool {
        let previous = self.state.hovered_id;
        if previous == next {
            return false;
        }

        self.state.hovered_id = next;
        if let Some(id) = previous {
            self.outbox.push_back(EditorEvent::ObjectUnhovered { id });
        }
        if let Some(id) = next {
            self.outbox.push_back(EditorEvent::ObjectHovered { id });
        }
        true
    }

    fn update_object(&mut self, id: ObjectId, patch: ObjectPatch) -> bool {
        let Some(object) = self.state.objects.get_mut(&id) else {
            return false;
        };

        if let Some(name) = patch.name.clone() {
            object.name = name;
        }
        if let Some(visible) = patch.visible {
            object.visible = visible;
        }
        if let Some(position) = patch.position {
            object.transform.position = position;
        }
        if let Some(rotation) = patch.rotation {
            object.transform.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            object.transform.scale = scale;
        }

        if patch.touches_transform() {
            let transform = object.transform;
            self.outbox
                .push_back(EditorEvent::ObjectTransformed { id, transform });
        }
        true
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

fn dedup_preserving_order(ids: Vec<ObjectId>) -> Vec<ObjectId> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ManipulableObject, ObjectKind, RenderNodeId};

    fn object(id: u64) -> ManipulableObject {
        ManipulableObject::new(ObjectId(id), format!("obj-{id}"), ObjectKind::Mesh, RenderNodeId(id))
    }

    fn store_with_objects(ids: &[u64]) -> EditorStore {
        let mut store = EditorStore::default();
        for &id in ids {
            store.dispatch(Action::AddSceneObject(object(id)));
        }
        store.take_events();
        store
    }

    #[test]
    fn test_add_selection_is_idempotent() {
        let mut store = store_with_objects(&[1]);
        store.dispatch(Action::AddSelection(ObjectId(1)));
        store.take_events();

        store.dispatch(Action::AddSelection(ObjectId(1)));

        assert_eq!(store.state().selected_ids, vec![ObjectId(1)]);
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_selection_walk() {
        let mut store = store_with_objects(&[1, 2, 3]);

        store.dispatch(Action::SelectObjects(vec![ObjectId(1)]));
        store.dispatch(Action::AddSelection(ObjectId(2)));
        assert_eq!(store.state().selected_ids, vec![ObjectId(1), ObjectId(2)]);

        store.dispatch(Action::RemoveSelection(ObjectId(1)));
        assert_eq!(store.state().selected_ids, vec![ObjectId(2)]);
    }

    #[test]
    fn test_selection_diff_events() {
        let mut store = store_with_objects(&[1, 2]);
        store.dispatch(Action::SelectObjects(vec![ObjectId(1)]));
        store.take_events();

        store.dispatch(Action::SelectObjects(vec![ObjectId(2)]));
        let events = store.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            EditorEvent::ObjectsDeselected { ids } if ids == &vec![ObjectId(1)]
        ));
        assert!(matches!(
            &events[1],
            EditorEvent::ObjectsSelected { ids } if ids == &vec![ObjectId(2)]
        ));

        // Re-dispatching the identical selection is not re-notified.
        store.dispatch(Action::SelectObjects(vec![ObjectId(2)]));
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_hover_transition_not_reemitted() {
        let mut store = store_with_objects(&[1]);

        store.dispatch(Action::SetHoveredObject(Some(ObjectId(1))));
        assert_eq!(store.take_events().len(), 1);

        store.dispatch(Action::SetHoveredObject(Some(ObjectId(1))));
        assert!(store.take_events().is_empty());

        store.dispatch(Action::SetHoveredObject(None));
        let events = store.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EditorEvent::ObjectUnhovered { id } if id == ObjectId(1)));
    }

    #[test]
    fn test_remove_object_cascades() {
        let mut store = store_with_objects(&[1, 2]);
        store.dispatch(Action::SelectObjects(vec![ObjectId(1), ObjectId(2)]));
        store.dispatch(Action::SetHoveredObject(Some(ObjectId(1))));
        store.take_events();

        store.dispatch(Action::RemoveSceneObject(ObjectId(1)));

        let state = store.state();
        assert!(!state.objects.contains_key(&ObjectId(1)));
        assert_eq!(state.selected_ids, vec![ObjectId(2)]);
        assert_eq!(state.hovered_id, None);
    }

    #[test]
    fn test_remove_object_is_idempotent() {
        let mut store = store_with_objects(&[1]);
        store.dispatch(Action::RemoveSceneObject(ObjectId(1)));
        store.take_events();

        store.dispatch(Action::RemoveSceneObject(ObjectId(1)));
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_selection_always_subset_of_objects() {
        let mut store = store_with_objects(&[1, 2, 3]);
        store.dispatch(Action::SelectObjects(vec![ObjectId(1), ObjectId(2), ObjectId(3)]));
        store.dispatch(Action::RemoveSceneObject(ObjectId(2)));
        store.dispatch(Action::AddSelection(ObjectId(1)));
        store.dispatch(Action::RemoveSceneObject(ObjectId(1)));

        for id in &store.state().selected_ids {
            assert!(store.state().objects.contains_key(id));
        }
        assert_eq!(store.state().selected_ids, vec![ObjectId(3)]);
    }

    #[test]
    fn test_add_scene_object_links_parent() {
        let mut store = store_with_objects(&[1]);
        store.dispatch(Action::AddSceneObject(object(2).with_parent(Some(ObjectId(1)))));

        let parent = store.state().object(ObjectId(1)).unwrap();
        assert_eq!(parent.children, vec![ObjectId(2)]);
        assert_eq!(store.state().object(ObjectId(2)).unwrap().parent, Some(ObjectId(1)));
    }

    #[test]
    fn test_history_truncates_redo_tail() {
        let mut store = EditorStore::default();
        for i in 0..3 {
            store.dispatch(Action::AddHistorySnapshot {
                description: format!("s{i}"),
                camera: None,
                settings: None,
            });
        }
        store.dispatch(Action::Undo);
        store.dispatch(Action::Undo);
        assert_eq!(store.state().history_cursor, 0);

        store.dispatch(Action::AddHistorySnapshot {
            description: "fork".into(),
            camera: None,
            settings: None,
        });

        let state = store.state();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[1].description, "fork");
        assert_eq!(state.history_cursor, 1);
    }

    #[test]
    fn test_history_evicts_oldest_with_consistent_cursor() {
        let mut store = EditorStore::default();
        let max = store.state().max_history;

        for i in 0..=max {
            store.dispatch(Action::AddHistorySnapshot {
                description: format!("s{i}"),
                camera: None,
                settings: None,
            });
        }

        let state = store.state();
        assert_eq!(state.history.len(), max);
        assert_eq!(state.history[0].description, "s1");
        assert_eq!(state.history_cursor, max as isize - 1);
    }

    #[test]
    fn test_undo_redo_are_boundary_noops() {
        let mut store = EditorStore::default();
        store.dispatch(Action::Undo);
        assert_eq!(store.state().history_cursor, -1);

        store.dispatch(Action::AddHistorySnapshot {
            description: "s0".into(),
            camera: None,
            settings: None,
        });
        store.dispatch(Action::Redo);
        assert_eq!(store.state().history_cursor, 0);
        store.dispatch(Action::Undo);
        assert_eq!(store.state().history_cursor, 0);
    }

    #[test]
    fn test_update_object_emits_transform_event() {
        let mut store = store_with_objects(&[1]);

        store.dispatch(Action::UpdateSceneObject {
            id: ObjectId(1),
            patch: ObjectPatch::position(glam::Vec3::new(1.0, 2.0, 3.0)),
        });

        let events = store.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            EditorEvent::ObjectTransformed { id, transform }
                if *id == ObjectId(1) && transform.position == glam::Vec3::new(1.0, 2.0, 3.0)
        ));

        // Name-only patches do not report a transform.
        store.dispatch(Action::UpdateSceneObject {
            id: ObjectId(1),
            patch: ObjectPatch::default().with_name("renamed"),
        });
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut store = store_with_objects(&[1]);
        let count = std::rc::Rc::new(std::cell::Cell::new(0));

        let c = count.clone();
        let sub = store.subscribe(move |_| c.set(c.get() + 1));

        store.dispatch(Action::AddSelection(ObjectId(1)));
        assert_eq!(count.get(), 1);

        // No-op actions do not notify.
        store.dispatch(Action::AddSelection(ObjectId(1)));
        assert_eq!(count.get(), 1);

        assert!(store.unsubscribe(sub));
        store.dispatch(Action::ClearSelection);
        assert_eq!(count.get(), 1);
    }
}
