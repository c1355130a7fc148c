//! Pointer interaction: hover tracking and click classification.
//!
//! Converts raw pointer coordinates into normalized pick rays and turns
//! clicks into selection actions. A press that travels less than the click
//! slop counts as a click on release; anything longer is a drag and is left
//! to the active tool.

use glam::Vec2;

use crate::core::actions::Action;
use crate::core::state::{EditorCamera, EditorState};
use crate::core::store::EditorStore;
use crate::scene::ObjectId;
use crate::tools::{Modifiers, PointerButton, PointerEvent};
use crate::viewport::{pick_ray, world_to_screen, Viewport};

/// Maximum pointer travel, in pixels, for a press to register as a click.
pub const CLICK_SLOP_PX: f32 = 5.0;

/// Horizontal offset of the contextual-menu anchor from the projected
/// object position.
pub const MENU_MARGIN_PX: f32 = 50.0;

/// Tracks pointer state between press and release.
#[derive(Clone, Copy, Debug)]
pub struct InteractionController {
    pointer_screen: Vec2,
    button_down: bool,
    press_screen: Vec2,
    moved_beyond_slop: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            pointer_screen: Vec2::ZERO,
            button_down: false,
            press_screen: Vec2::ZERO,
            moved_beyond_slop: false,
        }
    }

    pub fn pointer_screen(&self) -> Vec2 {
        self.pointer_screen
    }

    pub fn is_button_down(&self) -> bool {
        self.button_down
    }

    /// Record a button press.
    pub fn begin_press(&mut self, screen: Vec2) {
        self.pointer_screen = screen;
        self.button_down = true;
        self.press_screen = screen;
        self.moved_beyond_slop = false;
    }

    /// Record pointer movement.
    pub fn track_move(&mut self, screen: Vec2) {
        self.pointer_screen = screen;
        if self.button_down && (screen - self.press_screen).length() > CLICK_SLOP_PX {
            self.moved_beyond_slop = true;
        }
    }

    /// Record a button release; returns whether the press was a click.
    pub fn end_press(&mut self, screen: Vec2) -> bool {
        self.pointer_screen = screen;
        self.button_down = false;
        !self.moved_beyond_slop
    }

    /// Build the normalized pointer event for the current position.
    pub fn pointer_event(
        &self,
        camera: &EditorCamera,
        viewport: &Viewport,
        button: Option<PointerButton>,
        modifiers: Modifiers,
    ) -> PointerEvent {
        let ndc = viewport.to_ndc(self.pointer_screen);
        PointerEvent {
            screen: self.pointer_screen,
            ndc,
            ray: pick_ray(camera, viewport, ndc),
            button,
            modifiers,
        }
    }

    /// Update hover state; dispatches only when the picked id differs from
    /// the current hover.
    pub fn update_hover(&self, store: &mut EditorStore, pick: Option<ObjectId>) {
        if store.state().hovered_id != pick {
            store.dispatch(Action::SetHoveredObject(pick));
        }
    }

    /// Classify and apply a click.
    ///
    /// Plain click replaces the selection — unless the clicked object is the
    /// sole selected one, which is a deliberate no-op. Ctrl-click toggles
    /// membership when multi-select is enabled. A click on empty space
    /// clears the selection.
    pub fn handle_click(&self, store: &mut EditorStore, pick: Option<ObjectId>, modifiers: Modifiers) {
        let Some(id) = pick else {
            store.dispatch(Action::ClearSelection);
            return;
        };

        let state = store.state();
        let already_selected = state.is_selected(id);

        if modifiers.ctrl && state.settings.multi_select {
            if already_selected {
                store.dispatch(Action::RemoveSelection(id));
            } else {
                store.dispatch(Action::AddSelection(id));
            }
        } else {
            // Re-clicking the only selected object keeps the selection.
            if already_selected && state.selected_ids.len() == 1 {
                return;
            }
            store.dispatch(Action::SelectObjects(vec![id]));
        }
    }
}

/// Screen anchor for the contextual-menu collaborator: the object's
/// projected position offset to its right.
pub fn selection_anchor(state: &EditorState, viewport: &Viewport, id: ObjectId) -> Option<Vec2> {
    let object = state.object(id)?;
    let screen = world_to_screen(&state.camera, viewport, object.transform.position)?;
    Some(screen + Vec2::new(MENU_MARGIN_PX, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EditorEvent;
    use crate::scene::{ManipulableObject, ObjectKind, RenderNodeId};

    fn store_with_objects(ids: &[u64]) -> EditorStore {
        let mut store = EditorStore::default();
        for &id in ids {
            store.dispatch(Action::AddSceneObject(ManipulableObject::new(
                ObjectId(id),
                format!("obj-{id}"),
                ObjectKind::Mesh,
                RenderNodeId(id),
            )));
        }
        store.take_events();
        store
    }

    #[test]
    fn test_plain_click_replaces_selection() {
        let mut store = store_with_objects(&[1, 2]);
        let controller = InteractionController::new();

        controller.handle_click(&mut store, Some(ObjectId(1)), Modifiers::default());
        assert_eq!(store.state().selected_ids, vec![ObjectId(1)]);

        controller.handle_click(&mut store, Some(ObjectId(2)), Modifiers::default());
        assert_eq!(store.state().selected_ids, vec![ObjectId(2)]);
    }

    #[test]
    fn test_reclick_sole_selected_is_noop() {
        let mut store = store_with_objects(&[1]);
        let controller = InteractionController::new();

        controller.handle_click(&mut store, Some(ObjectId(1)), Modifiers::default());
        store.take_events();
        let before = store.state().selected_ids.clone();

        controller.handle_click(&mut store, Some(ObjectId(1)), Modifiers::default());

        assert_eq!(store.state().selected_ids, before);
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_modifier_click_toggles_membership() {
        let mut store = store_with_objects(&[1, 2]);
        let controller = InteractionController::new();
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };

        controller.handle_click(&mut store, Some(ObjectId(1)), Modifiers::default());
        controller.handle_click(&mut store, Some(ObjectId(2)), ctrl);
        assert_eq!(store.state().selected_ids, vec![ObjectId(1), ObjectId(2)]);

        controller.handle_click(&mut store, Some(ObjectId(1)), ctrl);
        assert_eq!(store.state().selected_ids, vec![ObjectId(2)]);
    }

    #[test]
    fn test_click_on_empty_clears_selection() {
        let mut store = store_with_objects(&[1]);
        let controller = InteractionController::new();

        controller.handle_click(&mut store, Some(ObjectId(1)), Modifiers::default());
        controller.handle_click(&mut store, None, Modifiers::default());

        assert!(store.state().selected_ids.is_empty());
    }

    #[test]
    fn test_hover_not_redispatched_for_identical_pick() {
        let mut store = store_with_objects(&[1]);
        let controller = InteractionController::new();

        controller.update_hover(&mut store, Some(ObjectId(1)));
        assert_eq!(store.take_events().len(), 1);

        controller.update_hover(&mut store, Some(ObjectId(1)));
        assert!(store.take_events().is_empty());

        controller.update_hover(&mut store, None);
        let events = store.take_events();
        assert!(matches!(events[0], EditorEvent::ObjectUnhovered { id } if id == ObjectId(1)));
    }

    #[test]
    fn test_click_slop() {
        let mut controller = InteractionController::new();

        controller.begin_press(Vec2::new(100.0, 100.0));
        controller.track_move(Vec2::new(102.0, 101.0));
        assert!(controller.end_press(Vec2::new(102.0, 101.0)));

        controller.begin_press(Vec2::new(100.0, 100.0));
        controller.track_move(Vec2::new(120.0, 100.0));
        // Returning near the press point does not make it a click again.
        controller.track_move(Vec2::new(101.0, 100.0));
        assert!(!controller.end_press(Vec2::new(101.0, 100.0)));
    }

    #[test]
    fn test_selection_anchor_offsets_projection() {
        let mut store = store_with_objects(&[1]);
        store.dispatch(Action::UpdateCamera(crate::core::CameraDelta {
            position: Some(glam::Vec3::new(0.0, 0.0, 5.0)),
            target: Some(glam::Vec3::ZERO),
            ..Default::default()
        }));
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);

        let anchor = selection_anchor(store.state(), &viewport, ObjectId(1)).unwrap();
        // Object at the origin projects to the viewport center.
        assert!((anchor - Vec2::new(400.0 + MENU_MARGIN_PX, 300.0)).length() < 0.5);
    }
}
