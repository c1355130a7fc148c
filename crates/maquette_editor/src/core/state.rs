//! Central editor state - single source of truth.
//!
//! All editor data lives in `EditorState` and is mutated only through the
//! store's action dispatch. Readers that care about cross-field invariants
//! should go through the selector methods, which filter dangling ids
//! defensively.

use std::collections::HashMap;

use glam::Vec3;

use crate::scene::{ManipulableObject, ObjectId};
use crate::tools::ToolId;

/// Camera state consumed by projection and restored by history snapshots.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditorCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub zoom: f32,
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            zoom: 1.0,
        }
    }
}

/// Partial camera update; unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraDelta {
    pub position: Option<Vec3>,
    pub target: Option<Vec3>,
    pub zoom: Option<f32>,
}

impl CameraDelta {
    pub fn apply(&self, camera: &mut EditorCamera) {
        if let Some(position) = self.position {
            camera.position = position;
        }
        if let Some(target) = self.target {
            camera.target = target;
        }
        if let Some(zoom) = self.zoom {
            camera.zoom = zoom;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.target.is_none() && self.zoom.is_none()
    }
}

/// Editor configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditorSettings {
    // Selection
    pub multi_select: bool,
    pub select_through_meshes: bool,
    pub hover_preview: bool,

    // Transform
    pub snap_to_grid: bool,
    pub grid_size: f32,

    // Display
    pub show_grid: bool,
    pub show_axes: bool,
    pub show_bounding_boxes: bool,

    // Limits
    pub max_objects: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            multi_select: true,
            select_through_meshes: false,
            hover_preview: true,
            snap_to_grid: false,
            grid_size: 1.0,
            show_grid: true,
            show_axes: true,
            show_bounding_boxes: false,
            max_objects: 1000,
        }
    }
}

/// Partial settings update; unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SettingsPatch {
    pub multi_select: Option<bool>,
    pub select_through_meshes: Option<bool>,
    pub hover_preview: Option<bool>,
    pub snap_to_grid: Option<bool>,
    pub grid_size: Option<f32>,
    pub show_grid: Option<bool>,
    pub show_axes: Option<bool>,
    pub show_bounding_boxes: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut EditorSettings) {
        if let Some(v) = self.multi_select {
            settings.multi_select = v;
        }
        if let Some(v) = self.select_through_meshes {
            settings.select_through_meshes = v;
        }
        if let Some(v) = self.hover_preview {
            settings.hover_preview = v;
        }
        if let Some(v) = self.snap_to_grid {
            settings.snap_to_grid = v;
        }
        if let Some(v) = self.grid_size {
            settings.grid_size = v;
        }
        if let Some(v) = self.show_grid {
            settings.show_grid = v;
        }
        if let Some(v) = self.show_axes {
            settings.show_axes = v;
        }
        if let Some(v) = self.show_bounding_boxes {
            settings.show_bounding_boxes = v;
        }
    }
}

/// Immutable captured sub-state for undo/redo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistorySnapshot {
    pub id: u64,
    pub timestamp_ms: u64,
    pub description: String,
    pub selected_ids: Vec<ObjectId>,
    pub camera: Option<CameraDelta>,
    pub settings: Option<SettingsPatch>,
}

/// Default bound on the history list.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Central editor state.
#[derive(Debug)]
pub struct EditorState {
    /// Active tool name
    pub active_tool: ToolId,
    /// Selected objects, in selection order, deduplicated
    pub selected_ids: Vec<ObjectId>,
    /// Hovered object, if any
    pub hovered_id: Option<ObjectId>,
    /// Authoritative object table
    pub objects: HashMap<ObjectId, ManipulableObject>,
    /// Camera state
    pub camera: EditorCamera,
    /// Snapshot history
    pub history: Vec<HistorySnapshot>,
    /// Cursor into `history`; -1 when empty
    pub history_cursor: isize,
    /// Bound on `history`
    pub max_history: usize,
    /// Configuration
    pub settings: EditorSettings,
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            active_tool: ToolId("select"),
            selected_ids: Vec::new(),
            hovered_id: None,
            objects: HashMap::new(),
            camera: EditorCamera::default(),
            history: Vec::new(),
            history_cursor: -1,
            max_history: DEFAULT_MAX_HISTORY,
            settings,
        }
    }

    /// Get an object by id.
    pub fn object(&self, id: ObjectId) -> Option<&ManipulableObject> {
        self.objects.get(&id)
    }

    /// Check whether an object is selected.
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Selected objects in selection order. Ids without a backing object are
    /// filtered out rather than surfaced.
    pub fn selected_objects(&self) -> Vec<&ManipulableObject> {
        self.selected_ids
            .iter()
            .filter_map(|id| self.objects.get(id))
            .collect()
    }

    /// The hovered object, if it still exists.
    pub fn hovered_object(&self) -> Option<&ManipulableObject> {
        self.hovered_id.and_then(|id| self.objects.get(&id))
    }

    /// Objects without a parent.
    pub fn root_objects(&self) -> Vec<&ManipulableObject> {
        self.objects.values().filter(|o| o.parent.is_none()).collect()
    }

    /// Whether an object and all of its ancestors are visible.
    pub fn is_visible_in_hierarchy(&self, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.objects.get(&cid) {
                Some(obj) if obj.visible => current = obj.parent,
                _ => return false,
            }
        }
        true
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ObjectKind, RenderNodeId};

    fn object(id: u64) -> ManipulableObject {
        ManipulableObject::new(ObjectId(id), format!("obj-{id}"), ObjectKind::Mesh, RenderNodeId(id))
    }

    #[test]
    fn test_selectors_filter_dangling_ids() {
        let mut state = EditorState::default();
        state.objects.insert(ObjectId(1), object(1));
        state.selected_ids = vec![ObjectId(1), ObjectId(99)];
        state.hovered_id = Some(ObjectId(42));

        let selected = state.selected_objects();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, ObjectId(1));
        assert!(state.hovered_object().is_none());
    }

    #[test]
    fn test_hierarchy_visibility() {
        let mut state = EditorState::default();
        let mut parent = object(1);
        parent.visible = false;
        parent.children.push(ObjectId(2));
        let child = object(2).with_parent(Some(ObjectId(1)));
        state.objects.insert(ObjectId(1), parent);
        state.objects.insert(ObjectId(2), child);

        assert!(!state.is_visible_in_hierarchy(ObjectId(2)));
    }

    #[test]
    fn test_settings_patch_partial_apply() {
        let mut settings = EditorSettings::default();
        let patch = SettingsPatch {
            snap_to_grid: Some(true),
            grid_size: Some(0.5),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert!(settings.snap_to_grid);
        assert_eq!(settings.grid_size, 0.5);
        assert!(settings.multi_select);
    }

    #[test]
    fn test_settings_serialize_round_trip() {
        let settings = EditorSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: EditorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
