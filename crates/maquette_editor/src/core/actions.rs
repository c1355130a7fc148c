//! The closed set of named actions that mutate editor state.

use glam::Vec3;

use crate::core::state::{CameraDelta, SettingsPatch};
use crate::scene::{ManipulableObject, ObjectId};
use crate::tools::ToolId;

/// Partial object update; unset fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl ObjectPatch {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether applying this patch changes the transform.
    pub fn touches_transform(&self) -> bool {
        self.position.is_some() || self.rotation.is_some() || self.scale.is_some()
    }
}

/// Actions accepted by [`EditorStore::dispatch`](crate::core::EditorStore::dispatch).
#[derive(Clone, Debug)]
pub enum Action {
    SetActiveTool(ToolId),
    SelectObjects(Vec<ObjectId>),
    AddSelection(ObjectId),
    RemoveSelection(ObjectId),
    ClearSelection,
    SetHoveredObject(Option<ObjectId>),
    AddSceneObject(ManipulableObject),
    RemoveSceneObject(ObjectId),
    UpdateSceneObject { id: ObjectId, patch: ObjectPatch },
    UpdateCamera(CameraDelta),
    UpdateSettings(SettingsPatch),
    AddHistorySnapshot {
        description: String,
        camera: Option<CameraDelta>,
        settings: Option<SettingsPatch>,
    },
    Undo,
    Redo,
}

impl Action {
    /// Action name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetActiveTool(_) => "SET_ACTIVE_TOOL",
            Action::SelectObjects(_) => "SELECT_OBJECTS",
            Action::AddSelection(_) => "ADD_SELECTION",
            Action::RemoveSelection(_) => "REMOVE_SELECTION",
            Action::ClearSelection => "CLEAR_SELECTION",
            Action::SetHoveredObject(_) => "SET_HOVERED_OBJECT",
            Action::AddSceneObject(_) => "ADD_SCENE_OBJECT",
            Action::RemoveSceneObject(_) => "REMOVE_SCENE_OBJECT",
            Action::UpdateSceneObject { .. } => "UPDATE_SCENE_OBJECT",
            Action::UpdateCamera(_) => "UPDATE_CAMERA",
            Action::UpdateSettings(_) => "UPDATE_SETTINGS",
            Action::AddHistorySnapshot { .. } => "ADD_HISTORY_SNAPSHOT",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
        }
    }
}
