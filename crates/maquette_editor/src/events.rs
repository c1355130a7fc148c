//! Editor event vocabulary.
//!
//! Fixed payload shapes for every channel the core publishes. The store and
//! the tools produce these; the facade pumps them through the
//! [`EventBus`](maquette_event::EventBus) and routes them to the active tool.

use glam::{Vec2, Vec3};

use crate::core::state::EditorCamera;
use crate::scene::{ObjectId, Transform};
use crate::tools::ToolId;

/// Notifications published by the editor core.
#[derive(Clone, Debug)]
pub enum EditorEvent {
    /// The selection changed; carries the full new selection.
    ObjectsSelected { ids: Vec<ObjectId> },
    /// Objects dropped from the selection by the latest change.
    ObjectsDeselected { ids: Vec<ObjectId> },
    ObjectHovered { id: ObjectId },
    ObjectUnhovered { id: ObjectId },
    ToolChanged { old: ToolId, new: ToolId },
    ObjectAdded { id: ObjectId },
    ObjectRemoved { id: ObjectId },
    ObjectTransformed { id: ObjectId, transform: Transform },
    DragStarted { id: ObjectId, start: Vec3 },
    DragUpdated { id: ObjectId, position: Vec3, delta: Vec3 },
    DragEnded { id: ObjectId, start: Vec3, end: Vec3, delta: Vec3 },
    CameraChanged { camera: EditorCamera },
    /// Screen anchor for the contextual menu collaborator, published after a
    /// selection becomes non-empty.
    SelectionAnchor { id: ObjectId, position: Vec2 },
}

/// Channel discriminants for [`EditorEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorEventKind {
    ObjectsSelected,
    ObjectsDeselected,
    ObjectHovered,
    ObjectUnhovered,
    ToolChanged,
    ObjectAdded,
    ObjectRemoved,
    ObjectTransformed,
    DragStarted,
    DragUpdated,
    DragEnded,
    CameraChanged,
    SelectionAnchor,
}

impl maquette_event::Event for EditorEvent {
    type Kind = EditorEventKind;

    fn kind(&self) -> EditorEventKind {
        match self {
            EditorEvent::ObjectsSelected { .. } => EditorEventKind::ObjectsSelected,
            EditorEvent::ObjectsDeselected { .. } => EditorEventKind::ObjectsDeselected,
            EditorEvent::ObjectHovered { .. } => EditorEventKind::ObjectHovered,
            EditorEvent::ObjectUnhovered { .. } => EditorEventKind::ObjectUnhovered,
            EditorEvent::ToolChanged { .. } => EditorEventKind::ToolChanged,
            EditorEvent::ObjectAdded { .. } => EditorEventKind::ObjectAdded,
            EditorEvent::ObjectRemoved { .. } => EditorEventKind::ObjectRemoved,
            EditorEvent::ObjectTransformed { .. } => EditorEventKind::ObjectTransformed,
            EditorEvent::DragStarted { .. } => EditorEventKind::DragStarted,
            EditorEvent::DragUpdated { .. } => EditorEventKind::DragUpdated,
            EditorEvent::DragEnded { .. } => EditorEventKind::DragEnded,
            EditorEvent::CameraChanged { .. } => EditorEventKind::CameraChanged,
            EditorEvent::SelectionAnchor { .. } => EditorEventKind::SelectionAnchor,
        }
    }
}
