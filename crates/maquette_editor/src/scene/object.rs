//! Manipulable scene objects.
//!
//! A `ManipulableObject` wraps one renderable node and exposes the pieces
//! the editor manipulates: transform, visibility, and hierarchy. Hierarchy
//! links are stored as ids only; the authoritative object table lives in
//! `EditorState`.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::scene::render::RenderNodeId;

/// Object identifier used throughout the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Category of renderable a wrapper stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    Mesh,
    Group,
    Light,
    Camera,
    Helper,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Mesh => "Mesh",
            ObjectKind::Group => "Group",
            ObjectKind::Light => "Light",
            ObjectKind::Camera => "Camera",
            ObjectKind::Helper => "Helper",
        }
    }
}

/// Position/rotation/scale triplet. Rotation is XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// A manipulable entity wrapping one renderable node.
#[derive(Clone, Debug)]
pub struct ManipulableObject {
    /// Unique identifier
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Renderable category
    pub kind: ObjectKind,
    /// Whether the object is visible (and pickable)
    pub visible: bool,
    /// World transform
    pub transform: Transform,
    /// Opaque handle to the render node owned by the renderer
    pub render_node: RenderNodeId,
    /// Parent object, `None` for roots
    pub parent: Option<ObjectId>,
    /// Child object ids
    pub children: Vec<ObjectId>,
}

impl ManipulableObject {
    pub fn new(
        id: ObjectId,
        name: impl Into<String>,
        kind: ObjectKind,
        render_node: RenderNodeId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            visible: true,
            transform: Transform::new(),
            render_node,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: Option<ObjectId>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}
