//! Scene graph, manipulable objects, and the render host seam.

pub mod graph;
pub mod object;
pub mod render;

pub use graph::{OwnerTag, SceneGraph};
pub use object::{ManipulableObject, ObjectId, ObjectKind, Transform};
pub use render::{Appearance, Highlight, MeshHost, RenderHost, RenderNodeId};
