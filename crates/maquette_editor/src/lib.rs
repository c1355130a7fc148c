//! Maquette Editor Core
//!
//! The interactive manipulation core of a 3D scene editor: a retained graph
//! of manipulable objects, pointer-driven selection and dragging through a
//! pluggable tool state machine, and a bounded undo/redo history.
//!
//! ## Architecture
//!
//! ```text
//! Pointer Input -> InteractionController -> Action -> EditorStore
//!                                                        |
//!                        Tools  <-  event pump  <-  notifications
//! ```
//!
//! A single store holds all editor state and is mutated only through named
//! actions. Every state transition is diffed and published once through the
//! event bus; the facade routes the notifications to the active tool and to
//! external subscribers in the same synchronous drain. Rendering, physics,
//! and UI stay outside: the renderer is consumed through the narrow
//! [`RenderHost`] seam, and procedural transform drivers coordinate with
//! tools through per-object manipulation owner tags.

pub mod core;
pub mod editor;
pub mod error;
pub mod events;
pub mod interaction;
pub mod scene;
pub mod tools;
pub mod viewport;

pub use crate::core::{
    Action, CameraDelta, EditorCamera, EditorSettings, EditorState, EditorStore, HistoryManager,
    HistorySnapshot, ObjectPatch, SettingsPatch, SubscriptionId,
};
pub use crate::editor::{EditorCore, EditorCoreOptions};
pub use crate::error::SceneError;
pub use crate::events::{EditorEvent, EditorEventKind};
pub use crate::interaction::InteractionController;
pub use crate::scene::{
    Appearance, Highlight, ManipulableObject, MeshHost, ObjectId, ObjectKind, OwnerTag,
    RenderHost, RenderNodeId, SceneGraph, Transform,
};
pub use crate::tools::{
    DragTool, Modifiers, PlaneConstraint, PointerButton, PointerEvent, SelectTool, Tool, ToolCtx,
    ToolId, ToolRegistry, ToolResult, DRAG_TOOL_ID, SELECT_TOOL_ID,
};
pub use crate::viewport::Viewport;

/// Editor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Editor core name
pub const NAME: &str = "Maquette Editor Core";
