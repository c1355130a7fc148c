//! Tool state machine and the built-in Select and Drag tools.

pub mod drag_tool;
pub mod select_tool;
pub mod tool;

pub use drag_tool::{DragTool, PlaneConstraint, DRAG_OWNER, DRAG_TOOL_ID};
pub use select_tool::{SelectTool, SELECT_TOOL_ID};
pub use tool::{
    Modifiers, PointerButton, PointerEvent, Tool, ToolCtx, ToolId, ToolRegistry, ToolResult,
};
