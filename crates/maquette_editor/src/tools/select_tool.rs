//! Selection tool: highlights the current selection and, optionally, the
//! hovered object.
//!
//! The tool saves each object's pre-highlight appearance in a single-slot
//! map before the first override and restores exactly that saved appearance
//! on deselect/unhover. Switching between hover and select highlights on the
//! same object keeps the original slot intact.

use std::collections::HashMap;

use crate::events::EditorEvent;
use crate::scene::{Appearance, Highlight, ObjectId, ObjectKind};
use crate::tools::tool::{Tool, ToolCtx, ToolId};

pub const SELECT_TOOL_ID: ToolId = ToolId("select");

/// Selection highlight tool.
pub struct SelectTool {
    /// Pre-highlight appearance per object; one slot, saved before the first
    /// override and removed on restore.
    saved: HashMap<ObjectId, Appearance>,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectTool {
    pub fn new() -> Self {
        Self {
            saved: HashMap::new(),
        }
    }

    fn highlight(&mut self, ctx: &mut ToolCtx, id: ObjectId, highlight: Highlight) {
        let Some((node, kind)) = ctx
            .store
            .state()
            .object(id)
            .map(|o| (o.render_node, o.kind))
        else {
            return;
        };
        if kind != ObjectKind::Mesh {
            return;
        }

        let host = ctx.scene.host_mut();
        if !self.saved.contains_key(&id) {
            let Some(current) = host.appearance(node) else {
                return;
            };
            self.saved.insert(id, current);
        }
        host.set_appearance(node, highlight.appearance());
    }

    fn restore(&mut self, ctx: &mut ToolCtx, id: ObjectId) {
        let Some(appearance) = self.saved.remove(&id) else {
            return;
        };
        let Some(node) = ctx.store.state().object(id).map(|o| o.render_node) else {
            return;
        };
        ctx.scene.host_mut().set_appearance(node, appearance);
    }

    fn clear_highlights(&mut self, ctx: &mut ToolCtx) {
        let ids: Vec<ObjectId> = self.saved.keys().copied().collect();
        for id in ids {
            self.restore(ctx, id);
        }
    }
}

impl Tool for SelectTool {
    fn id(&self) -> ToolId {
        SELECT_TOOL_ID
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.clear_highlights(ctx);
    }

    fn on_event(&mut self, event: &EditorEvent, ctx: &mut ToolCtx) {
        match event {
            EditorEvent::ObjectsSelected { ids } => {
                for &id in ids {
                    self.highlight(ctx, id, Highlight::Select);
                }
            }
            EditorEvent::ObjectsDeselected { ids } => {
                for &id in ids {
                    self.restore(ctx, id);
                }
            }
            EditorEvent::ObjectHovered { id } => {
                let state = ctx.store.state();
                if state.settings.hover_preview && !state.is_selected(*id) {
                    self.highlight(ctx, *id, Highlight::Hover);
                }
            }
            EditorEvent::ObjectUnhovered { id } => {
                if !ctx.store.state().is_selected(*id) {
                    self.restore(ctx, *id);
                }
            }
            EditorEvent::ObjectRemoved { id } => {
                // Nothing left to restore onto.
                self.saved.remove(id);
            }
            _ => {}
        }
    }
}
