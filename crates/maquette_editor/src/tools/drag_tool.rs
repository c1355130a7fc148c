//! Drag tool: moves an object along a drag plane under the pointer.
//!
//! Per-session state machine: Idle -> Dragging -> Idle. The session owns the
//! object's manipulation slot for its duration; deactivating the tool
//! mid-drag ends the session without reverting — the last computed position
//! stands.

use glam::Vec3;

use maquette_math::{ray_plane, snap_vec3, Plane};

use crate::core::actions::{Action, ObjectPatch};
use crate::events::EditorEvent;
use crate::scene::{ObjectId, OwnerTag};
use crate::tools::tool::{PointerButton, PointerEvent, Tool, ToolCtx, ToolId, ToolResult};

pub const DRAG_TOOL_ID: ToolId = ToolId("drag");

/// Owner tag the drag tool claims per session.
pub const DRAG_OWNER: OwnerTag = OwnerTag("tool:drag");

/// Axis-aligned plane the drag can be constrained to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneConstraint {
    XY,
    XZ,
    YZ,
}

impl PlaneConstraint {
    fn normal(&self) -> Vec3 {
        match self {
            PlaneConstraint::XY => Vec3::Z,
            PlaneConstraint::XZ => Vec3::Y,
            PlaneConstraint::YZ => Vec3::X,
        }
    }
}

struct DragSession {
    target: ObjectId,
    start: Vec3,
    last: Vec3,
    plane: Plane,
    offset: Vec3,
}

/// Pointer-driven translation tool.
pub struct DragTool {
    constrain_to_plane: Option<PlaneConstraint>,
    session: Option<DragSession>,
}

impl Default for DragTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DragTool {
    pub fn new() -> Self {
        Self {
            constrain_to_plane: None,
            session: None,
        }
    }

    pub fn with_constraint(mut self, constraint: PlaneConstraint) -> Self {
        self.constrain_to_plane = Some(constraint);
        self
    }

    /// Constrain dragging to an axis-aligned plane, or `None` for the
    /// camera-facing plane.
    pub fn set_constrain_to_plane(&mut self, constraint: Option<PlaneConstraint>) {
        self.constrain_to_plane = constraint;
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn drag_target(&self) -> Option<ObjectId> {
        self.session.as_ref().map(|s| s.target)
    }

    /// Drag plane through `position`: the configured axis plane, or a
    /// camera-facing plane.
    fn drag_plane(&self, ctx: &ToolCtx, position: Vec3) -> Plane {
        match self.constrain_to_plane {
            Some(constraint) => Plane::from_point_normal(position, constraint.normal()),
            None => {
                let view_dir = (ctx.camera.target - ctx.camera.position).normalize_or_zero();
                Plane::from_point_normal(position, view_dir)
            }
        }
    }

    fn finish(&mut self, ctx: &mut ToolCtx) {
        let Some(session) = self.session.take() else {
            return;
        };

        let end = ctx
            .store
            .state()
            .object(session.target)
            .map(|o| o.transform.position)
            .unwrap_or(session.last);

        ctx.emit(EditorEvent::DragEnded {
            id: session.target,
            start: session.start,
            end,
            delta: end - session.start,
        });
        ctx.scene.release_owner(session.target, DRAG_OWNER);
        log::debug!("drag ended: {}", session.target);
    }
}

impl Tool for DragTool {
    fn id(&self) -> ToolId {
        DRAG_TOOL_ID
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        // Cancellation leaves the object at its last computed position.
        self.finish(ctx);
    }

    fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        pick: Option<ObjectId>,
        ctx: &mut ToolCtx,
    ) -> ToolResult {
        if event.button != Some(PointerButton::Primary) || self.session.is_some() {
            return ToolResult::None;
        }
        let Some(id) = pick else {
            return ToolResult::None;
        };
        let Some(position) = ctx.store.state().object(id).map(|o| o.transform.position) else {
            return ToolResult::None;
        };

        if !ctx.scene.acquire_owner(id, DRAG_OWNER) {
            log::debug!(
                "drag skipped: {} owned by {:?}",
                id,
                ctx.scene.owner_of(id)
            );
            return ToolResult::None;
        }

        let plane = self.drag_plane(ctx, position);
        let Some(hit) = ray_plane(&event.ray, &plane) else {
            ctx.scene.release_owner(id, DRAG_OWNER);
            return ToolResult::None;
        };

        self.session = Some(DragSession {
            target: id,
            start: position,
            last: position,
            plane,
            offset: position - hit,
        });

        ctx.dispatch(Action::SelectObjects(vec![id]));
        ctx.emit(EditorEvent::DragStarted {
            id,
            start: position,
        });
        log::debug!("drag started: {id}");
        ToolResult::Handled
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolCtx) -> ToolResult {
        let Some(session) = self.session.as_mut() else {
            return ToolResult::None;
        };

        let Some(hit) = ray_plane(&event.ray, &session.plane) else {
            return ToolResult::Handled;
        };

        let mut position = hit + session.offset;
        let settings = &ctx.store.state().settings;
        if settings.snap_to_grid {
            // Snap the final position, not the offset.
            position = snap_vec3(position, settings.grid_size);
        }
        session.last = position;

        let id = session.target;
        let delta = position - session.start;
        ctx.dispatch(Action::UpdateSceneObject {
            id,
            patch: ObjectPatch::position(position),
        });
        ctx.emit(EditorEvent::DragUpdated {
            id,
            position,
            delta,
        });
        ToolResult::Handled
    }

    fn on_pointer_up(
        &mut self,
        _event: &PointerEvent,
        _pick: Option<ObjectId>,
        ctx: &mut ToolCtx,
    ) -> ToolResult {
        if self.session.is_some() {
            self.finish(ctx);
            ToolResult::Completed
        } else {
            ToolResult::None
        }
    }
}
