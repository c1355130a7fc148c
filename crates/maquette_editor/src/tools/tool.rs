//! Tool trait, capability context, and registry.

use std::collections::HashMap;

use glam::Vec2;

use maquette_math::Ray;

use crate::core::actions::Action;
use crate::core::state::{EditorCamera, EditorState};
use crate::core::store::EditorStore;
use crate::events::EditorEvent;
use crate::scene::{ManipulableObject, ObjectId, SceneGraph};
use crate::viewport::Viewport;

/// Unique identifier for a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToolId(pub &'static str);

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of tool input handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolResult {
    /// No action taken
    None,
    /// Tool handled the input, continue
    Handled,
    /// Tool completed an action
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Normalized pointer input delivered to tools.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    /// Position in screen pixels
    pub screen: Vec2,
    /// Position in normalized device coordinates
    pub ndc: Vec2,
    /// Pick ray through the pointer
    pub ray: Ray,
    /// Button involved, `None` for plain movement
    pub button: Option<PointerButton>,
    pub modifiers: Modifiers,
}

/// Capability surface handed to tools.
///
/// Tools depend on this interface, never on the editor aggregate: object
/// lookup, action dispatch, picking, projection inputs, and an event outbox
/// the facade pumps.
pub struct ToolCtx<'a> {
    pub scene: &'a mut SceneGraph,
    pub store: &'a mut EditorStore,
    pub camera: &'a EditorCamera,
    pub viewport: &'a Viewport,
    pub outbox: &'a mut Vec<EditorEvent>,
}

impl<'a> ToolCtx<'a> {
    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&ManipulableObject> {
        self.store.state().object(id)
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    /// Publish a notification through the facade's event pump.
    pub fn emit(&mut self, event: EditorEvent) {
        self.outbox.push(event);
    }

    /// Pick the object under a ray.
    pub fn raycast(&self, ray: &Ray) -> Option<ObjectId> {
        self.scene.object_at_ray(self.store.state(), ray)
    }
}

/// A tool for viewport interaction.
///
/// Exactly one tool is active at a time; the registry runs the full
/// deactivate of the outgoing tool before activating the next.
pub trait Tool {
    /// Unique identifier for this tool.
    fn id(&self) -> ToolId;

    /// Called when the tool becomes active.
    fn on_activate(&mut self, _ctx: &mut ToolCtx) {}

    /// Called when the tool becomes inactive.
    fn on_deactivate(&mut self, _ctx: &mut ToolCtx) {}

    /// Consume an editor notification.
    fn on_event(&mut self, _event: &EditorEvent, _ctx: &mut ToolCtx) {}

    /// Handle pointer press. `pick` is the object under the pointer.
    fn on_pointer_down(
        &mut self,
        _event: &PointerEvent,
        _pick: Option<ObjectId>,
        _ctx: &mut ToolCtx,
    ) -> ToolResult {
        ToolResult::None
    }

    /// Handle pointer movement.
    fn on_pointer_move(&mut self, _event: &PointerEvent, _ctx: &mut ToolCtx) -> ToolResult {
        ToolResult::None
    }

    /// Handle pointer release.
    fn on_pointer_up(
        &mut self,
        _event: &PointerEvent,
        _pick: Option<ObjectId>,
        _ctx: &mut ToolCtx,
    ) -> ToolResult {
        ToolResult::None
    }
}

/// Registry managing the exactly-one-active-tool lifecycle.
pub struct ToolRegistry {
    tools: HashMap<ToolId, Box<dyn Tool>>,
    active_tool: Option<ToolId>,
    default_tool: ToolId,
}

impl ToolRegistry {
    pub fn new(default_tool: ToolId) -> Self {
        Self {
            tools: HashMap::new(),
            active_tool: None,
            default_tool,
        }
    }

    /// Register a tool. Registering an existing name replaces the previous
    /// tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let id = tool.id();
        if self.tools.insert(id, tool).is_some() {
            log::warn!("tool '{id}' re-registered, replacing");
        }
    }

    /// Remove a tool. The active tool falls back to the default tool rather
    /// than leaving none active. Returns `false` for unknown names.
    pub fn unregister(&mut self, id: ToolId, ctx: &mut ToolCtx) -> bool {
        if !self.tools.contains_key(&id) {
            return false;
        }

        if self.active_tool == Some(id) {
            if id != self.default_tool && self.tools.contains_key(&self.default_tool) {
                self.switch_to(self.default_tool, ctx);
            } else {
                if let Some(tool) = self.tools.get_mut(&id) {
                    tool.on_deactivate(ctx);
                }
                self.active_tool = None;
            }
        }

        self.tools.remove(&id);
        true
    }

    /// Activate a tool by name. Idempotent when the tool is already active:
    /// no deactivate/activate runs. Returns `false` for unknown names.
    pub fn switch_to(&mut self, id: ToolId, ctx: &mut ToolCtx) -> bool {
        if !self.tools.contains_key(&id) {
            log::warn!("switch_to: unknown tool '{id}'");
            return false;
        }
        if self.active_tool == Some(id) {
            return true;
        }

        // The outgoing tool's teardown runs to completion first.
        if let Some(current) = self.active_tool {
            if let Some(tool) = self.tools.get_mut(&current) {
                tool.on_deactivate(ctx);
            }
        }

        self.active_tool = Some(id);
        if let Some(tool) = self.tools.get_mut(&id) {
            tool.on_activate(ctx);
        }
        true
    }

    pub fn contains(&self, id: ToolId) -> bool {
        self.tools.contains_key(&id)
    }

    pub fn active_id(&self) -> Option<ToolId> {
        self.active_tool
    }

    pub fn active_mut(&mut self) -> Option<&mut Box<dyn Tool>> {
        self.active_tool.and_then(|id| self.tools.get_mut(&id))
    }

    pub fn get(&self, id: ToolId) -> Option<&dyn Tool> {
        self.tools.get(&id).map(|t| t.as_ref())
    }

    pub fn default_tool(&self) -> ToolId {
        self.default_tool
    }

    /// All registered tool names.
    pub fn tool_ids(&self) -> Vec<ToolId> {
        self.tools.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CountingTool {
        id: ToolId,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Tool for CountingTool {
        fn id(&self) -> ToolId {
            self.id
        }

        fn on_activate(&mut self, _ctx: &mut ToolCtx) {
            self.log.borrow_mut().push(format!("activate:{}", self.id));
        }

        fn on_deactivate(&mut self, _ctx: &mut ToolCtx) {
            self.log.borrow_mut().push(format!("deactivate:{}", self.id));
        }
    }

    fn fixture() -> (SceneGraph, EditorStore, Viewport) {
        (SceneGraph::with_mesh_host(16), EditorStore::default(), Viewport::default())
    }

    macro_rules! ctx {
        ($scene:expr, $store:expr, $viewport:expr, $camera:expr, $outbox:expr) => {
            ToolCtx {
                scene: &mut $scene,
                store: &mut $store,
                camera: &$camera,
                viewport: &$viewport,
                outbox: &mut $outbox,
            }
        };
    }

    #[test]
    fn test_switch_is_idempotent() {
        let (mut scene, mut store, viewport) = fixture();
        let camera = EditorCamera::default();
        let mut outbox = Vec::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut registry = ToolRegistry::new(ToolId("a"));
        registry.register(Box::new(CountingTool { id: ToolId("a"), log: log.clone() }));
        registry.register(Box::new(CountingTool { id: ToolId("b"), log: log.clone() }));

        let mut ctx = ctx!(scene, store, viewport, camera, outbox);
        assert!(registry.switch_to(ToolId("a"), &mut ctx));
        assert!(registry.switch_to(ToolId("a"), &mut ctx));

        assert_eq!(*log.borrow(), vec!["activate:a"]);
    }

    #[test]
    fn test_switch_deactivates_before_activating() {
        let (mut scene, mut store, viewport) = fixture();
        let camera = EditorCamera::default();
        let mut outbox = Vec::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut registry = ToolRegistry::new(ToolId("a"));
        registry.register(Box::new(CountingTool { id: ToolId("a"), log: log.clone() }));
        registry.register(Box::new(CountingTool { id: ToolId("b"), log: log.clone() }));

        let mut ctx = ctx!(scene, store, viewport, camera, outbox);
        registry.switch_to(ToolId("a"), &mut ctx);
        registry.switch_to(ToolId("b"), &mut ctx);

        assert_eq!(*log.borrow(), vec!["activate:a", "deactivate:a", "activate:b"]);
    }

    #[test]
    fn test_switch_to_unknown_tool() {
        let (mut scene, mut store, viewport) = fixture();
        let camera = EditorCamera::default();
        let mut outbox = Vec::new();

        let mut registry = ToolRegistry::new(ToolId("a"));
        let mut ctx = ctx!(scene, store, viewport, camera, outbox);
        assert!(!registry.switch_to(ToolId("missing"), &mut ctx));
        assert_eq!(registry.active_id(), None);
    }

    #[test]
    fn test_unregister_active_falls_back_to_default() {
        let (mut scene, mut store, viewport) = fixture();
        let camera = EditorCamera::default();
        let mut outbox = Vec::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut registry = ToolRegistry::new(ToolId("a"));
        registry.register(Box::new(CountingTool { id: ToolId("a"), log: log.clone() }));
        registry.register(Box::new(CountingTool { id: ToolId("b"), log: log.clone() }));

        let mut ctx = ctx!(scene, store, viewport, camera, outbox);
        registry.switch_to(ToolId("b"), &mut ctx);
        assert!(registry.unregister(ToolId("b"), &mut ctx));

        assert_eq!(registry.active_id(), Some(ToolId("a")));
        assert!(!registry.contains(ToolId("b")));
        assert_eq!(
            *log.borrow(),
            vec!["activate:b", "deactivate:b", "activate:a"]
        );
    }

    #[test]
    fn test_unregister_unknown_tool() {
        let (mut scene, mut store, viewport) = fixture();
        let camera = EditorCamera::default();
        let mut outbox = Vec::new();

        let mut registry = ToolRegistry::new(ToolId("a"));
        let mut ctx = ctx!(scene, store, viewport, camera, outbox);
        assert!(!registry.unregister(ToolId("missing"), &mut ctx));
    }
}
