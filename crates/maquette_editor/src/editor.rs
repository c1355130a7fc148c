//! Editor facade: composition and wiring of the store, event bus, scene
//! graph, tool registry, history, and interaction controller.
//!
//! The facade owns the event pump: every entry-point mutation drains the
//! store outbox, publishes each event on the bus, and routes it to the
//! active tool. Follow-up actions and tool-emitted events join the same
//! drain, so effects are synchronous from the caller's perspective while
//! every mutation still flows through the single dispatch seam.

use std::collections::VecDeque;

use glam::Vec2;

use maquette_event::EventBus;

use crate::core::actions::Action;
use crate::core::history::HistoryManager;
use crate::core::state::{CameraDelta, EditorSettings, EditorState, SettingsPatch};
use crate::core::store::{EditorStore, SubscriptionId};
use crate::error::SceneError;
use crate::events::{EditorEvent, EditorEventKind};
use crate::interaction::{selection_anchor, InteractionController};
use crate::scene::{
    ManipulableObject, MeshHost, ObjectId, ObjectKind, OwnerTag, RenderHost, RenderNodeId,
    SceneGraph,
};
use crate::tools::{
    DragTool, Modifiers, PointerButton, SelectTool, Tool, ToolCtx, ToolId, ToolRegistry,
    SELECT_TOOL_ID,
};
use crate::viewport::Viewport;

/// Backstop for cyclic event feedback; a subscriber must never re-trigger
/// the action type it is responding to, so hitting this is a caller bug.
const MAX_PUMP_EVENTS: usize = 1024;

/// Construction options for [`EditorCore`].
#[derive(Clone, Debug, Default)]
pub struct EditorCoreOptions {
    pub settings: EditorSettings,
    pub viewport: Viewport,
}

/// The editor core: public surface over the interaction subsystems.
pub struct EditorCore {
    store: EditorStore,
    bus: EventBus<EditorEvent>,
    scene: SceneGraph,
    tools: ToolRegistry,
    history: HistoryManager,
    interaction: InteractionController,
    viewport: Viewport,
    queue: VecDeque<EditorEvent>,
    initialized: bool,
}

impl EditorCore {
    /// Create an editor over the in-crate mesh host.
    pub fn new(options: EditorCoreOptions) -> Self {
        Self::with_host(Box::new(MeshHost::new()), options)
    }

    /// Create an editor over a caller-provided render host.
    pub fn with_host(host: Box<dyn RenderHost>, options: EditorCoreOptions) -> Self {
        let max_objects = options.settings.max_objects;
        let mut editor = Self {
            store: EditorStore::new(options.settings),
            bus: EventBus::new(),
            scene: SceneGraph::new(host, max_objects),
            tools: ToolRegistry::new(SELECT_TOOL_ID),
            history: HistoryManager::new(),
            interaction: InteractionController::new(),
            viewport: options.viewport,
            queue: VecDeque::new(),
            initialized: false,
        };
        editor.initialize();
        editor
    }

    /// Seed the default tools and activate selection. Running this twice is
    /// an API-contract violation.
    fn initialize(&mut self) {
        assert!(!self.initialized, "EditorCore initialized twice");
        self.initialized = true;

        self.tools.register(Box::new(SelectTool::new()));
        self.tools.register(Box::new(DragTool::new()));
        self.switch_tool(SELECT_TOOL_ID);
    }

    // ------------------------------------------------------------------
    // Event pump
    // ------------------------------------------------------------------

    fn pump(&mut self) {
        self.queue.extend(self.store.take_events());

        let mut processed = 0;
        while let Some(event) = self.queue.pop_front() {
            processed += 1;
            if processed > MAX_PUMP_EVENTS {
                log::error!(
                    "event pump exceeded {MAX_PUMP_EVENTS} events, dropping backlog"
                );
                self.queue.clear();
                break;
            }

            // Anchor for the external contextual-menu collaborator.
            if let EditorEvent::ObjectsSelected { ids } = &event {
                if let Some(&first) = ids.first() {
                    if let Some(position) =
                        selection_anchor(self.store.state(), &self.viewport, first)
                    {
                        self.queue
                            .push_back(EditorEvent::SelectionAnchor { id: first, position });
                    }
                }
            }

            self.bus.emit(&event);

            let camera = self.store.state().camera;
            let mut outbox = Vec::new();
            {
                let mut ctx = ToolCtx {
                    scene: &mut self.scene,
                    store: &mut self.store,
                    camera: &camera,
                    viewport: &self.viewport,
                    outbox: &mut outbox,
                };
                if let Some(tool) = self.tools.active_mut() {
                    tool.on_event(&event, &mut ctx);
                }
            }
            self.queue.extend(outbox);
            self.queue.extend(self.store.take_events());
        }
    }

    // ------------------------------------------------------------------
    // Store surface
    // ------------------------------------------------------------------

    /// Apply an action and deliver the resulting notifications.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetActiveTool(id) => {
                self.switch_tool(id);
            }
            other => {
                self.store.dispatch(other);
                self.pump();
            }
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    /// Register a state observer.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EditorState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Remove a state observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Subscribe to an event channel.
    pub fn on<F>(&mut self, kind: EditorEventKind, callback: F) -> maquette_event::SubscriberId
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        self.bus.on(kind, callback)
    }

    /// Unsubscribe from an event channel.
    pub fn off(&mut self, id: maquette_event::SubscriberId) -> bool {
        self.bus.off(id)
    }

    /// Direct access to the event bus.
    pub fn events_mut(&mut self) -> &mut EventBus<EditorEvent> {
        &mut self.bus
    }

    // ------------------------------------------------------------------
    // Object CRUD
    // ------------------------------------------------------------------

    /// Wrap a render node in a manipulable object.
    pub fn add_object(
        &mut self,
        node: RenderNodeId,
        name: impl Into<String>,
        kind: ObjectKind,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, SceneError> {
        let result = self.scene.add_object(&mut self.store, node, name, kind, parent);
        self.pump();
        result
    }

    /// Remove an object and its descendants. `false` for unknown ids.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let removed = self.scene.remove_object(&mut self.store, id);
        self.pump();
        removed
    }

    /// Deep-clone an object under its original parent.
    pub fn clone_object(&mut self, id: ObjectId) -> Result<ObjectId, SceneError> {
        let result = self.scene.clone_object(&mut self.store, id);
        self.pump();
        result
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&ManipulableObject> {
        self.store.state().object(id)
    }

    pub fn all_objects(&self) -> Vec<&ManipulableObject> {
        self.store.state().objects.values().collect()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The render host, for creating nodes to wrap.
    pub fn render_host_mut(&mut self) -> &mut dyn RenderHost {
        self.scene.host_mut()
    }

    // ------------------------------------------------------------------
    // Tool CRUD
    // ------------------------------------------------------------------

    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.register(tool);
    }

    /// Remove a tool; the active tool falls back to the default tool.
    pub fn unregister_tool(&mut self, id: ToolId) -> bool {
        let camera = self.store.state().camera;
        let mut outbox = Vec::new();
        let removed = {
            let mut ctx = ToolCtx {
                scene: &mut self.scene,
                store: &mut self.store,
                camera: &camera,
                viewport: &self.viewport,
                outbox: &mut outbox,
            };
            self.tools.unregister(id, &mut ctx)
        };
        self.queue.extend(outbox);

        if removed {
            if let Some(active) = self.tools.active_id() {
                self.store.dispatch(Action::SetActiveTool(active));
            }
        }
        self.pump();
        removed
    }

    /// Activate a tool. Idempotent for the already-active tool; `false` for
    /// unknown names.
    pub fn switch_tool(&mut self, id: ToolId) -> bool {
        if !self.tools.contains(id) {
            log::warn!("switch_tool: unknown tool '{id}'");
            return false;
        }

        let camera = self.store.state().camera;
        let mut outbox = Vec::new();
        {
            let mut ctx = ToolCtx {
                scene: &mut self.scene,
                store: &mut self.store,
                camera: &camera,
                viewport: &self.viewport,
                outbox: &mut outbox,
            };
            self.tools.switch_to(id, &mut ctx);
        }
        self.queue.extend(outbox);

        self.store.dispatch(Action::SetActiveTool(id));
        self.pump();
        true
    }

    pub fn available_tools(&self) -> Vec<ToolId> {
        self.tools.tool_ids()
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        self.tools.active_id()
    }

    pub fn get_tool(&self, id: ToolId) -> Option<&dyn Tool> {
        self.tools.get(id)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        self.interaction.begin_press(Vec2::new(x, y));

        let camera = self.store.state().camera;
        let event =
            self.interaction
                .pointer_event(&camera, &self.viewport, Some(button), modifiers);
        let pick = self.scene.object_at_ray(self.store.state(), &event.ray);

        let mut outbox = Vec::new();
        {
            let mut ctx = ToolCtx {
                scene: &mut self.scene,
                store: &mut self.store,
                camera: &camera,
                viewport: &self.viewport,
                outbox: &mut outbox,
            };
            if let Some(tool) = self.tools.active_mut() {
                tool.on_pointer_down(&event, pick, &mut ctx);
            }
        }
        self.queue.extend(outbox);
        self.pump();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        self.interaction.track_move(Vec2::new(x, y));

        let camera = self.store.state().camera;
        let event = self
            .interaction
            .pointer_event(&camera, &self.viewport, None, modifiers);

        let mut outbox = Vec::new();
        {
            let mut ctx = ToolCtx {
                scene: &mut self.scene,
                store: &mut self.store,
                camera: &camera,
                viewport: &self.viewport,
                outbox: &mut outbox,
            };
            if let Some(tool) = self.tools.active_mut() {
                tool.on_pointer_move(&event, &mut ctx);
            }
        }
        self.queue.extend(outbox);

        // Hover only outside an active press; repeated identical picks do
        // not re-dispatch.
        if !self.interaction.is_button_down() {
            let pick = self.scene.object_at_ray(self.store.state(), &event.ray);
            self.interaction.update_hover(&mut self.store, pick);
        }
        self.pump();
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        let was_click = self.interaction.end_press(Vec2::new(x, y));

        let camera = self.store.state().camera;
        let event =
            self.interaction
                .pointer_event(&camera, &self.viewport, Some(button), modifiers);
        let pick = self.scene.object_at_ray(self.store.state(), &event.ray);

        let mut outbox = Vec::new();
        {
            let mut ctx = ToolCtx {
                scene: &mut self.scene,
                store: &mut self.store,
                camera: &camera,
                viewport: &self.viewport,
                outbox: &mut outbox,
            };
            if let Some(tool) = self.tools.active_mut() {
                tool.on_pointer_up(&event, pick, &mut ctx);
            }
        }
        self.queue.extend(outbox);

        if was_click && button == PointerButton::Primary {
            self.interaction.handle_click(&mut self.store, pick, modifiers);
        }
        self.pump();
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn add_snapshot(
        &mut self,
        description: impl Into<String>,
        camera: Option<CameraDelta>,
        settings: Option<SettingsPatch>,
    ) {
        self.history
            .add_snapshot(&mut self.store, description, camera, settings);
        self.pump();
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.store);
        self.pump();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.store);
        self.pump();
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(self.store.state())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo(self.store.state())
    }

    pub fn start_batch(&mut self, description: &str) {
        self.history.start_batch(&mut self.store, description);
        self.pump();
    }

    pub fn end_batch(&mut self, description: &str) {
        self.history.end_batch(&mut self.store, description);
        self.pump();
    }

    // ------------------------------------------------------------------
    // Viewport and manipulation ownership
    // ------------------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    /// Claim an object's manipulation slot for an external driver.
    pub fn acquire_manipulation(&mut self, id: ObjectId, tag: OwnerTag) -> bool {
        self.scene.acquire_owner(id, tag)
    }

    pub fn release_manipulation(&mut self, id: ObjectId, tag: OwnerTag) -> bool {
        self.scene.release_owner(id, tag)
    }

    pub fn manipulation_owner(&self, id: ObjectId) -> Option<OwnerTag> {
        self.scene.owner_of(id)
    }
}
