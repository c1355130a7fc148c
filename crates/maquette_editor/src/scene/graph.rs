//! Scene graph: id-indexed forest of manipulable objects.
//!
//! The authoritative object table lives in `EditorState`; the graph holds
//! everything around it — the render host, the id generator, the capacity
//! limit, and the per-object manipulation-owner table — and drives the table
//! through store actions so every mutation flows through the single dispatch
//! entry point.

use std::collections::HashMap;

use maquette_math::{ray_aabb, Aabb, Ray};

use crate::core::actions::Action;
use crate::core::state::EditorState;
use crate::core::store::EditorStore;
use crate::error::SceneError;
use crate::scene::object::{ManipulableObject, ObjectId, ObjectKind, Transform};
use crate::scene::render::{MeshHost, RenderHost, RenderNodeId};

/// Identifies who currently drives an object's transform.
///
/// Tools and procedural drivers (trajectories, physics) must acquire the
/// object's owner slot before writing its transform, instead of racing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OwnerTag(pub &'static str);

impl std::fmt::Display for OwnerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id-indexed forest of [`ManipulableObject`]s with picking.
pub struct SceneGraph {
    host: Box<dyn RenderHost>,
    next_object_id: u64,
    max_objects: usize,
    owners: HashMap<ObjectId, OwnerTag>,
}

impl SceneGraph {
    pub fn new(host: Box<dyn RenderHost>, max_objects: usize) -> Self {
        Self {
            host,
            next_object_id: 1,
            max_objects,
            owners: HashMap::new(),
        }
    }

    /// Graph over the in-crate mesh host.
    pub fn with_mesh_host(max_objects: usize) -> Self {
        Self::new(Box::new(MeshHost::new()), max_objects)
    }

    pub fn host(&self) -> &dyn RenderHost {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn RenderHost {
        self.host.as_mut()
    }

    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    /// Wrap a render node and attach it to the forest.
    ///
    /// Fails with [`SceneError::CapacityExceeded`] once the object count
    /// reaches the configured maximum.
    pub fn add_object(
        &mut self,
        store: &mut EditorStore,
        node: RenderNodeId,
        name: impl Into<String>,
        kind: ObjectKind,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, SceneError> {
        self.insert(store, node, name.into(), kind, parent, Transform::default(), true)
    }

    fn insert(
        &mut self,
        store: &mut EditorStore,
        node: RenderNodeId,
        name: String,
        kind: ObjectKind,
        parent: Option<ObjectId>,
        transform: Transform,
        visible: bool,
    ) -> Result<ObjectId, SceneError> {
        if store.state().objects.len() >= self.max_objects {
            return Err(SceneError::CapacityExceeded {
                max: self.max_objects,
            });
        }

        let id = self.next_id();
        self.host.bind_wrapper(node, id);

        let object = ManipulableObject::new(id, name, kind, node)
            .with_parent(parent)
            .with_transform(transform)
            .with_visible(visible);
        store.dispatch(Action::AddSceneObject(object));
        Ok(id)
    }

    /// Remove an object and all of its descendants, depth-first: each child
    /// is fully removed and its render resources released before the parent.
    /// Returns `false` for unknown ids so racing removals stay harmless.
    pub fn remove_object(&mut self, store: &mut EditorStore, id: ObjectId) -> bool {
        let Some(object) = store.state().object(id) else {
            return false;
        };
        let node = object.render_node;
        let children = object.children.clone();

        for child in children {
            self.remove_object(store, child);
        }

        self.owners.remove(&id);
        self.host.release(node);
        store.dispatch(Action::RemoveSceneObject(id));
        true
    }

    /// Deep-clone an object: fresh id, cloned render subtree, copied
    /// metadata, re-parented under the original's parent. Selection
    /// membership is not copied.
    pub fn clone_object(
        &mut self,
        store: &mut EditorStore,
        id: ObjectId,
    ) -> Result<ObjectId, SceneError> {
        let source = store
            .state()
            .object(id)
            .cloned()
            .ok_or(SceneError::ObjectNotFound(id))?;

        let node = self
            .host
            .clone_subtree(source.render_node)
            .ok_or(SceneError::ObjectNotFound(id))?;

        match self.insert(
            store,
            node,
            format!("{} Copy", source.name),
            source.kind,
            source.parent,
            source.transform,
            source.visible,
        ) {
            Ok(clone_id) => Ok(clone_id),
            Err(err) => {
                self.host.release(node);
                Err(err)
            }
        }
    }

    /// Resolve the object under a ray.
    ///
    /// Intersects the visible primitives, takes the nearest hit, and walks
    /// the render node's parent chain up to the owning wrapper — hits land
    /// on raw primitives, not on wrappers.
    pub fn object_at_ray(&self, state: &EditorState, ray: &Ray) -> Option<ObjectId> {
        if !ray.is_valid() {
            return None;
        }

        let mut nearest: Option<(f32, ObjectId)> = None;
        for node in self.host.primitives() {
            let Some(id) = self.host.wrapper_above(node) else {
                continue;
            };
            let Some(object) = state.object(id) else {
                continue;
            };
            if !state.is_visible_in_hierarchy(id) {
                continue;
            }
            let Some(bounds) = self.host.local_bounds(node) else {
                continue;
            };

            let world = bounds.transformed(&object.transform.matrix());
            if let Some(t) = ray_aabb(ray, &world) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, id));
                }
            }
        }

        nearest.map(|(_, id)| id)
    }

    /// Derived world-space bounding box of an object's render node.
    pub fn bounds(&self, state: &EditorState, id: ObjectId) -> Option<Aabb> {
        let object = state.object(id)?;
        let local = self.host.local_bounds(object.render_node)?;
        Some(local.transformed(&object.transform.matrix()))
    }

    // ------------------------------------------------------------------
    // Manipulation ownership
    // ------------------------------------------------------------------

    /// Claim the manipulation-owner slot for an object. Re-acquiring with
    /// the same tag succeeds; a slot held by someone else does not.
    pub fn acquire_owner(&mut self, id: ObjectId, tag: OwnerTag) -> bool {
        match self.owners.get(&id) {
            Some(&current) => current == tag,
            None => {
                self.owners.insert(id, tag);
                true
            }
        }
    }

    /// Release the owner slot; only the holder can release it.
    pub fn release_owner(&mut self, id: ObjectId, tag: OwnerTag) -> bool {
        if self.owners.get(&id) == Some(&tag) {
            self.owners.remove(&id);
            true
        } else {
            false
        }
    }

    /// Current owner of an object, if any.
    pub fn owner_of(&self, id: ObjectId) -> Option<OwnerTag> {
        self.owners.get(&id).copied()
    }
}
